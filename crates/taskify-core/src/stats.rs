//! Summary statistics over a caller's visible task set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Status, Task};

/// How many of the recent and urgent tasks a [`Dashboard`] carries.
pub const DASHBOARD_LIMIT: usize = 3;

/// Counts per priority. All three keys are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
  pub high:   usize,
  pub medium: usize,
  pub low:    usize,
}

/// Aggregate counts over a task set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub total:           usize,
  pub completed:       usize,
  pub in_progress:     usize,
  pub todo:            usize,
  pub by_priority:     PriorityCounts,
  /// Only categories that occur; case-sensitive, not normalised.
  pub by_category:     BTreeMap<String, usize>,
  /// `completed / total` as a rounded percentage; `0` for an empty set.
  pub completion_rate: u32,
}

/// Reduce `tasks` to a [`Summary`] in a single pass.
pub fn summarize<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Summary {
  let mut s = Summary::default();

  for task in tasks {
    s.total += 1;
    match task.status {
      Status::Todo => s.todo += 1,
      Status::InProgress => s.in_progress += 1,
      Status::Completed => s.completed += 1,
    }
    match task.priority {
      Priority::High => s.by_priority.high += 1,
      Priority::Medium => s.by_priority.medium += 1,
      Priority::Low => s.by_priority.low += 1,
    }
    *s.by_category.entry(task.category.clone()).or_default() += 1;
  }

  s.completion_rate = completion_rate(s.completed, s.total);
  s
}

fn completion_rate(completed: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  (completed as f64 / total as f64 * 100.0).round() as u32
}

/// The dashboard read model: summary plus the newest and most urgent tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub stats:  Summary,
  /// Newest first, by `created_at`.
  pub recent: Vec<Task>,
  /// High-priority tasks that are not completed, in list order.
  pub urgent: Vec<Task>,
}

impl Dashboard {
  pub fn build(tasks: &[Task]) -> Self {
    let mut recent = tasks.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(DASHBOARD_LIMIT);

    let urgent = tasks
      .iter()
      .filter(|t| t.priority == Priority::High && t.status != Status::Completed)
      .take(DASHBOARD_LIMIT)
      .cloned()
      .collect();

    Self { stats: summarize(tasks), recent, urgent }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use serde_json::json;

  use super::*;
  use crate::{
    access::CallerId,
    task::{NewTask, TaskId},
  };

  fn task(status: Status, priority: Priority, category: &str) -> Task {
    let mut fields = NewTask::new("t", "d", priority, category);
    fields.status = status;
    Task::create(TaskId::new(), CallerId::from("u"), fields, Utc::now())
  }

  #[test]
  fn counts_by_status() {
    let tasks = [
      task(Status::Todo, Priority::Low, "Work"),
      task(Status::Todo, Priority::Low, "Work"),
      task(Status::InProgress, Priority::Low, "Work"),
      task(Status::Completed, Priority::Low, "Work"),
    ];
    let s = summarize(&tasks);
    assert_eq!(s.total, 4);
    assert_eq!(s.todo, 2);
    assert_eq!(s.in_progress, 1);
    assert_eq!(s.completed, 1);
    assert_eq!(s.completion_rate, 25);
  }

  #[test]
  fn empty_set_zero_fills_priority_only() {
    let s = summarize(&[]);
    assert_eq!(s.total, 0);
    assert_eq!(s.by_priority, PriorityCounts { high: 0, medium: 0, low: 0 });
    assert!(s.by_category.is_empty());
    assert_eq!(s.completion_rate, 0);

    let value = serde_json::to_value(&s).unwrap();
    assert_eq!(value["byPriority"], json!({ "high": 0, "medium": 0, "low": 0 }));
    assert_eq!(value["byCategory"], json!({}));
  }

  #[test]
  fn categories_are_counted_case_sensitively() {
    let tasks = [
      task(Status::Todo, Priority::High, "Work"),
      task(Status::Todo, Priority::Medium, "Work"),
      task(Status::Todo, Priority::Low, "Personal"),
      task(Status::Todo, Priority::Low, "personal"),
    ];
    let s = summarize(&tasks);
    assert_eq!(s.by_category.get("Work"), Some(&2));
    assert_eq!(s.by_category.get("Personal"), Some(&1));
    assert_eq!(s.by_category.get("personal"), Some(&1));
    assert_eq!(s.by_priority, PriorityCounts { high: 1, medium: 1, low: 2 });
  }

  #[test]
  fn completion_rate_rounds_half_up() {
    assert_eq!(completion_rate(1, 3), 33);
    assert_eq!(completion_rate(2, 3), 67);
    assert_eq!(completion_rate(1, 8), 13);
  }

  #[test]
  fn dashboard_picks_recent_and_urgent() {
    let now = Utc::now();
    let mut tasks: Vec<Task> = (0..5)
      .map(|i| {
        let mut t = task(Status::Todo, Priority::High, "Work");
        t.created_at = now - Duration::days(5 - i);
        t
      })
      .collect();
    tasks[0].status = Status::Completed;

    let d = Dashboard::build(&tasks);
    assert_eq!(d.stats.total, 5);
    assert_eq!(
      d.recent.iter().map(|t| t.id).collect::<Vec<_>>(),
      vec![tasks[4].id, tasks[3].id, tasks[2].id]
    );
    assert_eq!(
      d.urgent.iter().map(|t| t.id).collect::<Vec<_>>(),
      vec![tasks[1].id, tasks[2].id, tasks[3].id]
    );
  }
}

//! Demo data: six tasks spread over a handful of categories, dated relative
//! to the moment they are seeded.

use chrono::{DateTime, Duration, Utc};
use taskify_core::{
  access::CallerId,
  task::{Priority, Status, Task, TaskId},
};

struct Sample {
  title:       &'static str,
  description: &'static str,
  priority:    Priority,
  status:      Status,
  category:    &'static str,
  /// Days before now that the task was created.
  age_days:    i64,
  /// Days from now until the task is due (negative: overdue).
  due_in_days: Option<i64>,
}

const SAMPLES: [Sample; 6] = [
  Sample {
    title:       "Complete project proposal",
    description: "Draft the project proposal for client review including timeline and budget.",
    priority:    Priority::High,
    status:      Status::InProgress,
    category:    "Work",
    age_days:    2,
    due_in_days: Some(2),
  },
  Sample {
    title:       "Schedule team meeting",
    description: "Set up weekly team meeting to discuss progress and roadblocks.",
    priority:    Priority::Medium,
    status:      Status::Todo,
    category:    "Work",
    age_days:    1,
    due_in_days: Some(5),
  },
  Sample {
    title:       "Update portfolio website",
    description: "Add recent projects to portfolio and update skills section.",
    priority:    Priority::Low,
    status:      Status::Todo,
    category:    "Personal",
    age_days:    3,
    due_in_days: None,
  },
  Sample {
    title:       "Read 'The Pragmatic Programmer'",
    description: "Complete reading one chapter per day.",
    priority:    Priority::Medium,
    status:      Status::InProgress,
    category:    "Education",
    age_days:    4,
    due_in_days: Some(10),
  },
  Sample {
    title:       "Pay utility bills",
    description: "Pay electricity, water, and internet bills for the month.",
    priority:    Priority::High,
    status:      Status::Completed,
    category:    "Finance",
    age_days:    5,
    due_in_days: Some(-1),
  },
  Sample {
    title:       "Daily workout",
    description: "Complete 30 minutes of cardio and 15 minutes of strength training.",
    priority:    Priority::Medium,
    status:      Status::Completed,
    category:    "Health",
    age_days:    1,
    due_in_days: None,
  },
];

/// The demo tasks, owned by `owner`.
pub fn sample_tasks(owner: &CallerId, now: DateTime<Utc>) -> Vec<Task> {
  SAMPLES
    .iter()
    .map(|s| Task {
      id:          TaskId::new(),
      title:       s.title.to_owned(),
      description: s.description.to_owned(),
      priority:    s.priority,
      status:      s.status,
      category:    s.category.to_owned(),
      due_date:    s.due_in_days.map(|d| now + Duration::days(d)),
      owner_id:    owner.clone(),
      created_at:  now - Duration::days(s.age_days),
      updated_at:  now,
    })
    .collect()
}

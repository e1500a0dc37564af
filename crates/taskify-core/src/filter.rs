//! Narrowing a caller's task list by status, priority, category, and text.

use crate::{
  Error, Result,
  task::{Priority, Status, Task},
};

/// Sentinel accepted for any criterion to mean "do not filter on this".
pub const ALL: &str = "all";

/// Conjunctive filter over a task list. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
  pub status:   Option<Status>,
  pub priority: Option<Priority>,
  /// Exact, case-sensitive category match.
  pub category: Option<String>,
  /// Case-insensitive substring of the title or description, matched as
  /// given (surrounding whitespace included).
  pub search:   Option<String>,
}

impl TaskFilter {
  /// Build a filter from raw query values. Empty strings and [`ALL`] leave a
  /// criterion unset; an unknown status or priority is a validation error.
  pub fn parse(
    status: Option<&str>,
    priority: Option<&str>,
    category: Option<&str>,
    search: Option<&str>,
  ) -> Result<Self> {
    Ok(Self {
      status:   criterion(status)
        .map(|s| {
          s.parse()
            .map_err(|_| Error::Validation(format!("unknown status filter {s:?}")))
        })
        .transpose()?,
      priority: criterion(priority)
        .map(|p| {
          p.parse()
            .map_err(|_| Error::Validation(format!("unknown priority filter {p:?}")))
        })
        .transpose()?,
      category: criterion(category).map(str::to_owned),
      search:   search.filter(|s| !s.is_empty()).map(str::to_owned),
    })
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn matches(&self, task: &Task) -> bool {
    if self.status.is_some_and(|s| s != task.status) {
      return false;
    }
    if self.priority.is_some_and(|p| p != task.priority) {
      return false;
    }
    if let Some(category) = &self.category
      && *category != task.category
    {
      return false;
    }
    if let Some(term) = &self.search {
      let term = term.to_lowercase();
      return task.title.to_lowercase().contains(&term)
        || task.description.to_lowercase().contains(&term);
    }
    true
  }
}

fn criterion(raw: Option<&str>) -> Option<&str> {
  raw.filter(|v| !v.is_empty() && *v != ALL)
}

/// Distinct categories in first-seen order.
pub fn categories<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
  let mut seen: Vec<String> = Vec::new();
  for task in tasks {
    if !seen.contains(&task.category) {
      seen.push(task.category.clone());
    }
  }
  seen
}

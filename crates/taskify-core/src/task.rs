//! Task types: the persisted record, its closed enumerations, and the
//! loosely-typed input that is validated into a create or update request.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};
use uuid::Uuid;

use crate::{Error, Result, access::CallerId};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Globally unique task identifier, assigned by the repository at creation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl Default for TaskId {
  fn default() -> Self { Self::new() }
}

impl From<Uuid> for TaskId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.hyphenated().fmt(f)
  }
}

impl FromStr for TaskId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
}

// ─── Closed sets ─────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
  #[default]
  Todo,
  InProgress,
  Completed,
}

// ─── Task ────────────────────────────────────────────────────────────────────

/// The sole persisted entity.
///
/// Serialised with the field names the web client expects: the identifier as
/// `_id` and the owner as `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  #[serde(rename = "_id")]
  pub id:          TaskId,
  pub title:       String,
  pub description: String,
  pub priority:    Priority,
  pub status:      Status,
  pub category:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub due_date:    Option<DateTime<Utc>>,
  #[serde(rename = "user")]
  pub owner_id:    CallerId,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Task {
  /// Build a fresh record owned by `owner`. Both timestamps are `now`.
  pub fn create(
    id: TaskId,
    owner: CallerId,
    fields: NewTask,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      title: fields.title,
      description: fields.description,
      priority: fields.priority,
      status: fields.status,
      category: fields.category,
      due_date: fields.due_date,
      owner_id: owner,
      created_at: now,
      updated_at: now,
    }
  }

  /// Apply the fields present in `patch` and refresh `updated_at`.
  ///
  /// `updated_at` advances even when the patch is empty, and never falls
  /// behind `created_at`.
  pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(priority) = patch.priority {
      self.priority = priority;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
    if let Some(due_date) = patch.due_date {
      self.due_date = due_date;
    }
    self.updated_at = now.max(self.created_at);
  }

  pub fn is_owned_by(&self, caller: &CallerId) -> bool { self.owner_id == *caller }
}

// ─── Validated requests ──────────────────────────────────────────────────────

/// The validated field set for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
  pub title:       String,
  pub description: String,
  pub priority:    Priority,
  pub status:      Status,
  pub category:    String,
  pub due_date:    Option<DateTime<Utc>>,
}

impl NewTask {
  /// Convenience constructor; `status` defaults to `todo` and there is no
  /// due date.
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    priority: Priority,
    category: impl Into<String>,
  ) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      priority,
      status: Status::default(),
      category: category.into(),
      due_date: None,
    }
  }
}

impl From<NewTask> for TaskInput {
  fn from(t: NewTask) -> Self {
    TaskInput {
      title:       Some(Some(t.title)),
      description: Some(Some(t.description)),
      priority:    Some(Some(t.priority.to_string())),
      status:      Some(Some(t.status.to_string())),
      category:    Some(Some(t.category)),
      due_date:    Some(t.due_date),
    }
  }
}

/// A validated partial update. `None` leaves the field unchanged; for
/// `due_date`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub priority:    Option<Priority>,
  pub status:      Option<Status>,
  pub category:    Option<String>,
  pub due_date:    Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Raw input ───────────────────────────────────────────────────────────────

/// A task payload as received from a caller, before validation.
///
/// Enumerations arrive as plain strings so that an out-of-set value is
/// reported as a validation failure naming the field, rather than as a
/// deserialisation error. Fields not listed here (`_id`, `user`, timestamps)
/// are ignored, which keeps them immutable.
///
/// Every field records whether it was present: the outer `None` is an absent
/// field, `Some(None)` an explicit `null`. Only `dueDate` accepts `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
  #[serde(default, deserialize_with = "present")]
  pub title:       Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub priority:    Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub status:      Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub category:    Option<Option<String>>,
  /// Absent: unchanged. `null`: cleared. A timestamp: set.
  #[serde(default, deserialize_with = "present")]
  pub due_date:    Option<Option<DateTime<Utc>>>,
}

/// Distinguish an explicit `null` from an absent field.
fn present<'de, D, T>(d: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(d).map(Some)
}

impl TaskInput {
  /// Validate this payload as a create request.
  pub fn into_new_task(self) -> Result<NewTask> {
    let mut v = Violations::default();

    let title = v.required_text("title", self.title);
    let description = v.required_text("description", self.description);
    let priority = match self.priority {
      Some(raw) => v.choice::<Priority>("priority", raw),
      None => v.missing("priority"),
    };
    let status = match self.status {
      Some(raw) => v.choice::<Status>("status", raw),
      None => Some(Status::default()),
    };
    let category = v.required_text("category", self.category);

    match (title, description, priority, status, category) {
      (
        Some(title),
        Some(description),
        Some(priority),
        Some(status),
        Some(category),
      ) if v.is_empty() => Ok(NewTask {
        title,
        description,
        priority,
        status,
        category,
        due_date: self.due_date.flatten(),
      }),
      _ => Err(v.into_error()),
    }
  }

  /// Validate this payload as a partial update. Only the present fields are
  /// checked.
  pub fn into_patch(self) -> Result<TaskPatch> {
    let mut v = Violations::default();

    let patch = TaskPatch {
      title:       self.title.and_then(|t| v.text("title", t)),
      description: self.description.and_then(|d| v.text("description", d)),
      priority:    self.priority.and_then(|p| v.choice("priority", p)),
      status:      self.status.and_then(|s| v.choice("status", s)),
      category:    self.category.and_then(|c| v.text("category", c)),
      due_date:    self.due_date,
    };

    if v.is_empty() { Ok(patch) } else { Err(v.into_error()) }
  }
}

// ─── Violations ──────────────────────────────────────────────────────────────

/// Collects every field violation so the caller sees all of them at once.
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
  fn is_empty(&self) -> bool { self.0.is_empty() }

  fn into_error(self) -> Error { Error::Validation(self.0.join("; ")) }

  fn missing<T>(&mut self, field: &str) -> Option<T> {
    self.0.push(format!("{field} is required"));
    None
  }

  fn non_null(&mut self, field: &str, raw: Option<String>) -> Option<String> {
    if raw.is_none() {
      self.0.push(format!("{field} must not be null"));
    }
    raw
  }

  /// A present text field: not `null`, not blank once trimmed.
  fn text(&mut self, field: &str, raw: Option<String>) -> Option<String> {
    let raw = self.non_null(field, raw)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      self.0.push(format!("{field} must not be empty"));
      None
    } else {
      Some(trimmed.to_owned())
    }
  }

  fn required_text(
    &mut self,
    field: &str,
    raw: Option<Option<String>>,
  ) -> Option<String> {
    match raw {
      Some(raw) => self.text(field, raw),
      None => self.missing(field),
    }
  }

  /// A present enumeration field: not `null`, one of `T`'s variants.
  fn choice<T>(&mut self, field: &str, raw: Option<String>) -> Option<T>
  where
    T: FromStr + VariantNames,
  {
    let raw = self.non_null(field, raw)?;
    match raw.parse() {
      Ok(value) => Some(value),
      Err(_) => {
        self.0.push(format!(
          "{field} must be one of {} (got {raw:?})",
          T::VARIANTS.join(", ")
        ));
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn input(value: serde_json::Value) -> TaskInput {
    serde_json::from_value(value).expect("task input")
  }

  fn valid() -> serde_json::Value {
    json!({
      "title": "Write report",
      "description": "Quarterly numbers",
      "priority": "high",
      "category": "Work",
    })
  }

  #[test]
  fn status_uses_kebab_case() {
    assert_eq!(Status::InProgress.to_string(), "in-progress");
    assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
    assert_eq!(
      serde_json::to_value(Status::InProgress).unwrap(),
      json!("in-progress")
    );
  }

  #[test]
  fn create_defaults_status_to_todo() {
    let new = input(valid()).into_new_task().unwrap();
    assert_eq!(new.status, Status::Todo);
    assert_eq!(new.priority, Priority::High);
    assert_eq!(new.due_date, None);
  }

  #[test]
  fn create_trims_text_fields() {
    let mut raw = valid();
    raw["title"] = json!("  padded  ");
    let new = input(raw).into_new_task().unwrap();
    assert_eq!(new.title, "padded");
  }

  #[test]
  fn create_rejects_unknown_priority() {
    let mut raw = valid();
    raw["priority"] = json!("urgent");
    let err = input(raw).into_new_task().unwrap_err();
    match err {
      Error::Validation(msg) => {
        assert!(msg.contains("priority"), "{msg}");
        assert!(msg.contains("urgent"), "{msg}");
      }
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn create_reports_every_missing_field() {
    let err = input(json!({ "title": "   " })).into_new_task().unwrap_err();
    let Error::Validation(msg) = err else { panic!("expected validation error") };
    for field in ["title", "description", "priority", "category"] {
      assert!(msg.contains(field), "{field} missing from {msg}");
    }
  }

  #[test]
  fn patch_distinguishes_null_from_absent_due_date() {
    let absent = input(json!({})).into_patch().unwrap();
    assert_eq!(absent.due_date, None);
    assert!(absent.is_empty());

    let cleared = input(json!({ "dueDate": null })).into_patch().unwrap();
    assert_eq!(cleared.due_date, Some(None));
  }

  #[test]
  fn explicit_null_is_rejected_outside_due_date() {
    let err = input(json!({ "status": null, "title": null }))
      .into_patch()
      .unwrap_err();
    let Error::Validation(msg) = err else { panic!("expected validation error") };
    assert!(msg.contains("status must not be null"), "{msg}");
    assert!(msg.contains("title must not be null"), "{msg}");

    let mut raw = valid();
    raw["category"] = json!(null);
    let err = input(raw).into_new_task().unwrap_err();
    let Error::Validation(msg) = err else { panic!("expected validation error") };
    assert_eq!(msg, "category must not be null");
  }

  #[test]
  fn patch_rejects_empty_title_and_bad_status() {
    let err = input(json!({ "title": "", "status": "done" }))
      .into_patch()
      .unwrap_err();
    let Error::Validation(msg) = err else { panic!("expected validation error") };
    assert!(msg.contains("title"));
    assert!(msg.contains("status"));
  }

  #[test]
  fn task_serialises_with_client_field_names() {
    let now = Utc::now();
    let task = Task::create(
      TaskId::new(),
      CallerId::from("user-1"),
      NewTask::new("t", "d", Priority::Low, "Home"),
      now,
    );
    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["_id"], json!(task.id.to_string()));
    assert_eq!(value["user"], json!("user-1"));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("dueDate").is_none());
  }

  #[test]
  fn apply_keeps_updated_at_monotonic() {
    let created = Utc::now();
    let mut task = Task::create(
      TaskId::new(),
      CallerId::from("u"),
      NewTask::new("t", "d", Priority::Low, "Home"),
      created,
    );
    task.apply(TaskPatch::default(), created - chrono::Duration::seconds(5));
    assert_eq!(task.updated_at, created);
  }
}

//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanoseconds, `Z`
//! suffix) so that lexical order matches chronological order. UUIDs are
//! stored as hyphenated lowercase strings; enumerations by their wire names.

use chrono::{DateTime, SecondsFormat, Utc};
use taskify_core::{
  access::CallerId,
  task::{Priority, Status, Task, TaskId},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── TaskId ──────────────────────────────────────────────────────────────────

pub fn encode_id(id: TaskId) -> String { id.as_uuid().hyphenated().to_string() }

pub fn decode_id(s: &str) -> Result<TaskId> { Ok(Uuid::parse_str(s)?.into()) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_priority(s: &str) -> Result<Priority> {
  s.parse().map_err(|_| Error::Corrupt {
    column: "priority",
    value:  s.to_owned(),
  })
}

pub fn decode_status(s: &str) -> Result<Status> {
  s.parse().map_err(|_| Error::Corrupt {
    column: "status",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` that yields a [`RawTask`].
pub const TASK_COLUMNS: &str = "task_id, owner_id, title, description, priority, \
                                status, category, due_date, created_at, updated_at";

/// Raw strings read directly from a `tasks` row.
pub struct RawTask {
  pub task_id:     String,
  pub owner_id:    String,
  pub title:       String,
  pub description: String,
  pub priority:    String,
  pub status:      String,
  pub category:    String,
  pub due_date:    Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawTask {
  /// Map a row selected with [`TASK_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      task_id:     row.get(0)?,
      owner_id:    row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      priority:    row.get(4)?,
      status:      row.get(5)?,
      category:    row.get(6)?,
      due_date:    row.get(7)?,
      created_at:  row.get(8)?,
      updated_at:  row.get(9)?,
    })
  }

  /// Encode a task for binding as statement parameters.
  pub fn from_task(task: &Task) -> Self {
    Self {
      task_id:     encode_id(task.id),
      owner_id:    task.owner_id.as_str().to_owned(),
      title:       task.title.clone(),
      description: task.description.clone(),
      priority:    task.priority.as_ref().to_owned(),
      status:      task.status.as_ref().to_owned(),
      category:    task.category.clone(),
      due_date:    task.due_date.map(encode_dt),
      created_at:  encode_dt(task.created_at),
      updated_at:  encode_dt(task.updated_at),
    }
  }

  pub fn into_task(self) -> Result<Task> {
    Ok(Task {
      id:          decode_id(&self.task_id)?,
      title:       self.title,
      description: self.description,
      priority:    decode_priority(&self.priority)?,
      status:      decode_status(&self.status)?,
      category:    self.category,
      due_date:    self.due_date.as_deref().map(decode_dt).transpose()?,
      owner_id:    CallerId::from(self.owner_id),
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

//! [`SqliteStore`] — the SQLite implementation of [`TaskStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use taskify_core::{
  access::CallerId,
  store::TaskStore,
  task::{Task, TaskId},
};

use crate::{
  Error, Result,
  encode::{RawTask, TASK_COLUMNS, encode_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Taskify task store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TaskStore impl ──────────────────────────────────────────────────────────

impl TaskStore for SqliteStore {
  type Error = Error;

  async fn get(&self, id: TaskId) -> Result<Option<Task>> {
    let id_str = encode_id(id);

    let raw: Option<RawTask> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ?1"),
              rusqlite::params![id_str],
              RawTask::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTask::into_task).transpose()
  }

  async fn list_by_owner(&self, owner: CallerId) -> Result<Vec<Task>> {
    let owner_str = owner.as_str().to_owned();

    let raws: Vec<RawTask> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawTask::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTask::into_task).collect()
  }

  async fn put(&self, task: Task) -> Result<()> {
    let raw = RawTask::from_task(&task);

    // `owner_id` and `created_at` are only ever written by the first insert.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (
             task_id, owner_id, title, description, priority,
             status, category, due_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT (task_id) DO UPDATE SET
             title       = excluded.title,
             description = excluded.description,
             priority    = excluded.priority,
             status      = excluded.status,
             category    = excluded.category,
             due_date    = excluded.due_date,
             updated_at  = excluded.updated_at",
          rusqlite::params![
            raw.task_id,
            raw.owner_id,
            raw.title,
            raw.description,
            raw.priority,
            raw.status,
            raw.category,
            raw.due_date,
            raw.created_at,
            raw.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace(&self, task: Task) -> Result<bool> {
    let raw = RawTask::from_task(&task);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE tasks SET
             title       = ?2,
             description = ?3,
             priority    = ?4,
             status      = ?5,
             category    = ?6,
             due_date    = ?7,
             updated_at  = ?8
           WHERE task_id = ?1",
          rusqlite::params![
            raw.task_id,
            raw.title,
            raw.description,
            raw.priority,
            raw.status,
            raw.category,
            raw.due_date,
            raw.updated_at,
          ],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete(&self, id: TaskId) -> Result<bool> {
    let id_str = encode_id(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM tasks WHERE task_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(removed > 0)
  }
}

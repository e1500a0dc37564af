//! [`LocalStore`] — a JSON-document implementation of [`TaskStore`].

use std::{path::PathBuf, sync::Arc, time::Duration};

use chrono::Utc;
use taskify_core::{
  access::CallerId,
  store::TaskStore,
  task::{Task, TaskId},
};
use tokio::sync::Mutex;

use crate::{Error, Result, document::Document, sample::sample_tasks};

/// A task store held in memory and, when opened from a path, mirrored to a
/// JSON file after every write.
///
/// All operations take the same async lock, so reads and writes are applied
/// one at a time. A write builds the next document, persists it, and only
/// then replaces the in-memory copy; a failed write leaves both untouched.
///
/// Cloning is cheap — clones share the same document.
#[derive(Clone)]
pub struct LocalStore {
  file:    Option<Arc<PathBuf>>,
  latency: Duration,
  doc:     Arc<Mutex<Document>>,
}

impl LocalStore {
  /// Open (or create) a store backed by the JSON file at `path`.
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    let doc = Document::load(&path).await?;
    Ok(Self {
      file:    Some(Arc::new(path)),
      latency: Duration::ZERO,
      doc:     Arc::new(Mutex::new(doc)),
    })
  }

  /// A store that lives only as long as the process.
  pub fn in_memory() -> Self {
    Self {
      file:    None,
      latency: Duration::ZERO,
      doc:     Arc::new(Mutex::new(Document::default())),
    }
  }

  /// Delay every operation by `latency`, simulating a remote round trip.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Seed the demo tasks for `owner` if the store holds no tasks at all.
  /// Returns how many tasks were added.
  pub async fn seed_sample_tasks(&self, owner: &CallerId) -> Result<usize> {
    let mut doc = self.doc.lock().await;
    if !doc.tasks.is_empty() {
      return Ok(0);
    }
    let mut next = doc.clone();
    next.tasks = sample_tasks(owner, Utc::now());
    let added = next.tasks.len();
    self.commit(&mut doc, next).await?;
    Ok(added)
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }

  /// Persist `next` (if file-backed) and install it as the current document.
  async fn commit(&self, current: &mut Document, next: Document) -> Result<()> {
    if let Some(path) = &self.file {
      next.save(path).await?;
    }
    *current = next;
    Ok(())
  }
}

// ─── TaskStore impl ──────────────────────────────────────────────────────────

impl TaskStore for LocalStore {
  type Error = Error;

  async fn get(&self, id: TaskId) -> Result<Option<Task>> {
    self.simulate_latency().await;
    let doc = self.doc.lock().await;
    Ok(doc.tasks.iter().find(|t| t.id == id).cloned())
  }

  async fn list_by_owner(&self, owner: CallerId) -> Result<Vec<Task>> {
    self.simulate_latency().await;
    let doc = self.doc.lock().await;
    Ok(
      doc
        .tasks
        .iter()
        .filter(|t| t.owner_id == owner)
        .cloned()
        .collect(),
    )
  }

  async fn put(&self, task: Task) -> Result<()> {
    self.simulate_latency().await;
    let mut doc = self.doc.lock().await;
    let mut next = doc.clone();
    match next.tasks.iter_mut().find(|t| t.id == task.id) {
      Some(existing) => {
        let owner_id = existing.owner_id.clone();
        let created_at = existing.created_at;
        *existing = Task { owner_id, created_at, ..task };
      }
      None => next.tasks.push(task),
    }
    self.commit(&mut doc, next).await
  }

  async fn replace(&self, task: Task) -> Result<bool> {
    self.simulate_latency().await;
    let mut doc = self.doc.lock().await;
    let mut next = doc.clone();
    let Some(existing) = next.tasks.iter_mut().find(|t| t.id == task.id) else {
      return Ok(false);
    };
    let owner_id = existing.owner_id.clone();
    let created_at = existing.created_at;
    *existing = Task { owner_id, created_at, ..task };
    self.commit(&mut doc, next).await?;
    Ok(true)
  }

  async fn delete(&self, id: TaskId) -> Result<bool> {
    self.simulate_latency().await;
    let mut doc = self.doc.lock().await;
    let Some(index) = doc.tasks.iter().position(|t| t.id == id) else {
      return Ok(false);
    };
    let mut next = doc.clone();
    next.tasks.remove(index);
    self.commit(&mut doc, next).await?;
    Ok(true)
  }
}

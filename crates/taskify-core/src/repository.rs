//! [`TaskRepository`]: task CRUD with per-owner visibility, plus the
//! aggregate reads built on top of the caller's visible set.
//!
//! The repository is the single implementation of the task rules; storage
//! bindings only implement [`TaskStore`].

use std::sync::Arc;

use chrono::Utc;

use crate::{
  Error, Result,
  access::{CallerId, authorize},
  filter::{self, TaskFilter},
  stats::{self, Dashboard, Summary},
  store::TaskStore,
  task::{Task, TaskId, TaskInput},
};

/// Task operations on behalf of a resolved caller.
///
/// Cloning is cheap; the store handle is reference-counted. Nothing is cached,
/// so every read observes the store's current state.
pub struct TaskRepository<S> {
  store: Arc<S>,
}

impl<S> Clone for TaskRepository<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TaskStore> TaskRepository<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every task owned by `caller`, in insertion order.
  pub async fn list(&self, caller: &CallerId) -> Result<Vec<Task>> {
    self
      .store
      .list_by_owner(caller.clone())
      .await
      .map_err(Error::storage)
  }

  /// [`list`](Self::list) narrowed by `filter`.
  pub async fn list_filtered(
    &self,
    caller: &CallerId,
    filter: &TaskFilter,
  ) -> Result<Vec<Task>> {
    let mut tasks = self.list(caller).await?;
    if !filter.is_empty() {
      tasks.retain(|t| filter.matches(t));
    }
    Ok(tasks)
  }

  /// Fetch one task. Existence is checked before ownership, so a missing id
  /// is [`Error::NotFound`] whoever asks.
  pub async fn get(&self, caller: &CallerId, id: TaskId) -> Result<Task> {
    let task = self
      .store
      .get(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::NotFound(id))?;
    authorize(caller, &task)?;
    Ok(task)
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate `input` and persist a new task owned by `caller`.
  pub async fn create(&self, caller: &CallerId, input: TaskInput) -> Result<Task> {
    let fields = input.into_new_task()?;
    let task = Task::create(TaskId::new(), caller.clone(), fields, Utc::now());
    self.store.put(task.clone()).await.map_err(Error::storage)?;
    Ok(task)
  }

  /// Apply the fields present in `input` to a task owned by `caller`.
  ///
  /// The payload is validated only after the task is found and authorised.
  /// `updated_at` advances even when `input` is empty. A task deleted while
  /// the update is in flight stays deleted.
  pub async fn update(
    &self,
    caller: &CallerId,
    id: TaskId,
    input: TaskInput,
  ) -> Result<Task> {
    let mut task = self.get(caller, id).await?;
    let patch = input.into_patch()?;
    task.apply(patch, Utc::now());
    let replaced = self.store.replace(task.clone()).await.map_err(Error::storage)?;
    if replaced { Ok(task) } else { Err(Error::NotFound(id)) }
  }

  /// Permanently remove a task owned by `caller`.
  pub async fn delete(&self, caller: &CallerId, id: TaskId) -> Result<()> {
    self.get(caller, id).await?;
    let removed = self.store.delete(id).await.map_err(Error::storage)?;
    if removed { Ok(()) } else { Err(Error::NotFound(id)) }
  }

  // ── Aggregates ────────────────────────────────────────────────────────

  /// Summary statistics over everything `caller` can see.
  pub async fn stats(&self, caller: &CallerId) -> Result<Summary> {
    let tasks = self.list(caller).await?;
    Ok(stats::summarize(&tasks))
  }

  pub async fn dashboard(&self, caller: &CallerId) -> Result<Dashboard> {
    let tasks = self.list(caller).await?;
    Ok(Dashboard::build(&tasks))
  }

  /// Distinct categories of `caller`'s tasks, in first-seen order.
  pub async fn categories(&self, caller: &CallerId) -> Result<Vec<String>> {
    let tasks = self.list(caller).await?;
    Ok(filter::categories(&tasks))
  }
}

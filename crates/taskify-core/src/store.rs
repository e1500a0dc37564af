//! The `TaskStore` trait: the storage capability the repository is built on.
//!
//! The trait is implemented by storage backends (`taskify-store-sqlite`,
//! `taskify-store-local`). It knows nothing about callers or validation;
//! ownership rules live in [`crate::repository::TaskRepository`].

use std::future::Future;

use crate::{
  access::CallerId,
  task::{Task, TaskId},
};

/// Abstraction over a task record store.
///
/// Each write touches exactly one record and either fully applies or fails.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TaskStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a task by id, whoever owns it. Returns `None` if not found.
  fn get(
    &self,
    id: TaskId,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  /// All tasks owned by `owner`, in insertion order.
  fn list_by_owner(
    &self,
    owner: CallerId,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  /// Insert `task`, or replace the stored record with the same id.
  ///
  /// Replacing keeps the record's original insertion position.
  fn put(
    &self,
    task: Task,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite the stored record with the same id as `task`. Never inserts:
  /// returns `false` if no record had that id.
  ///
  /// The record keeps its owner, creation time, and insertion position.
  fn replace(
    &self,
    task: Task,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Permanently remove a task. Returns `false` if no record had that id.
  fn delete(
    &self,
    id: TaskId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

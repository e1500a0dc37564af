//! Error types for `taskify-core`.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more fields of a task payload are missing or out of range.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("task not found: {0}")]
  NotFound(TaskId),

  /// The task exists but belongs to a different caller.
  #[error("not authorized to access task {0}")]
  Unauthorized(TaskId),

  /// No verified caller identity accompanied the request.
  #[error("unauthenticated")]
  Unauthenticated,

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error. Storage failures are surfaced as-is, never retried.
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

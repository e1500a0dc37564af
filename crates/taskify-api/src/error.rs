//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use taskify_core::Error as CoreError;
use thiserror::Error;

use crate::response::Envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// The request body was not well-formed JSON of the expected shape.
  #[error("malformed request body: {0}")]
  MalformedBody(#[from] JsonRejection),

  /// A path id that cannot name any task.
  #[error("task not found")]
  UnknownId,

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("failed to issue token: {0}")]
  TokenIssue(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(e) => match e {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Unauthorized(_) => StatusCode::FORBIDDEN,
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      },
      ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      ApiError::UnknownId => StatusCode::NOT_FOUND,
      ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
      ApiError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// The message shown to the client.
  fn message(&self) -> String {
    match self {
      ApiError::Core(CoreError::Validation(m)) => m.clone(),
      ApiError::Core(CoreError::NotFound(_)) | ApiError::UnknownId => {
        "Task not found".to_owned()
      }
      ApiError::Core(CoreError::Unauthorized(_)) => {
        "Not authorized to access this task".to_owned()
      }
      ApiError::Core(CoreError::Unauthenticated) => {
        "Not authorized, no valid token".to_owned()
      }
      ApiError::Core(CoreError::StorageUnavailable(_)) => {
        "Task storage is unavailable".to_owned()
      }
      ApiError::MalformedBody(e) => e.body_text(),
      ApiError::InvalidCredentials => "Invalid email or password".to_owned(),
      ApiError::TokenIssue(_) => "Could not issue a session token".to_owned(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }

    let mut res = (status, Json(Envelope::<()>::failure(self.message()))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"taskify\""),
      );
    }
    res
  }
}

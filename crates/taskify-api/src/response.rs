//! The JSON envelope wrapped around every response body.

use axum::Json;
use serde::Serialize;

/// `{"success": true, "data": ...}` on success, `{"success": false,
/// "message": ...}` on failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> Envelope<T> {
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      data:    None,
      message: Some(message.into()),
    }
  }
}

/// Wrap `data` in a success envelope.
pub fn data<T: Serialize>(data: T) -> Json<Envelope<T>> {
  Json(Envelope {
    success: true,
    data:    Some(data),
    message: None,
  })
}

/// A success envelope that carries only a message.
pub fn message(message: impl Into<String>) -> Json<Envelope<()>> {
  Json(Envelope {
    success: true,
    data:    None,
    message: Some(message.into()),
  })
}

//! Request-level error type. Converts into a JSON error body with a status code.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  /// A content id that is not (or no longer) in its session store.
  #[error("{kind} {id} not found")]
  NotFound { kind: &'static str, id: String },

  #[error("progress store I/O failed: {0}")]
  Storage(#[from] std::io::Error),

  #[error("progress document is malformed: {0}")]
  CorruptProgress(#[from] serde_json::Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl AppError {
  pub fn not_found(kind: &'static str, id: &str) -> Self {
    AppError::NotFound { kind, id: id.to_string() }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, code) = match &self {
      AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
      AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
      AppError::Storage(_) | AppError::CorruptProgress(_) => {
        error!(target: "progress", error = %self, "Progress storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
      }
    };
    (status, Json(json!({ "error": self.to_string(), "code": code }))).into_response()
  }
}

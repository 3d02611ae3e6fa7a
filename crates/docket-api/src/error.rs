//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid {field}: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("store error: {0}")]
  Store(#[source] docket_core::Error),
}

/// Map a store-layer failure onto the matching HTTP classification.
pub(crate) fn store_err<E>(err: E) -> ApiError
where
  E: Into<docket_core::Error>,
{
  ApiError::from(err.into())
}

impl From<docket_core::Error> for ApiError {
  fn from(err: docket_core::Error) -> Self {
    use docket_core::Error as E;
    match err {
      E::UserNotFound(_)
      | E::ProjectNotFound(_)
      | E::TaskNotFound(_)
      | E::DocumentNotFound(_)
      | E::CommentNotFound(_)
      | E::NotificationNotFound(_) => ApiError::NotFound(err.to_string()),
      E::AlreadyRead(_) | E::EmptyTeam(_) => {
        ApiError::BadRequest(err.to_string())
      }
      E::EmailTaken(_) => ApiError::Validation {
        field:   "email",
        message: err.to_string(),
      },
      E::Validation { field, message } => ApiError::Validation { field, message },
      E::Storage(_) => ApiError::Store(err),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation { field, message } => (
        StatusCode::BAD_REQUEST,
        json!({ "error": message, "field": field }),
      ),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": e.to_string() }),
      ),
    };
    (status, Json(body)).into_response()
  }
}

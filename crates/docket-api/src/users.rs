//! Handlers for `/users` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  entity::{NewUser, User},
  store::TrackerStore,
};
use uuid::Uuid;

use crate::error::{ApiError, store_err};

/// `POST /users` — returns 201 + the stored user.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let user = store.add_user(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: TrackerStore,
{
  let user = store
    .get_user(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

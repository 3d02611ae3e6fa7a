//! Handlers for `/comments` endpoints.
//!
//! Comments hang off tasks; the owning project is derived from the task at
//! creation. Updates may only replace the text.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  entity::{Comment, NewComment},
  store::{CommentFilter, TrackerStore},
  validate,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, store_err};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Takes precedence over `project_id` when both are given.
  pub task_id:    Option<Uuid>,
  pub project_id: Option<Uuid>,
}

/// `GET /comments?task_id=<id>` or `GET /comments?project_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: TrackerStore,
{
  let filter = if let Some(task_id) = params.task_id {
    CommentFilter::Task(task_id)
  } else if let Some(project_id) = params.project_id {
    CommentFilter::Project(project_id)
  } else {
    return Err(ApiError::BadRequest(
      "task_id or project_id is required".into(),
    ));
  };

  let comments = store.list_comments(filter).await.map_err(store_err)?;
  Ok(Json(comments))
}

/// `POST /comments` — returns 201 + the stored comment.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewComment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (comment, _) = store.create_comment(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /comments/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError>
where
  S: TrackerStore,
{
  let comment = store
    .get_comment(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("comment {id} not found")))?;
  Ok(Json(comment))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub text: String,
}

/// `PUT /comments/:id` — body: `{"text":"..."}`; author and parentage are
/// immutable.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Comment>, ApiError>
where
  S: TrackerStore,
{
  validate::non_empty("text", &body.text)?;
  let (comment, _) =
    store.update_comment(id, body.text).await.map_err(store_err)?;
  Ok(Json(comment))
}

/// `DELETE /comments/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  store.delete_comment(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

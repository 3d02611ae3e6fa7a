//! Handlers for `/tasks` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tasks` | `?project_id` required |
//! | `POST`   | `/tasks` | Body: [`NewTask`]; returns 201 + stored task |
//! | `GET`    | `/tasks/:id` | Single task |
//! | `PUT`    | `/tasks/:id` | Full replacement, body: [`NewTask`] |
//! | `POST`   | `/tasks/:id/assign` | Body: `{"assignee":"..."}`; notifies the assignee |
//! | `DELETE` | `/tasks/:id` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  entity::{NewTask, Task},
  store::TrackerStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, store_err};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub project_id: Option<Uuid>,
}

/// `GET /tasks?project_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError>
where
  S: TrackerStore,
{
  let project_id = params
    .project_id
    .ok_or_else(|| ApiError::BadRequest("project_id is required".into()))?;
  let tasks = store.list_tasks(project_id).await.map_err(store_err)?;
  Ok(Json(tasks))
}

/// `POST /tasks` — returns 201 + the stored task. The timeline event is
/// attributed to the assignee.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (task, _) = store.create_task(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError>
where
  S: TrackerStore,
{
  let task = store
    .get_task(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("task {id} not found")))?;
  Ok(Json(task))
}

/// `PUT /tasks/:id` — full replacement, body: [`NewTask`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewTask>,
) -> Result<Json<Task>, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (task, _) = store.update_task(id, body).await.map_err(store_err)?;
  Ok(Json(task))
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub assignee: Uuid,
}

/// `POST /tasks/:id/assign` — reassign and notify the new assignee.
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<Task>, ApiError>
where
  S: TrackerStore,
{
  let (task, _) = store
    .assign_task(id, body.assignee)
    .await
    .map_err(store_err)?;
  Ok(Json(task))
}

/// `DELETE /tasks/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  store.delete_task(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

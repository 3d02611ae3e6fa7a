//! Handlers for `/projects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects` | All projects |
//! | `POST`   | `/projects` | Body: [`NewProject`]; returns 201 + stored project |
//! | `GET`    | `/projects/:id` | Single project |
//! | `PUT`    | `/projects/:id` | Full replacement, body: [`NewProject`] |
//! | `DELETE` | `/projects/:id` | 204; recorded events survive the delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  entity::{NewProject, Project},
  store::TrackerStore,
};
use uuid::Uuid;

use crate::error::{ApiError, store_err};

/// `GET /projects`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Project>>, ApiError>
where
  S: TrackerStore,
{
  let projects = store.list_projects().await.map_err(store_err)?;
  Ok(Json(projects))
}

/// `POST /projects` — returns 201 + the stored project.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (project, _) = store.create_project(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError>
where
  S: TrackerStore,
{
  let project = store
    .get_project(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))?;
  Ok(Json(project))
}

/// `PUT /projects/:id` — full replacement; the team list is replaced in order.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewProject>,
) -> Result<Json<Project>, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (project, _) = store.update_project(id, body).await.map_err(store_err)?;
  Ok(Json(project))
}

/// `DELETE /projects/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  store.delete_project(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

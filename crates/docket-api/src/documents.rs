//! Handlers for `/documents` endpoints. Metadata only; file bodies live
//! elsewhere.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use docket_core::{
  entity::{Document, NewDocument},
  store::TrackerStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, store_err};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub project_id: Option<Uuid>,
}

/// `GET /documents?project_id=<id>`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError>
where
  S: TrackerStore,
{
  let project_id = params
    .project_id
    .ok_or_else(|| ApiError::BadRequest("project_id is required".into()))?;
  let documents = store.list_documents(project_id).await.map_err(store_err)?;
  Ok(Json(documents))
}

/// `POST /documents` — returns 201 + the stored document. Recorded on the
/// timeline as an upload.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDocument>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (document, _) = store.create_document(body).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError>
where
  S: TrackerStore,
{
  let document = store
    .get_document(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(document))
}

/// `PUT /documents/:id` — full replacement, body: [`NewDocument`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewDocument>,
) -> Result<Json<Document>, ApiError>
where
  S: TrackerStore,
{
  body.validate()?;
  let (document, _) =
    store.update_document(id, body).await.map_err(store_err)?;
  Ok(Json(document))
}

/// `DELETE /documents/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  store.delete_document(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}

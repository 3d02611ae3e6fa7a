//! Handler for the `/timeline` endpoint — the read side of the audit trail.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use docket_core::{
  event::TimelineEvent,
  store::{EventQuery, TrackerStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, store_err};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to one project's history. Unknown or deleted ids are a 404.
  pub project_id: Option<Uuid>,
  /// Page size; defaults to 100, capped at 500.
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// `GET /timeline[?project_id=...][&limit=...][&offset=...]`
///
/// Events come back newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError>
where
  S: TrackerStore,
{
  let events = store
    .list_events(EventQuery {
      project_id: params.project_id,
      limit:      params.limit,
      offset:     params.offset,
    })
    .await
    .map_err(store_err)?;
  Ok(Json(events))
}

//! Handlers for `/notifications` endpoints.
//!
//! There is no session concept; callers identify themselves with a `user_id`
//! query parameter. A notification is only visible to its recipient.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use docket_core::{notification::Notification, store::TrackerStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, store_err};

#[derive(Debug, Deserialize)]
pub struct UserParams {
  pub user_id: Uuid,
}

/// `GET /notifications?user_id=<id>` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<UserParams>,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: TrackerStore,
{
  let notifications = store
    .list_notifications(params.user_id)
    .await
    .map_err(store_err)?;
  Ok(Json(notifications))
}

/// `PUT /notifications/:id/mark_read?user_id=<id>`
///
/// 404 covers both an unknown notification and one belonging to someone
/// else; marking twice is a 400.
pub async fn mark_read<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<UserParams>,
) -> Result<Json<Notification>, ApiError>
where
  S: TrackerStore,
{
  let notification = store
    .mark_notification_read(id, params.user_id)
    .await
    .map_err(store_err)?;
  Ok(Json(notification))
}

//! User notifications.
//!
//! Notifications share the timeline's append-flavoured shape: rows are
//! created by the store and the only mutation ever applied is flipping
//! `is_read` from false to true, exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub user_id:         Uuid,
  pub message:         String,
  pub is_read:         bool,
  pub created_at:      DateTime<Utc>,
}

//! Error types for `docket-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("project not found: {0}")]
  ProjectNotFound(Uuid),

  #[error("task not found: {0}")]
  TaskNotFound(Uuid),

  #[error("document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  /// Mark-read on a notification whose flag already flipped.
  #[error("notification {0} is already read")]
  AlreadyRead(Uuid),

  /// No actor can be attributed because the project has no team members.
  /// Events are never written without an actor.
  #[error("project {0} has an empty team, cannot attribute an actor")]
  EmptyTeam(Uuid),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("invalid {field}: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

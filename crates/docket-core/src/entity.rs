//! The tracked entities: users, projects, tasks, documents and comments.
//!
//! Stored types carry server-assigned fields (identifiers, creation stamps);
//! the `New*` input types carry only what a caller may supply. Validation
//! rules for the inputs live in [`crate::validate`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Users ───────────────────────────────────────────────────────────────────

/// The role a user holds, carried on their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Qa,
  Manager,
  Developer,
}

/// Optional per-user profile data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub role:           Role,
  /// 11 digits, starting with `03`.
  pub contact_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub username:   Option<String>,
  pub email:      String,
  pub profile:    Option<Profile>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
  pub username: Option<String>,
  pub email:    String,
  pub profile:  Option<Profile>,
}

// ─── Projects ────────────────────────────────────────────────────────────────

/// A project with an ordered team.
///
/// `team_members` preserves the order members were supplied in; the first
/// member is the fallback actor for project and document events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub project_id:   Uuid,
  pub title:        String,
  pub description:  String,
  pub start_date:   NaiveDate,
  pub end_date:     NaiveDate,
  pub team_members: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
  pub title:        String,
  pub description:  String,
  pub start_date:   NaiveDate,
  pub end_date:     NaiveDate,
  pub team_members: Vec<Uuid>,
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  #[default]
  Open,
  Review,
  Working,
  Awaiting,
  Release,
  WaitingQa,
}

/// A task inside a project, always held by exactly one assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub task_id:     Uuid,
  pub title:       String,
  pub description: String,
  pub status:      TaskStatus,
  pub project_id:  Uuid,
  pub assignee_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
  pub title:       String,
  pub description: String,
  #[serde(default)]
  pub status:      TaskStatus,
  pub project_id:  Uuid,
  pub assignee_id: Uuid,
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// A document attached to a project. Only the metadata is stored; the file
/// body itself lives outside this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub document_id: Uuid,
  pub name:        String,
  pub description: String,
  pub file_name:   Option<String>,
  pub version:     f64,
  pub project_id:  Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
  pub name:        String,
  pub description: String,
  pub file_name:   Option<String>,
  #[serde(default = "default_version")]
  pub version:     f64,
  pub project_id:  Uuid,
}

fn default_version() -> f64 { 1.0 }

// ─── Comments ────────────────────────────────────────────────────────────────

/// A comment on a task. `project_id` is derived from the task at creation,
/// never supplied by the caller; author and parentage are fixed for life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub text:       String,
  pub author_id:  Uuid,
  pub task_id:    Uuid,
  pub project_id: Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
  pub text:      String,
  pub author_id: Uuid,
  pub task_id:   Uuid,
}

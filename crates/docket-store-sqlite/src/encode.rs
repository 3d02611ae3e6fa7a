//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as ISO 8601 `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings, and enums as their snake_case
//! discriminants.

use chrono::{DateTime, NaiveDate, Utc};
use docket_core::{
  entity::{Comment, Document, Profile, Project, Role, Task, TaskStatus, User},
  event::{EventType, SubjectRef, TimelineEvent},
  notification::Notification,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Qa => "qa",
    Role::Manager => "manager",
    Role::Developer => "developer",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "qa" => Ok(Role::Qa),
    "manager" => Ok(Role::Manager),
    "developer" => Ok(Role::Developer),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── TaskStatus ──────────────────────────────────────────────────────────────

pub fn encode_task_status(s: TaskStatus) -> &'static str {
  match s {
    TaskStatus::Open => "open",
    TaskStatus::Review => "review",
    TaskStatus::Working => "working",
    TaskStatus::Awaiting => "awaiting",
    TaskStatus::Release => "release",
    TaskStatus::WaitingQa => "waiting_qa",
  }
}

pub fn decode_task_status(s: &str) -> Result<TaskStatus> {
  match s {
    "open" => Ok(TaskStatus::Open),
    "review" => Ok(TaskStatus::Review),
    "working" => Ok(TaskStatus::Working),
    "awaiting" => Ok(TaskStatus::Awaiting),
    "release" => Ok(TaskStatus::Release),
    "waiting_qa" => Ok(TaskStatus::WaitingQa),
    other => Err(Error::Decode(format!("unknown task status: {other:?}"))),
  }
}

// ─── EventType ───────────────────────────────────────────────────────────────

pub fn encode_event_type(t: EventType) -> &'static str {
  match t {
    EventType::ProjectCreated => "project_created",
    EventType::ProjectUpdated => "project_updated",
    EventType::ProjectDeleted => "project_deleted",
    EventType::TaskCreated => "task_created",
    EventType::TaskUpdated => "task_updated",
    EventType::TaskDeleted => "task_deleted",
    EventType::DocumentUploaded => "document_uploaded",
    EventType::DocumentUpdated => "document_updated",
    EventType::DocumentDeleted => "document_deleted",
    EventType::CommentCreated => "comment_created",
    EventType::CommentUpdated => "comment_updated",
    EventType::CommentDeleted => "comment_deleted",
  }
}

pub fn decode_event_type(s: &str) -> Result<EventType> {
  match s {
    "project_created" => Ok(EventType::ProjectCreated),
    "project_updated" => Ok(EventType::ProjectUpdated),
    "project_deleted" => Ok(EventType::ProjectDeleted),
    "task_created" => Ok(EventType::TaskCreated),
    "task_updated" => Ok(EventType::TaskUpdated),
    "task_deleted" => Ok(EventType::TaskDeleted),
    "document_uploaded" => Ok(EventType::DocumentUploaded),
    "document_updated" => Ok(EventType::DocumentUpdated),
    "document_deleted" => Ok(EventType::DocumentDeleted),
    "comment_created" => Ok(EventType::CommentCreated),
    "comment_updated" => Ok(EventType::CommentUpdated),
    "comment_deleted" => Ok(EventType::CommentDeleted),
    other => Err(Error::Decode(format!("unknown event type: {other:?}"))),
  }
}

// ─── SubjectRef ──────────────────────────────────────────────────────────────

/// Split a subject reference into the `(subject_kind, subject_id)` column
/// pair; the pair form makes exactly-one-subject true by construction.
pub fn encode_subject(subject: SubjectRef) -> (&'static str, String) {
  let kind = match subject {
    SubjectRef::Project(_) => "project",
    SubjectRef::Task(_) => "task",
    SubjectRef::Document(_) => "document",
    SubjectRef::Comment(_) => "comment",
  };
  (kind, encode_uuid(subject.id()))
}

pub fn decode_subject(kind: &str, id: &str) -> Result<SubjectRef> {
  let id = decode_uuid(id)?;
  match kind {
    "project" => Ok(SubjectRef::Project(id)),
    "task" => Ok(SubjectRef::Task(id)),
    "document" => Ok(SubjectRef::Document(id)),
    "comment" => Ok(SubjectRef::Comment(id)),
    other => Err(Error::Decode(format!("unknown subject kind: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings from a `users` row left-joined with `profiles`.
pub struct RawUser {
  pub user_id:        String,
  pub username:       Option<String>,
  pub email:          String,
  pub created_at:     String,
  pub role:           Option<String>,
  pub contact_number: Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    let profile = match (self.role, self.contact_number) {
      (Some(role), Some(contact_number)) => Some(Profile {
        role: decode_role(&role)?,
        contact_number,
      }),
      _ => None,
    };

    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      email:      self.email,
      profile,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings from a `projects` row; the ordered team is loaded separately
/// from `project_members`.
pub struct RawProject {
  pub project_id:  String,
  pub title:       String,
  pub description: String,
  pub start_date:  String,
  pub end_date:    String,
}

impl RawProject {
  pub fn into_project(self, team_members: Vec<Uuid>) -> Result<Project> {
    Ok(Project {
      project_id:  decode_uuid(&self.project_id)?,
      title:       self.title,
      description: self.description,
      start_date:  decode_date(&self.start_date)?,
      end_date:    decode_date(&self.end_date)?,
      team_members,
    })
  }
}

/// Raw strings from a `tasks` row.
pub struct RawTask {
  pub task_id:     String,
  pub title:       String,
  pub description: String,
  pub status:      String,
  pub project_id:  String,
  pub assignee_id: String,
}

impl RawTask {
  pub fn into_task(self) -> Result<Task> {
    Ok(Task {
      task_id:     decode_uuid(&self.task_id)?,
      title:       self.title,
      description: self.description,
      status:      decode_task_status(&self.status)?,
      project_id:  decode_uuid(&self.project_id)?,
      assignee_id: decode_uuid(&self.assignee_id)?,
    })
  }
}

/// Raw strings from a `documents` row.
pub struct RawDocument {
  pub document_id: String,
  pub name:        String,
  pub description: String,
  pub file_name:   Option<String>,
  pub version:     f64,
  pub project_id:  String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id: decode_uuid(&self.document_id)?,
      name:        self.name,
      description: self.description,
      file_name:   self.file_name,
      version:     self.version,
      project_id:  decode_uuid(&self.project_id)?,
    })
  }
}

/// Raw strings from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub text:       String,
  pub author_id:  String,
  pub created_at: String,
  pub task_id:    String,
  pub project_id: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      text:       self.text,
      author_id:  decode_uuid(&self.author_id)?,
      task_id:    decode_uuid(&self.task_id)?,
      project_id: decode_uuid(&self.project_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings from a `timeline_events` row.
pub struct RawEvent {
  pub seq:          i64,
  pub event_id:     String,
  pub event_type:   String,
  pub description:  String,
  pub timestamp:    String,
  pub subject_kind: String,
  pub subject_id:   String,
  pub project_id:   String,
  pub user_id:      String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<TimelineEvent> {
    Ok(TimelineEvent {
      event_id:    decode_uuid(&self.event_id)?,
      seq:         self.seq,
      event_type:  decode_event_type(&self.event_type)?,
      description: self.description,
      timestamp:   decode_dt(&self.timestamp)?,
      subject:     decode_subject(&self.subject_kind, &self.subject_id)?,
      project_id:  decode_uuid(&self.project_id)?,
      actor:       decode_uuid(&self.user_id)?,
    })
  }
}

/// Raw strings from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub user_id:         String,
  pub message:         String,
  pub is_read:         bool,
  pub created_at:      String,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      message:         self.message,
      is_read:         self.is_read,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

//! Timeline events — the append-only audit trail.
//!
//! An event is written exactly once, when a tracked entity goes through a
//! lifecycle transition, and is never updated or deleted afterwards. Its
//! description is frozen at write time: renaming or deleting the subject
//! later must not change what was recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Event type ──────────────────────────────────────────────────────────────

/// What happened, to which kind of entity.
///
/// Document creation is recorded as an upload; every other kind uses the
/// plain created/updated/deleted triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
  ProjectCreated,
  ProjectUpdated,
  ProjectDeleted,
  TaskCreated,
  TaskUpdated,
  TaskDeleted,
  DocumentUploaded,
  DocumentUpdated,
  DocumentDeleted,
  CommentCreated,
  CommentUpdated,
  CommentDeleted,
}

// ─── Subject reference ───────────────────────────────────────────────────────

/// The single entity reference an event carries.
///
/// Exactly one variant is present, matching the prefix of the event type.
/// The id is kept verbatim for the life of the event — after the subject is
/// deleted it simply dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectRef {
  Project(Uuid),
  Task(Uuid),
  Document(Uuid),
  Comment(Uuid),
}

impl SubjectRef {
  pub fn id(&self) -> Uuid {
    match self {
      SubjectRef::Project(id)
      | SubjectRef::Task(id)
      | SubjectRef::Document(id)
      | SubjectRef::Comment(id) => *id,
    }
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A recorded timeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
  pub event_id:    Uuid,
  /// Store-assigned insertion sequence; breaks ties between events that
  /// share a timestamp.
  pub seq:         i64,
  pub event_type:  EventType,
  pub description: String,
  /// Assigned by the store at write time; never mutated.
  pub timestamp:   DateTime<Utc>,
  #[serde(flatten)]
  pub subject:     SubjectRef,
  /// The owning project at the time of recording. Present on every event,
  /// including project events themselves, so a project's timeline includes
  /// the events of its tasks, documents and comments.
  pub project_id:  Uuid,
  #[serde(rename = "user")]
  pub actor:       Uuid,
}

/// Input for appending an event. `event_id`, `seq` and `timestamp` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimelineEvent {
  pub event_type:  EventType,
  pub description: String,
  pub subject:     SubjectRef,
  pub project_id:  Uuid,
  pub actor:       Uuid,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  // The JSON shape is a wire contract: the subject flattens to a single
  // `"task": "<id>"` style key and the actor goes out as `"user"`.
  #[test]
  fn event_json_shape() {
    let task_id = Uuid::new_v4();
    let event = TimelineEvent {
      event_id:    Uuid::new_v4(),
      seq:         7,
      event_type:  EventType::TaskCreated,
      description: "Task 'T1' was created in project 'Alpha'".into(),
      timestamp:   Utc::now(),
      subject:     SubjectRef::Task(task_id),
      project_id:  Uuid::new_v4(),
      actor:       Uuid::new_v4(),
    };

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event_type"], "task_created");
    assert_eq!(json["task"], task_id.to_string());
    assert_eq!(json["user"], event.actor.to_string());
    assert!(json.get("subject").is_none());
    assert!(json.get("actor").is_none());

    let back: TimelineEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
  }
}

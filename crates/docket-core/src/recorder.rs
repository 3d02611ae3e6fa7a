//! The timeline recorder: turns an [`EntityChange`] into the event appended
//! to the timeline.
//!
//! Everything here is pure. The persistence layer resolves the actor, wraps
//! it into a change notice together with the snapshot, and inserts whatever
//! [`build_event`] returns, all inside the transaction that performs the
//! entity write itself.

use uuid::Uuid;

use crate::{
  error::{Error, Result},
  event::{EventType, NewTimelineEvent},
  lifecycle::{EntityChange, EntitySnapshot, Transition},
};

// ─── Actor resolution ────────────────────────────────────────────────────────

/// Who a transition is attributed to.
///
/// | Entity   | actor                                      |
/// |----------|--------------------------------------------|
/// | Project  | first team member, in stored member order  |
/// | Task     | the task's sole assignee                   |
/// | Document | first team member of the owning project    |
/// | Comment  | the comment's author                       |
///
/// The same rule applies to deletes, evaluated on the snapshot taken before
/// removal. An empty team is an error: an event is never written without an
/// actor.
pub fn resolve_actor(snapshot: &EntitySnapshot) -> Result<Uuid> {
  match snapshot {
    EntitySnapshot::Project(project) => {
      first_member(&project.team_members, project.project_id)
    }
    EntitySnapshot::Task { task, .. } => Ok(task.assignee_id),
    EntitySnapshot::Document { project, .. } => {
      first_member(&project.team_members, project.project_id)
    }
    EntitySnapshot::Comment { comment, .. } => Ok(comment.author_id),
  }
}

fn first_member(team: &[Uuid], project_id: Uuid) -> Result<Uuid> {
  team.first().copied().ok_or(Error::EmptyTeam(project_id))
}

// ─── Event construction ──────────────────────────────────────────────────────

/// Build the event a change appends.
///
/// The description is composed here, once, from the snapshot; stores persist
/// it verbatim and never regenerate it.
pub fn build_event(change: &EntityChange) -> NewTimelineEvent {
  NewTimelineEvent {
    event_type:  event_type(change),
    description: describe(change),
    subject:     change.snapshot.subject(),
    project_id:  change.snapshot.project_id(),
    actor:       change.actor,
  }
}

fn event_type(change: &EntityChange) -> EventType {
  use Transition::*;
  match (&change.snapshot, change.transition) {
    (EntitySnapshot::Project(_), Created) => EventType::ProjectCreated,
    (EntitySnapshot::Project(_), Updated) => EventType::ProjectUpdated,
    (EntitySnapshot::Project(_), Deleted) => EventType::ProjectDeleted,
    (EntitySnapshot::Task { .. }, Created) => EventType::TaskCreated,
    (EntitySnapshot::Task { .. }, Updated) => EventType::TaskUpdated,
    (EntitySnapshot::Task { .. }, Deleted) => EventType::TaskDeleted,
    (EntitySnapshot::Document { .. }, Created) => EventType::DocumentUploaded,
    (EntitySnapshot::Document { .. }, Updated) => EventType::DocumentUpdated,
    (EntitySnapshot::Document { .. }, Deleted) => EventType::DocumentDeleted,
    (EntitySnapshot::Comment { .. }, Created) => EventType::CommentCreated,
    (EntitySnapshot::Comment { .. }, Updated) => EventType::CommentUpdated,
    (EntitySnapshot::Comment { .. }, Deleted) => EventType::CommentDeleted,
  }
}

fn describe(change: &EntityChange) -> String {
  match &change.snapshot {
    EntitySnapshot::Project(project) => {
      format!("Project '{}' was {}", project.title, verb(change.transition))
    }
    EntitySnapshot::Task { task, project } => format!(
      "Task '{}' was {} in project '{}'",
      task.title,
      verb(change.transition),
      project.title
    ),
    EntitySnapshot::Document { document, project } => match change.transition {
      Transition::Created => format!(
        "Document '{}' was uploaded to project '{}'",
        document.name, project.title
      ),
      Transition::Updated => format!(
        "Document '{}' was updated in project '{}'",
        document.name, project.title
      ),
      Transition::Deleted => format!(
        "Document '{}' was deleted from project '{}'",
        document.name, project.title
      ),
    },
    EntitySnapshot::Comment { comment, project, task_title } => format!(
      "Comment on task '{}' in project '{}' was {}: \"{}\"",
      task_title,
      project.title,
      verb(change.transition),
      comment.text
    ),
  }
}

fn verb(transition: Transition) -> &'static str {
  match transition {
    Transition::Created => "created",
    Transition::Updated => "updated",
    Transition::Deleted => "deleted",
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

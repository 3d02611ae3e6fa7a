//! Typed lifecycle changes, the input side of the timeline recorder.
//!
//! A mutation names its transition explicitly and hands over a snapshot of
//! the entity as it stood for that transition: post-write state for creates
//! and updates, the prior state for deletes. Nothing here is inferred from
//! identity checks after the fact.

use uuid::Uuid;

use crate::entity::{Comment, Document, Project, Task};
use crate::event::SubjectRef;

// ─── Transition ──────────────────────────────────────────────────────────────

/// The three transitions the timeline records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  Created,
  Updated,
  Deleted,
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

/// The slice of the owning project a child entity's event needs: the title
/// for descriptions, the ordered members for actor fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectContext {
  pub project_id:   Uuid,
  pub title:        String,
  pub team_members: Vec<Uuid>,
}

impl From<&Project> for ProjectContext {
  fn from(project: &Project) -> Self {
    ProjectContext {
      project_id:   project.project_id,
      title:        project.title.clone(),
      team_members: project.team_members.clone(),
    }
  }
}

/// Entity state captured for one transition.
///
/// Child entities carry their parent context along, so a delete event can
/// still name the project (and task) the entity belonged to once the rows
/// are gone.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySnapshot {
  Project(Project),
  Task {
    task:    Task,
    project: ProjectContext,
  },
  Document {
    document: Document,
    project:  ProjectContext,
  },
  Comment {
    comment:    Comment,
    project:    ProjectContext,
    task_title: String,
  },
}

impl EntitySnapshot {
  /// The subject reference the resulting event will carry.
  pub fn subject(&self) -> SubjectRef {
    match self {
      EntitySnapshot::Project(project) => SubjectRef::Project(project.project_id),
      EntitySnapshot::Task { task, .. } => SubjectRef::Task(task.task_id),
      EntitySnapshot::Document { document, .. } => {
        SubjectRef::Document(document.document_id)
      }
      EntitySnapshot::Comment { comment, .. } => {
        SubjectRef::Comment(comment.comment_id)
      }
    }
  }

  /// The owning project's id; for a project snapshot, its own id.
  pub fn project_id(&self) -> Uuid {
    match self {
      EntitySnapshot::Project(project) => project.project_id,
      EntitySnapshot::Task { project, .. }
      | EntitySnapshot::Document { project, .. }
      | EntitySnapshot::Comment { project, .. } => project.project_id,
    }
  }
}

// ─── Change ──────────────────────────────────────────────────────────────────

/// A complete change notice: what happened, to what, attributed to whom.
///
/// The actor is resolved once by the caller (see
/// [`resolve_actor`](crate::recorder::resolve_actor)) and passed in
/// explicitly; the recorder uses it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityChange {
  pub transition: Transition,
  pub snapshot:   EntitySnapshot,
  pub actor:      Uuid,
}

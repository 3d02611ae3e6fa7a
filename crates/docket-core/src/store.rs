//! The `TrackerStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `docket-store-sqlite`).
//! Higher layers (`docket-api`, `docket-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  entity::{
    Comment, Document, NewComment, NewDocument, NewProject, NewTask, NewUser,
    Project, Task, User,
  },
  event::TimelineEvent,
  notification::Notification,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`TrackerStore::list_events`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventQuery {
  /// Restrict to events of one project (via the stored backlink, so child
  /// entity events are included). The project must exist.
  pub project_id: Option<Uuid>,
  /// Page size; stores default to 100 and cap at 500.
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// Which parent to list comments for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentFilter {
  Task(Uuid),
  Project(Uuid),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Docket storage backend.
///
/// Every mutation of a tracked entity appends exactly one timeline event and
/// returns it alongside the entity. Entity write and event write are one
/// atomic unit: a failure on either side leaves neither behind.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. Fails if the email is already taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user (with profile, if any). Returns `None` if not found.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Create a project and record its `project_created` event.
  ///
  /// Every listed team member must exist.
  fn create_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<(Project, TimelineEvent), Self::Error>> + Send + '_;

  fn get_project(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Replace a project's fields (team membership included) and record
  /// `project_updated`.
  fn update_project(
    &self,
    project_id: Uuid,
    input: NewProject,
  ) -> impl Future<Output = Result<(Project, TimelineEvent), Self::Error>> + Send + '_;

  /// Delete a project and its tasks, documents and comments.
  ///
  /// Records a single `project_deleted` event built from the state held
  /// immediately before removal; cascaded children get no events of their
  /// own. Previously recorded events survive untouched.
  fn delete_project(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<TimelineEvent, Self::Error>> + Send + '_;

  // ── Tasks ─────────────────────────────────────────────────────────────

  fn create_task(
    &self,
    input: NewTask,
  ) -> impl Future<Output = Result<(Task, TimelineEvent), Self::Error>> + Send + '_;

  fn get_task(
    &self,
    task_id: Uuid,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  /// List the tasks of one project. An unknown project id yields an empty
  /// list, not an error.
  fn list_tasks(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  fn update_task(
    &self,
    task_id: Uuid,
    input: NewTask,
  ) -> impl Future<Output = Result<(Task, TimelineEvent), Self::Error>> + Send + '_;

  /// Hand a task to a new assignee.
  ///
  /// Records `task_updated` attributed to the new assignee and pushes them
  /// a notification, all in the same atomic unit.
  fn assign_task(
    &self,
    task_id: Uuid,
    assignee_id: Uuid,
  ) -> impl Future<Output = Result<(Task, TimelineEvent), Self::Error>> + Send + '_;

  fn delete_task(
    &self,
    task_id: Uuid,
  ) -> impl Future<Output = Result<TimelineEvent, Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Attach a document to a project; records `document_uploaded`.
  fn create_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<(Document, TimelineEvent), Self::Error>> + Send + '_;

  fn get_document(
    &self,
    document_id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  fn list_documents(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  fn update_document(
    &self,
    document_id: Uuid,
    input: NewDocument,
  ) -> impl Future<Output = Result<(Document, TimelineEvent), Self::Error>> + Send + '_;

  fn delete_document(
    &self,
    document_id: Uuid,
  ) -> impl Future<Output = Result<TimelineEvent, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Comment on a task. The owning project is derived from the task, never
  /// taken from the caller.
  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<(Comment, TimelineEvent), Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  fn list_comments(
    &self,
    filter: CommentFilter,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  /// Replace a comment's text. Author and parentage are fixed at creation.
  fn update_comment(
    &self,
    comment_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<(Comment, TimelineEvent), Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<TimelineEvent, Self::Error>> + Send + '_;

  // ── Timeline reads ────────────────────────────────────────────────────

  /// List events, newest first (equal timestamps resolve newest-inserted
  /// first). With `project_id` set, fails with a not-found error if that
  /// project does not currently exist.
  fn list_events(
    &self,
    query: EventQuery,
  ) -> impl Future<Output = Result<Vec<TimelineEvent>, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Append a notification for a user.
  fn push_notification(
    &self,
    user_id: Uuid,
    message: String,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// A user's notifications, newest first.
  fn list_notifications(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Flip `is_read` to true, once. Fails with a not-found error if the
  /// notification does not exist or belongs to someone else, and with an
  /// already-read error on a repeat call.
  fn mark_notification_read(
    &self,
    notification_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;
}

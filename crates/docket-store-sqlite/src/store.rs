//! [`SqliteStore`] — the SQLite implementation of [`TrackerStore`].
//!
//! Every trait method forwards to a synchronous body in [`ops`] on the
//! connection thread, so mutations can wrap their entity write and the
//! timeline append in a single SQLite transaction.

use std::path::Path;

use uuid::Uuid;

use docket_core::{
  entity::{
    Comment, Document, NewComment, NewDocument, NewProject, NewTask, NewUser,
    Project, Task, User,
  },
  event::TimelineEvent,
  notification::Notification,
  store::{CommentFilter, EventQuery, TrackerStore},
};

use crate::{Result, ops, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracker store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    self.conn.call(move |conn| Ok(ops::add_user(conn, input))).await?
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self.conn.call(move |conn| Ok(ops::get_user(conn, user_id))).await?
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn create_project(
    &self,
    input: NewProject,
  ) -> Result<(Project, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::create_project(conn, input)))
      .await?
  }

  async fn get_project(&self, project_id: Uuid) -> Result<Option<Project>> {
    self
      .conn
      .call(move |conn| Ok(ops::get_project(conn, project_id)))
      .await?
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    self.conn.call(move |conn| Ok(ops::list_projects(conn))).await?
  }

  async fn update_project(
    &self,
    project_id: Uuid,
    input:      NewProject,
  ) -> Result<(Project, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::update_project(conn, project_id, input)))
      .await?
  }

  async fn delete_project(&self, project_id: Uuid) -> Result<TimelineEvent> {
    self
      .conn
      .call(move |conn| Ok(ops::delete_project(conn, project_id)))
      .await?
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn create_task(&self, input: NewTask) -> Result<(Task, TimelineEvent)> {
    self.conn.call(move |conn| Ok(ops::create_task(conn, input))).await?
  }

  async fn get_task(&self, task_id: Uuid) -> Result<Option<Task>> {
    self.conn.call(move |conn| Ok(ops::get_task(conn, task_id))).await?
  }

  async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
    self
      .conn
      .call(move |conn| Ok(ops::list_tasks(conn, project_id)))
      .await?
  }

  async fn update_task(
    &self,
    task_id: Uuid,
    input:   NewTask,
  ) -> Result<(Task, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::update_task(conn, task_id, input)))
      .await?
  }

  async fn assign_task(
    &self,
    task_id:     Uuid,
    assignee_id: Uuid,
  ) -> Result<(Task, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::assign_task(conn, task_id, assignee_id)))
      .await?
  }

  async fn delete_task(&self, task_id: Uuid) -> Result<TimelineEvent> {
    self
      .conn
      .call(move |conn| Ok(ops::delete_task(conn, task_id)))
      .await?
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn create_document(
    &self,
    input: NewDocument,
  ) -> Result<(Document, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::create_document(conn, input)))
      .await?
  }

  async fn get_document(&self, document_id: Uuid) -> Result<Option<Document>> {
    self
      .conn
      .call(move |conn| Ok(ops::get_document(conn, document_id)))
      .await?
  }

  async fn list_documents(&self, project_id: Uuid) -> Result<Vec<Document>> {
    self
      .conn
      .call(move |conn| Ok(ops::list_documents(conn, project_id)))
      .await?
  }

  async fn update_document(
    &self,
    document_id: Uuid,
    input:       NewDocument,
  ) -> Result<(Document, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::update_document(conn, document_id, input)))
      .await?
  }

  async fn delete_document(&self, document_id: Uuid) -> Result<TimelineEvent> {
    self
      .conn
      .call(move |conn| Ok(ops::delete_document(conn, document_id)))
      .await?
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(
    &self,
    input: NewComment,
  ) -> Result<(Comment, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::create_comment(conn, input)))
      .await?
  }

  async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
    self
      .conn
      .call(move |conn| Ok(ops::get_comment(conn, comment_id)))
      .await?
  }

  async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
    self
      .conn
      .call(move |conn| Ok(ops::list_comments(conn, filter)))
      .await?
  }

  async fn update_comment(
    &self,
    comment_id: Uuid,
    text:       String,
  ) -> Result<(Comment, TimelineEvent)> {
    self
      .conn
      .call(move |conn| Ok(ops::update_comment(conn, comment_id, text)))
      .await?
  }

  async fn delete_comment(&self, comment_id: Uuid) -> Result<TimelineEvent> {
    self
      .conn
      .call(move |conn| Ok(ops::delete_comment(conn, comment_id)))
      .await?
  }

  // ── Timeline ──────────────────────────────────────────────────────────────

  async fn list_events(&self, query: EventQuery) -> Result<Vec<TimelineEvent>> {
    self
      .conn
      .call(move |conn| Ok(ops::list_events(conn, query)))
      .await?
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn push_notification(
    &self,
    user_id: Uuid,
    message: String,
  ) -> Result<Notification> {
    self
      .conn
      .call(move |conn| Ok(ops::push_notification(conn, user_id, message)))
      .await?
  }

  async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
    self
      .conn
      .call(move |conn| Ok(ops::list_notifications(conn, user_id)))
      .await?
  }

  async fn mark_notification_read(
    &self,
    notification_id: Uuid,
    user_id:         Uuid,
  ) -> Result<Notification> {
    self
      .conn
      .call(move |conn| {
        Ok(ops::mark_notification_read(conn, notification_id, user_id))
      })
      .await?
  }
}

//! Synchronous operation bodies, executed on the SQLite connection thread.
//!
//! Every mutation of a tracked entity opens one transaction, writes the
//! entity rows, resolves the actor, appends the timeline event and commits.
//! A failure anywhere before the commit (missing parent, empty team, SQL
//! error) rolls the whole mutation back: no entity without its event, no
//! event without its entity.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, params};
use uuid::Uuid;

use docket_core::{
  Error as CoreError,
  entity::{
    Comment, Document, NewComment, NewDocument, NewProject, NewTask, NewUser,
    Project, Task, User,
  },
  event::{NewTimelineEvent, TimelineEvent},
  lifecycle::{EntityChange, EntitySnapshot, ProjectContext, Transition},
  notification::Notification,
  recorder,
  store::{CommentFilter, EventQuery},
};

use crate::{
  Result,
  encode::{
    RawComment, RawDocument, RawEvent, RawNotification, RawProject, RawTask,
    RawUser, decode_uuid, encode_date, encode_dt, encode_event_type,
    encode_role, encode_subject, encode_task_status, encode_uuid,
  },
};

const DEFAULT_EVENT_LIMIT: usize = 100;
const MAX_EVENT_LIMIT: usize = 500;

// ─── Recorder hook ───────────────────────────────────────────────────────────

/// The single place entity transitions become timeline rows.
fn record_change(
  tx:         &Connection,
  transition: Transition,
  snapshot:   EntitySnapshot,
) -> Result<TimelineEvent> {
  let actor = recorder::resolve_actor(&snapshot)?;
  let change = EntityChange { transition, snapshot, actor };
  append_event(tx, recorder::build_event(&change))
}

fn append_event(tx: &Connection, input: NewTimelineEvent) -> Result<TimelineEvent> {
  let event_id  = Uuid::new_v4();
  let timestamp = Utc::now();
  let (subject_kind, subject_id) = encode_subject(input.subject);

  tx.execute(
    "INSERT INTO timeline_events
       (event_id, event_type, description, timestamp,
        subject_kind, subject_id, project_id, user_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    params![
      encode_uuid(event_id),
      encode_event_type(input.event_type),
      input.description,
      encode_dt(timestamp),
      subject_kind,
      subject_id,
      encode_uuid(input.project_id),
      encode_uuid(input.actor),
    ],
  )?;

  Ok(TimelineEvent {
    event_id,
    seq:         tx.last_insert_rowid(),
    event_type:  input.event_type,
    description: input.description,
    timestamp,
    subject:     input.subject,
    project_id:  input.project_id,
    actor:       input.actor,
  })
}

// ─── Existence checks ────────────────────────────────────────────────────────

fn user_exists(tx: &Connection, user_id: Uuid) -> Result<bool> {
  let found: Option<bool> = tx
    .query_row(
      "SELECT 1 FROM users WHERE user_id = ?1",
      params![encode_uuid(user_id)],
      |_| Ok(true),
    )
    .optional()?;
  Ok(found.unwrap_or(false))
}

fn require_user(tx: &Connection, user_id: Uuid) -> Result<()> {
  if user_exists(tx, user_id)? {
    Ok(())
  } else {
    Err(CoreError::UserNotFound(user_id).into())
  }
}

fn project_exists(tx: &Connection, project_id: Uuid) -> Result<bool> {
  let found: Option<bool> = tx
    .query_row(
      "SELECT 1 FROM projects WHERE project_id = ?1",
      params![encode_uuid(project_id)],
      |_| Ok(true),
    )
    .optional()?;
  Ok(found.unwrap_or(false))
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn add_user(conn: &mut Connection, input: NewUser) -> Result<User> {
  let tx = conn.transaction()?;

  let taken: Option<bool> = tx
    .query_row(
      "SELECT 1 FROM users WHERE email = ?1",
      params![input.email],
      |_| Ok(true),
    )
    .optional()?;
  if taken.unwrap_or(false) {
    return Err(CoreError::EmailTaken(input.email).into());
  }

  let user = User {
    user_id:    Uuid::new_v4(),
    username:   input.username,
    email:      input.email,
    profile:    input.profile,
    created_at: Utc::now(),
  };

  tx.execute(
    "INSERT INTO users (user_id, username, email, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    params![
      encode_uuid(user.user_id),
      user.username,
      user.email,
      encode_dt(user.created_at),
    ],
  )?;

  if let Some(profile) = &user.profile {
    tx.execute(
      "INSERT INTO profiles (user_id, role, contact_number)
       VALUES (?1, ?2, ?3)",
      params![
        encode_uuid(user.user_id),
        encode_role(profile.role),
        profile.contact_number,
      ],
    )?;
  }

  tx.commit()?;
  Ok(user)
}

pub fn get_user(conn: &mut Connection, user_id: Uuid) -> Result<Option<User>> {
  let raw: Option<RawUser> = conn
    .query_row(
      "SELECT u.user_id, u.username, u.email, u.created_at,
              p.role, p.contact_number
       FROM users u
       LEFT JOIN profiles p ON p.user_id = u.user_id
       WHERE u.user_id = ?1",
      params![encode_uuid(user_id)],
      |row| {
        Ok(RawUser {
          user_id:        row.get(0)?,
          username:       row.get(1)?,
          email:          row.get(2)?,
          created_at:     row.get(3)?,
          role:           row.get(4)?,
          contact_number: row.get(5)?,
        })
      },
    )
    .optional()?;

  raw.map(RawUser::into_user).transpose()
}

// ─── Projects ────────────────────────────────────────────────────────────────

fn load_members(tx: &Connection, project_id: Uuid) -> Result<Vec<Uuid>> {
  let mut stmt = tx.prepare(
    "SELECT user_id FROM project_members WHERE project_id = ?1 ORDER BY position",
  )?;
  let ids = stmt
    .query_map(params![encode_uuid(project_id)], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  ids.iter().map(|s| decode_uuid(s)).collect()
}

fn load_project(tx: &Connection, project_id: Uuid) -> Result<Option<Project>> {
  let raw: Option<RawProject> = tx
    .query_row(
      "SELECT project_id, title, description, start_date, end_date
       FROM projects WHERE project_id = ?1",
      params![encode_uuid(project_id)],
      |row| {
        Ok(RawProject {
          project_id:  row.get(0)?,
          title:       row.get(1)?,
          description: row.get(2)?,
          start_date:  row.get(3)?,
          end_date:    row.get(4)?,
        })
      },
    )
    .optional()?;

  match raw {
    Some(raw) => {
      let members = load_members(tx, project_id)?;
      Ok(Some(raw.into_project(members)?))
    }
    None => Ok(None),
  }
}

fn require_project(tx: &Connection, project_id: Uuid) -> Result<Project> {
  load_project(tx, project_id)?
    .ok_or_else(|| CoreError::ProjectNotFound(project_id).into())
}

/// The project slice child-entity events need, or NotFound.
fn project_context(tx: &Connection, project_id: Uuid) -> Result<ProjectContext> {
  Ok(ProjectContext::from(&require_project(tx, project_id)?))
}

fn insert_members(
  tx:         &Connection,
  project_id: Uuid,
  members:    &[Uuid],
) -> Result<()> {
  let mut stmt = tx.prepare(
    "INSERT INTO project_members (project_id, user_id, position)
     VALUES (?1, ?2, ?3)",
  )?;
  for (position, member) in members.iter().enumerate() {
    stmt.execute(params![
      encode_uuid(project_id),
      encode_uuid(*member),
      position as i64,
    ])?;
  }
  Ok(())
}

pub fn create_project(
  conn:  &mut Connection,
  input: NewProject,
) -> Result<(Project, TimelineEvent)> {
  let tx = conn.transaction()?;

  for member in &input.team_members {
    require_user(&tx, *member)?;
  }

  let project = Project {
    project_id:   Uuid::new_v4(),
    title:        input.title,
    description:  input.description,
    start_date:   input.start_date,
    end_date:     input.end_date,
    team_members: input.team_members,
  };

  tx.execute(
    "INSERT INTO projects (project_id, title, description, start_date, end_date)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      encode_uuid(project.project_id),
      project.title,
      project.description,
      encode_date(project.start_date),
      encode_date(project.end_date),
    ],
  )?;
  insert_members(&tx, project.project_id, &project.team_members)?;

  let event = record_change(
    &tx,
    Transition::Created,
    EntitySnapshot::Project(project.clone()),
  )?;

  tx.commit()?;
  Ok((project, event))
}

pub fn get_project(conn: &mut Connection, project_id: Uuid) -> Result<Option<Project>> {
  load_project(conn, project_id)
}

pub fn list_projects(conn: &mut Connection) -> Result<Vec<Project>> {
  let mut stmt = conn.prepare(
    "SELECT project_id, title, description, start_date, end_date FROM projects",
  )?;
  let raws = stmt
    .query_map([], |row| {
      Ok(RawProject {
        project_id:  row.get(0)?,
        title:       row.get(1)?,
        description: row.get(2)?,
        start_date:  row.get(3)?,
        end_date:    row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws
    .into_iter()
    .map(|raw| {
      let project_id = decode_uuid(&raw.project_id)?;
      let members = load_members(conn, project_id)?;
      raw.into_project(members)
    })
    .collect()
}

pub fn update_project(
  conn:       &mut Connection,
  project_id: Uuid,
  input:      NewProject,
) -> Result<(Project, TimelineEvent)> {
  let tx = conn.transaction()?;

  require_project(&tx, project_id)?;
  for member in &input.team_members {
    require_user(&tx, *member)?;
  }

  tx.execute(
    "UPDATE projects SET title = ?2, description = ?3, start_date = ?4, end_date = ?5
     WHERE project_id = ?1",
    params![
      encode_uuid(project_id),
      input.title,
      input.description,
      encode_date(input.start_date),
      encode_date(input.end_date),
    ],
  )?;
  tx.execute(
    "DELETE FROM project_members WHERE project_id = ?1",
    params![encode_uuid(project_id)],
  )?;
  insert_members(&tx, project_id, &input.team_members)?;

  let project = Project {
    project_id,
    title:        input.title,
    description:  input.description,
    start_date:   input.start_date,
    end_date:     input.end_date,
    team_members: input.team_members,
  };

  let event = record_change(
    &tx,
    Transition::Updated,
    EntitySnapshot::Project(project.clone()),
  )?;

  tx.commit()?;
  Ok((project, event))
}

pub fn delete_project(conn: &mut Connection, project_id: Uuid) -> Result<TimelineEvent> {
  let tx = conn.transaction()?;

  // Snapshot before the rows go away; the event is built from it.
  let project = require_project(&tx, project_id)?;

  tx.execute(
    "DELETE FROM projects WHERE project_id = ?1",
    params![encode_uuid(project_id)],
  )?;

  let event = record_change(
    &tx,
    Transition::Deleted,
    EntitySnapshot::Project(project),
  )?;

  tx.commit()?;
  Ok(event)
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

fn load_task(tx: &Connection, task_id: Uuid) -> Result<Option<Task>> {
  let raw: Option<RawTask> = tx
    .query_row(
      "SELECT task_id, title, description, status, project_id, assignee_id
       FROM tasks WHERE task_id = ?1",
      params![encode_uuid(task_id)],
      |row| {
        Ok(RawTask {
          task_id:     row.get(0)?,
          title:       row.get(1)?,
          description: row.get(2)?,
          status:      row.get(3)?,
          project_id:  row.get(4)?,
          assignee_id: row.get(5)?,
        })
      },
    )
    .optional()?;

  raw.map(RawTask::into_task).transpose()
}

fn require_task(tx: &Connection, task_id: Uuid) -> Result<Task> {
  load_task(tx, task_id)?.ok_or_else(|| CoreError::TaskNotFound(task_id).into())
}

pub fn create_task(conn: &mut Connection, input: NewTask) -> Result<(Task, TimelineEvent)> {
  let tx = conn.transaction()?;

  let project = project_context(&tx, input.project_id)?;
  require_user(&tx, input.assignee_id)?;

  let task = Task {
    task_id:     Uuid::new_v4(),
    title:       input.title,
    description: input.description,
    status:      input.status,
    project_id:  input.project_id,
    assignee_id: input.assignee_id,
  };

  tx.execute(
    "INSERT INTO tasks (task_id, title, description, status, project_id, assignee_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(task.task_id),
      task.title,
      task.description,
      encode_task_status(task.status),
      encode_uuid(task.project_id),
      encode_uuid(task.assignee_id),
    ],
  )?;

  let event = record_change(&tx, Transition::Created, EntitySnapshot::Task {
    task: task.clone(),
    project,
  })?;

  tx.commit()?;
  Ok((task, event))
}

pub fn get_task(conn: &mut Connection, task_id: Uuid) -> Result<Option<Task>> {
  load_task(conn, task_id)
}

pub fn list_tasks(conn: &mut Connection, project_id: Uuid) -> Result<Vec<Task>> {
  let mut stmt = conn.prepare(
    "SELECT task_id, title, description, status, project_id, assignee_id
     FROM tasks WHERE project_id = ?1",
  )?;
  let raws = stmt
    .query_map(params![encode_uuid(project_id)], |row| {
      Ok(RawTask {
        task_id:     row.get(0)?,
        title:       row.get(1)?,
        description: row.get(2)?,
        status:      row.get(3)?,
        project_id:  row.get(4)?,
        assignee_id: row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawTask::into_task).collect()
}

pub fn update_task(
  conn:    &mut Connection,
  task_id: Uuid,
  input:   NewTask,
) -> Result<(Task, TimelineEvent)> {
  let tx = conn.transaction()?;

  require_task(&tx, task_id)?;
  let project = project_context(&tx, input.project_id)?;
  require_user(&tx, input.assignee_id)?;

  tx.execute(
    "UPDATE tasks SET title = ?2, description = ?3, status = ?4,
                      project_id = ?5, assignee_id = ?6
     WHERE task_id = ?1",
    params![
      encode_uuid(task_id),
      input.title,
      input.description,
      encode_task_status(input.status),
      encode_uuid(input.project_id),
      encode_uuid(input.assignee_id),
    ],
  )?;

  let task = Task {
    task_id,
    title:       input.title,
    description: input.description,
    status:      input.status,
    project_id:  input.project_id,
    assignee_id: input.assignee_id,
  };

  let event = record_change(&tx, Transition::Updated, EntitySnapshot::Task {
    task: task.clone(),
    project,
  })?;

  tx.commit()?;
  Ok((task, event))
}

pub fn assign_task(
  conn:        &mut Connection,
  task_id:     Uuid,
  assignee_id: Uuid,
) -> Result<(Task, TimelineEvent)> {
  let tx = conn.transaction()?;

  let mut task = require_task(&tx, task_id)?;
  require_user(&tx, assignee_id)?;
  let project = project_context(&tx, task.project_id)?;

  tx.execute(
    "UPDATE tasks SET assignee_id = ?2 WHERE task_id = ?1",
    params![encode_uuid(task_id), encode_uuid(assignee_id)],
  )?;
  task.assignee_id = assignee_id;

  // The new assignee hears about it in the same transaction.
  let message = format!(
    "You have been assigned task '{}' in project '{}'",
    task.title, project.title
  );
  insert_notification(&tx, assignee_id, &message)?;

  let event = record_change(&tx, Transition::Updated, EntitySnapshot::Task {
    task: task.clone(),
    project,
  })?;

  tx.commit()?;
  Ok((task, event))
}

pub fn delete_task(conn: &mut Connection, task_id: Uuid) -> Result<TimelineEvent> {
  let tx = conn.transaction()?;

  let task = require_task(&tx, task_id)?;
  let project = project_context(&tx, task.project_id)?;

  tx.execute(
    "DELETE FROM tasks WHERE task_id = ?1",
    params![encode_uuid(task_id)],
  )?;

  let event = record_change(&tx, Transition::Deleted, EntitySnapshot::Task {
    task,
    project,
  })?;

  tx.commit()?;
  Ok(event)
}

// ─── Documents ───────────────────────────────────────────────────────────────

fn load_document(tx: &Connection, document_id: Uuid) -> Result<Option<Document>> {
  let raw: Option<RawDocument> = tx
    .query_row(
      "SELECT document_id, name, description, file_name, version, project_id
       FROM documents WHERE document_id = ?1",
      params![encode_uuid(document_id)],
      |row| {
        Ok(RawDocument {
          document_id: row.get(0)?,
          name:        row.get(1)?,
          description: row.get(2)?,
          file_name:   row.get(3)?,
          version:     row.get(4)?,
          project_id:  row.get(5)?,
        })
      },
    )
    .optional()?;

  raw.map(RawDocument::into_document).transpose()
}

fn require_document(tx: &Connection, document_id: Uuid) -> Result<Document> {
  load_document(tx, document_id)?
    .ok_or_else(|| CoreError::DocumentNotFound(document_id).into())
}

pub fn create_document(
  conn:  &mut Connection,
  input: NewDocument,
) -> Result<(Document, TimelineEvent)> {
  let tx = conn.transaction()?;

  let project = project_context(&tx, input.project_id)?;

  let document = Document {
    document_id: Uuid::new_v4(),
    name:        input.name,
    description: input.description,
    file_name:   input.file_name,
    version:     input.version,
    project_id:  input.project_id,
  };

  tx.execute(
    "INSERT INTO documents (document_id, name, description, file_name, version, project_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(document.document_id),
      document.name,
      document.description,
      document.file_name,
      document.version,
      encode_uuid(document.project_id),
    ],
  )?;

  let event = record_change(&tx, Transition::Created, EntitySnapshot::Document {
    document: document.clone(),
    project,
  })?;

  tx.commit()?;
  Ok((document, event))
}

pub fn get_document(conn: &mut Connection, document_id: Uuid) -> Result<Option<Document>> {
  load_document(conn, document_id)
}

pub fn list_documents(conn: &mut Connection, project_id: Uuid) -> Result<Vec<Document>> {
  let mut stmt = conn.prepare(
    "SELECT document_id, name, description, file_name, version, project_id
     FROM documents WHERE project_id = ?1",
  )?;
  let raws = stmt
    .query_map(params![encode_uuid(project_id)], |row| {
      Ok(RawDocument {
        document_id: row.get(0)?,
        name:        row.get(1)?,
        description: row.get(2)?,
        file_name:   row.get(3)?,
        version:     row.get(4)?,
        project_id:  row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawDocument::into_document).collect()
}

pub fn update_document(
  conn:        &mut Connection,
  document_id: Uuid,
  input:       NewDocument,
) -> Result<(Document, TimelineEvent)> {
  let tx = conn.transaction()?;

  require_document(&tx, document_id)?;
  let project = project_context(&tx, input.project_id)?;

  tx.execute(
    "UPDATE documents SET name = ?2, description = ?3, file_name = ?4,
                          version = ?5, project_id = ?6
     WHERE document_id = ?1",
    params![
      encode_uuid(document_id),
      input.name,
      input.description,
      input.file_name,
      input.version,
      encode_uuid(input.project_id),
    ],
  )?;

  let document = Document {
    document_id,
    name:        input.name,
    description: input.description,
    file_name:   input.file_name,
    version:     input.version,
    project_id:  input.project_id,
  };

  let event = record_change(&tx, Transition::Updated, EntitySnapshot::Document {
    document: document.clone(),
    project,
  })?;

  tx.commit()?;
  Ok((document, event))
}

pub fn delete_document(conn: &mut Connection, document_id: Uuid) -> Result<TimelineEvent> {
  let tx = conn.transaction()?;

  let document = require_document(&tx, document_id)?;
  let project = project_context(&tx, document.project_id)?;

  tx.execute(
    "DELETE FROM documents WHERE document_id = ?1",
    params![encode_uuid(document_id)],
  )?;

  let event = record_change(&tx, Transition::Deleted, EntitySnapshot::Document {
    document,
    project,
  })?;

  tx.commit()?;
  Ok(event)
}

// ─── Comments ────────────────────────────────────────────────────────────────

fn load_comment(tx: &Connection, comment_id: Uuid) -> Result<Option<Comment>> {
  let raw: Option<RawComment> = tx
    .query_row(
      "SELECT comment_id, text, author_id, created_at, task_id, project_id
       FROM comments WHERE comment_id = ?1",
      params![encode_uuid(comment_id)],
      |row| {
        Ok(RawComment {
          comment_id: row.get(0)?,
          text:       row.get(1)?,
          author_id:  row.get(2)?,
          created_at: row.get(3)?,
          task_id:    row.get(4)?,
          project_id: row.get(5)?,
        })
      },
    )
    .optional()?;

  raw.map(RawComment::into_comment).transpose()
}

fn require_comment(tx: &Connection, comment_id: Uuid) -> Result<Comment> {
  load_comment(tx, comment_id)?
    .ok_or_else(|| CoreError::CommentNotFound(comment_id).into())
}

pub fn create_comment(
  conn:  &mut Connection,
  input: NewComment,
) -> Result<(Comment, TimelineEvent)> {
  let tx = conn.transaction()?;

  let task = require_task(&tx, input.task_id)?;
  require_user(&tx, input.author_id)?;
  let project = project_context(&tx, task.project_id)?;

  let comment = Comment {
    comment_id: Uuid::new_v4(),
    text:       input.text,
    author_id:  input.author_id,
    task_id:    input.task_id,
    // Derived from the task, never taken from the caller.
    project_id: task.project_id,
    created_at: Utc::now(),
  };

  tx.execute(
    "INSERT INTO comments (comment_id, text, author_id, created_at, task_id, project_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      encode_uuid(comment.comment_id),
      comment.text,
      encode_uuid(comment.author_id),
      encode_dt(comment.created_at),
      encode_uuid(comment.task_id),
      encode_uuid(comment.project_id),
    ],
  )?;

  let event = record_change(&tx, Transition::Created, EntitySnapshot::Comment {
    comment: comment.clone(),
    project,
    task_title: task.title,
  })?;

  tx.commit()?;
  Ok((comment, event))
}

pub fn get_comment(conn: &mut Connection, comment_id: Uuid) -> Result<Option<Comment>> {
  load_comment(conn, comment_id)
}

pub fn list_comments(conn: &mut Connection, filter: CommentFilter) -> Result<Vec<Comment>> {
  let (sql, id) = match filter {
    CommentFilter::Task(id) => (
      "SELECT comment_id, text, author_id, created_at, task_id, project_id
       FROM comments WHERE task_id = ?1 ORDER BY created_at",
      id,
    ),
    CommentFilter::Project(id) => (
      "SELECT comment_id, text, author_id, created_at, task_id, project_id
       FROM comments WHERE project_id = ?1 ORDER BY created_at",
      id,
    ),
  };

  let mut stmt = conn.prepare(sql)?;
  let raws = stmt
    .query_map(params![encode_uuid(id)], |row| {
      Ok(RawComment {
        comment_id: row.get(0)?,
        text:       row.get(1)?,
        author_id:  row.get(2)?,
        created_at: row.get(3)?,
        task_id:    row.get(4)?,
        project_id: row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawComment::into_comment).collect()
}

pub fn update_comment(
  conn:       &mut Connection,
  comment_id: Uuid,
  text:       String,
) -> Result<(Comment, TimelineEvent)> {
  let tx = conn.transaction()?;

  let mut comment = require_comment(&tx, comment_id)?;
  let task = require_task(&tx, comment.task_id)?;
  let project = project_context(&tx, comment.project_id)?;

  tx.execute(
    "UPDATE comments SET text = ?2 WHERE comment_id = ?1",
    params![encode_uuid(comment_id), text],
  )?;
  comment.text = text;

  let event = record_change(&tx, Transition::Updated, EntitySnapshot::Comment {
    comment: comment.clone(),
    project,
    task_title: task.title,
  })?;

  tx.commit()?;
  Ok((comment, event))
}

pub fn delete_comment(conn: &mut Connection, comment_id: Uuid) -> Result<TimelineEvent> {
  let tx = conn.transaction()?;

  let comment = require_comment(&tx, comment_id)?;
  let task = require_task(&tx, comment.task_id)?;
  let project = project_context(&tx, comment.project_id)?;

  tx.execute(
    "DELETE FROM comments WHERE comment_id = ?1",
    params![encode_uuid(comment_id)],
  )?;

  let event = record_change(&tx, Transition::Deleted, EntitySnapshot::Comment {
    comment,
    project,
    task_title: task.title,
  })?;

  tx.commit()?;
  Ok(event)
}

// ─── Timeline reads ──────────────────────────────────────────────────────────

fn raw_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
  Ok(RawEvent {
    seq:          row.get(0)?,
    event_id:     row.get(1)?,
    event_type:   row.get(2)?,
    description:  row.get(3)?,
    timestamp:    row.get(4)?,
    subject_kind: row.get(5)?,
    subject_id:   row.get(6)?,
    project_id:   row.get(7)?,
    user_id:      row.get(8)?,
  })
}

pub fn list_events(conn: &mut Connection, query: EventQuery) -> Result<Vec<TimelineEvent>> {
  let limit  = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT).min(MAX_EVENT_LIMIT) as i64;
  let offset = query.offset.unwrap_or(0) as i64;

  let raws: Vec<RawEvent> = match query.project_id {
    Some(project_id) => {
      // The filter checks against the live projects table: a deleted
      // project's id is NotFound here even though its events remain in the
      // unfiltered listing.
      if !project_exists(conn, project_id)? {
        return Err(CoreError::ProjectNotFound(project_id).into());
      }

      let mut stmt = conn.prepare(
        "SELECT seq, event_id, event_type, description, timestamp,
                subject_kind, subject_id, project_id, user_id
         FROM timeline_events
         WHERE project_id = ?1
         ORDER BY timestamp DESC, seq DESC
         LIMIT ?2 OFFSET ?3",
      )?;
      stmt
        .query_map(params![encode_uuid(project_id), limit, offset], raw_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?
    }
    None => {
      let mut stmt = conn.prepare(
        "SELECT seq, event_id, event_type, description, timestamp,
                subject_kind, subject_id, project_id, user_id
         FROM timeline_events
         ORDER BY timestamp DESC, seq DESC
         LIMIT ?1 OFFSET ?2",
      )?;
      stmt
        .query_map(params![limit, offset], raw_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?
    }
  };

  raws.into_iter().map(RawEvent::into_event).collect()
}

// ─── Notifications ───────────────────────────────────────────────────────────

fn insert_notification(
  tx:      &Connection,
  user_id: Uuid,
  message: &str,
) -> Result<Notification> {
  let notification = Notification {
    notification_id: Uuid::new_v4(),
    user_id,
    message:         message.to_owned(),
    is_read:         false,
    created_at:      Utc::now(),
  };

  tx.execute(
    "INSERT INTO notifications (notification_id, user_id, message, is_read, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      encode_uuid(notification.notification_id),
      encode_uuid(notification.user_id),
      notification.message,
      notification.is_read,
      encode_dt(notification.created_at),
    ],
  )?;

  Ok(notification)
}

pub fn push_notification(
  conn:    &mut Connection,
  user_id: Uuid,
  message: String,
) -> Result<Notification> {
  let tx = conn.transaction()?;
  require_user(&tx, user_id)?;
  let notification = insert_notification(&tx, user_id, &message)?;
  tx.commit()?;
  Ok(notification)
}

pub fn list_notifications(conn: &mut Connection, user_id: Uuid) -> Result<Vec<Notification>> {
  let mut stmt = conn.prepare(
    "SELECT notification_id, user_id, message, is_read, created_at
     FROM notifications WHERE user_id = ?1
     ORDER BY created_at DESC, rowid DESC",
  )?;
  let raws = stmt
    .query_map(params![encode_uuid(user_id)], |row| {
      Ok(RawNotification {
        notification_id: row.get(0)?,
        user_id:         row.get(1)?,
        message:         row.get(2)?,
        is_read:         row.get(3)?,
        created_at:      row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws
    .into_iter()
    .map(RawNotification::into_notification)
    .collect()
}

pub fn mark_notification_read(
  conn:            &mut Connection,
  notification_id: Uuid,
  user_id:         Uuid,
) -> Result<Notification> {
  let tx = conn.transaction()?;

  // Absent and not-owned are indistinguishable on purpose.
  let raw: Option<RawNotification> = tx
    .query_row(
      "SELECT notification_id, user_id, message, is_read, created_at
       FROM notifications WHERE notification_id = ?1 AND user_id = ?2",
      params![encode_uuid(notification_id), encode_uuid(user_id)],
      |row| {
        Ok(RawNotification {
          notification_id: row.get(0)?,
          user_id:         row.get(1)?,
          message:         row.get(2)?,
          is_read:         row.get(3)?,
          created_at:      row.get(4)?,
        })
      },
    )
    .optional()?;

  let mut notification = match raw {
    Some(raw) => raw.into_notification()?,
    None => return Err(CoreError::NotificationNotFound(notification_id).into()),
  };

  if notification.is_read {
    return Err(CoreError::AlreadyRead(notification_id).into());
  }

  tx.execute(
    "UPDATE notifications SET is_read = 1 WHERE notification_id = ?1",
    params![encode_uuid(notification_id)],
  )?;
  notification.is_read = true;

  tx.commit()?;
  Ok(notification)
}

//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, Utc};
use docket_core::{
  entity::{
    NewComment, NewDocument, NewProject, NewTask, NewUser, Profile, Role,
    TaskStatus, User,
  },
  event::{EventType, SubjectRef},
  store::{CommentFilter, EventQuery, TrackerStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> User {
  s.add_user(NewUser {
    username: None,
    email:    email.into(),
    profile:  None,
  })
  .await
  .unwrap()
}

fn new_project(title: &str, team: Vec<Uuid>) -> NewProject {
  let today = Utc::now().date_naive();
  NewProject {
    title:        title.into(),
    description:  "a project".into(),
    start_date:   today,
    end_date:     today + Days::new(30),
    team_members: team,
  }
}

fn new_task(title: &str, project_id: Uuid, assignee_id: Uuid) -> NewTask {
  NewTask {
    title:       title.into(),
    description: "a task".into(),
    status:      TaskStatus::default(),
    project_id,
    assignee_id,
  }
}

fn new_document(name: &str, project_id: Uuid) -> NewDocument {
  NewDocument {
    name:        name.into(),
    description: "a document".into(),
    file_name:   None,
    version:     1.0,
    project_id,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_with_profile_roundtrip() {
  let s = store().await;

  let added = s
    .add_user(NewUser {
      username: Some("alice".into()),
      email:    "alice@example.com".into(),
      profile:  Some(Profile {
        role:           Role::Developer,
        contact_number: "03001234567".into(),
      }),
    })
    .await
    .unwrap();

  let fetched = s.get_user(added.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "taken@example.com").await;

  let err = s
    .add_user(NewUser {
      username: None,
      email:    "taken@example.com".into(),
      profile:  None,
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::EmailTaken(_))
  ));
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_project_records_a_creation_event() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let dev = user(&s, "dev@example.com").await;

  let (project, event) = s
    .create_project(new_project("Alpha", vec![lead.user_id, dev.user_id]))
    .await
    .unwrap();

  assert_eq!(event.event_type, EventType::ProjectCreated);
  assert_eq!(event.description, "Project 'Alpha' was created");
  assert_eq!(event.subject, SubjectRef::Project(project.project_id));
  assert_eq!(event.project_id, project.project_id);
  assert_eq!(event.actor, lead.user_id);
}

#[tokio::test]
async fn update_project_replaces_the_team() {
  let s = store().await;
  let a = user(&s, "a@example.com").await;
  let b = user(&s, "b@example.com").await;

  let (project, _) = s
    .create_project(new_project("Alpha", vec![a.user_id]))
    .await
    .unwrap();
  let (updated, event) = s
    .update_project(
      project.project_id,
      new_project("Alpha", vec![b.user_id, a.user_id]),
    )
    .await
    .unwrap();

  assert_eq!(updated.team_members, vec![b.user_id, a.user_id]);
  // The actor follows the new first member.
  assert_eq!(event.actor, b.user_id);

  let fetched = s.get_project(project.project_id).await.unwrap().unwrap();
  assert_eq!(fetched.team_members, vec![b.user_id, a.user_id]);
}

#[tokio::test]
async fn unknown_team_member_is_rejected() {
  let s = store().await;

  let err = s
    .create_project(new_project("Alpha", vec![Uuid::new_v4()]))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::UserNotFound(_))
  ));
  assert!(s.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_team_rolls_back_project_creation() {
  let s = store().await;

  let err = s
    .create_project(new_project("Ghost", vec![]))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::EmptyTeam(_))
  ));

  // No project row and no event survived the rollback.
  assert!(s.list_projects().await.unwrap().is_empty());
  assert!(s.list_events(EventQuery::default()).await.unwrap().is_empty());
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn task_events_are_attributed_to_the_assignee() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let dev = user(&s, "dev@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id, dev.user_id]))
    .await
    .unwrap();

  let (task, event) = s
    .create_task(new_task("Ship it", project.project_id, dev.user_id))
    .await
    .unwrap();

  assert_eq!(event.event_type, EventType::TaskCreated);
  assert_eq!(event.actor, dev.user_id);
  assert_eq!(event.subject, SubjectRef::Task(task.task_id));
  assert_eq!(event.project_id, project.project_id);
  assert_eq!(
    event.description,
    "Task 'Ship it' was created in project 'Alpha'"
  );
}

#[tokio::test]
async fn assign_task_notifies_the_new_assignee() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let dev = user(&s, "dev@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id, dev.user_id]))
    .await
    .unwrap();
  let (task, _) = s
    .create_task(new_task("Ship it", project.project_id, lead.user_id))
    .await
    .unwrap();

  let (task, event) = s.assign_task(task.task_id, dev.user_id).await.unwrap();

  assert_eq!(task.assignee_id, dev.user_id);
  assert_eq!(event.event_type, EventType::TaskUpdated);
  // Attribution follows the assignee after the change.
  assert_eq!(event.actor, dev.user_id);

  let inbox = s.list_notifications(dev.user_id).await.unwrap();
  assert_eq!(inbox.len(), 1);
  assert_eq!(
    inbox[0].message,
    "You have been assigned task 'Ship it' in project 'Alpha'"
  );
  assert!(!inbox[0].is_read);
}

#[tokio::test]
async fn cascade_delete_emits_no_child_events() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id]))
    .await
    .unwrap();
  let (task, _) = s
    .create_task(new_task("Ship it", project.project_id, lead.user_id))
    .await
    .unwrap();
  s.create_document(new_document("Design notes", project.project_id))
    .await
    .unwrap();

  s.delete_project(project.project_id).await.unwrap();

  // The cascaded task and document rows are gone without events of their
  // own: create x3 plus the project deletion.
  let events = s.list_events(EventQuery::default()).await.unwrap();
  assert_eq!(events.len(), 4);
  assert_eq!(events[0].event_type, EventType::ProjectDeleted);
  assert!(s.get_task(task.task_id).await.unwrap().is_none());
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_creation_reads_as_an_upload() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id]))
    .await
    .unwrap();

  let (document, event) = s
    .create_document(new_document("Design notes", project.project_id))
    .await
    .unwrap();

  assert_eq!(event.event_type, EventType::DocumentUploaded);
  assert_eq!(
    event.description,
    "Document 'Design notes' was uploaded to project 'Alpha'"
  );
  assert_eq!(event.subject, SubjectRef::Document(document.document_id));
  // Documents fall back to the first team member.
  assert_eq!(event.actor, lead.user_id);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comment_parentage_follows_the_task() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let dev = user(&s, "dev@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id, dev.user_id]))
    .await
    .unwrap();
  let (task, _) = s
    .create_task(new_task("Ship it", project.project_id, lead.user_id))
    .await
    .unwrap();

  let (comment, event) = s
    .create_comment(NewComment {
      text:      "Looks good".into(),
      author_id: dev.user_id,
      task_id:   task.task_id,
    })
    .await
    .unwrap();

  // project_id came from the task, not the caller.
  assert_eq!(comment.project_id, project.project_id);
  assert_eq!(event.actor, dev.user_id);
  assert_eq!(
    event.description,
    "Comment on task 'Ship it' in project 'Alpha' was created: \"Looks good\""
  );

  let by_task = s
    .list_comments(CommentFilter::Task(task.task_id))
    .await
    .unwrap();
  let by_project = s
    .list_comments(CommentFilter::Project(project.project_id))
    .await
    .unwrap();
  assert_eq!(by_task.len(), 1);
  assert_eq!(by_task, by_project);
}

#[tokio::test]
async fn update_comment_replaces_text_only() {
  let s = store().await;
  let lead = user(&s, "lead@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![lead.user_id]))
    .await
    .unwrap();
  let (task, _) = s
    .create_task(new_task("Ship it", project.project_id, lead.user_id))
    .await
    .unwrap();
  let (comment, _) = s
    .create_comment(NewComment {
      text:      "First draft".into(),
      author_id: lead.user_id,
      task_id:   task.task_id,
    })
    .await
    .unwrap();

  let (updated, event) = s
    .update_comment(comment.comment_id, "Revised".into())
    .await
    .unwrap();

  assert_eq!(updated.text, "Revised");
  assert_eq!(updated.author_id, comment.author_id);
  assert_eq!(updated.task_id, comment.task_id);
  assert_eq!(updated.created_at, comment.created_at);
  assert_eq!(event.event_type, EventType::CommentUpdated);
  assert_eq!(
    event.description,
    "Comment on task 'Ship it' in project 'Alpha' was updated: \"Revised\""
  );
}

// ─── Timeline ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn project_history_reads_newest_first() {
  let s = store().await;
  let u1 = user(&s, "u1@example.com").await;
  let u2 = user(&s, "u2@example.com").await;

  let (alpha, created) = s
    .create_project(new_project("Alpha", vec![u1.user_id, u2.user_id]))
    .await
    .unwrap();
  let (t1, t1_created) = s
    .create_task(new_task("T1", alpha.project_id, u2.user_id))
    .await
    .unwrap();
  let t1_deleted = s.delete_task(t1.task_id).await.unwrap();

  let events = s
    .list_events(EventQuery {
      project_id: Some(alpha.project_id),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(events.len(), 3);
  assert_eq!(events[0].event_id, t1_deleted.event_id);
  assert_eq!(events[1].event_id, t1_created.event_id);
  assert_eq!(events[2].event_id, created.event_id);

  assert_eq!(events[0].event_type, EventType::TaskDeleted);
  // The delete is still attributed to the assignee, from the pre-delete
  // snapshot.
  assert_eq!(events[0].actor, u2.user_id);
  assert_eq!(
    events[0].description,
    "Task 'T1' was deleted in project 'Alpha'"
  );
  assert_eq!(events[1].event_type, EventType::TaskCreated);
  assert_eq!(events[1].actor, u2.user_id);
  assert_eq!(events[2].event_type, EventType::ProjectCreated);
  assert_eq!(events[2].actor, u1.user_id);
}

#[tokio::test]
async fn renames_do_not_rewrite_history() {
  let s = store().await;
  let u = user(&s, "lead@example.com").await;

  let (project, _) = s
    .create_project(new_project("Alpha", vec![u.user_id]))
    .await
    .unwrap();
  s.update_project(project.project_id, new_project("Beta", vec![u.user_id]))
    .await
    .unwrap();

  let events = s.list_events(EventQuery::default()).await.unwrap();
  let descriptions: Vec<_> =
    events.iter().map(|e| e.description.as_str()).collect();
  assert_eq!(
    descriptions,
    ["Project 'Beta' was updated", "Project 'Alpha' was created"]
  );
}

#[tokio::test]
async fn delete_preserves_prior_events() {
  let s = store().await;
  let u = user(&s, "lead@example.com").await;

  let (project, _) = s
    .create_project(new_project("Doomed", vec![u.user_id]))
    .await
    .unwrap();
  let deleted = s.delete_project(project.project_id).await.unwrap();
  assert_eq!(deleted.description, "Project 'Doomed' was deleted");

  // Both events survive, their subject reference now dangling.
  let events = s.list_events(EventQuery::default()).await.unwrap();
  assert_eq!(events.len(), 2);
  assert!(
    events
      .iter()
      .all(|e| e.subject == SubjectRef::Project(project.project_id))
  );
}

#[tokio::test]
async fn filtered_timeline_rejects_a_deleted_project() {
  let s = store().await;
  let u = user(&s, "lead@example.com").await;

  let (project, _) = s
    .create_project(new_project("Doomed", vec![u.user_id]))
    .await
    .unwrap();
  s.delete_project(project.project_id).await.unwrap();

  let err = s
    .list_events(EventQuery {
      project_id: Some(project.project_id),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::ProjectNotFound(_))
  ));

  // The unfiltered listing still carries the project's events.
  let all = s.list_events(EventQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn timeline_limit_and_offset_page_newest_first() {
  let s = store().await;
  let u = user(&s, "lead@example.com").await;
  let (project, _) = s
    .create_project(new_project("Alpha", vec![u.user_id]))
    .await
    .unwrap();

  for i in 0..4 {
    s.create_task(new_task(&format!("T{i}"), project.project_id, u.user_id))
      .await
      .unwrap();
  }

  // Five events total; skip the newest two.
  let page = s
    .list_events(EventQuery {
      limit:  Some(2),
      offset: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert_eq!(page[0].description, "Task 'T1' was created in project 'Alpha'");
  assert_eq!(page[1].description, "Task 'T0' was created in project 'Alpha'");
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_listed_newest_first() {
  let s = store().await;
  let u = user(&s, "dev@example.com").await;

  s.push_notification(u.user_id, "first".into()).await.unwrap();
  s.push_notification(u.user_id, "second".into()).await.unwrap();

  let inbox = s.list_notifications(u.user_id).await.unwrap();
  assert_eq!(inbox.len(), 2);
  assert_eq!(inbox[0].message, "second");
  assert_eq!(inbox[1].message, "first");
}

#[tokio::test]
async fn push_notification_requires_a_known_user() {
  let s = store().await;
  let err = s
    .push_notification(Uuid::new_v4(), "ping".into())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::UserNotFound(_))
  ));
}

#[tokio::test]
async fn mark_read_flips_exactly_once() {
  let s = store().await;
  let u = user(&s, "dev@example.com").await;
  let n = s.push_notification(u.user_id, "ping".into()).await.unwrap();

  let read = s
    .mark_notification_read(n.notification_id, u.user_id)
    .await
    .unwrap();
  assert!(read.is_read);

  let err = s
    .mark_notification_read(n.notification_id, u.user_id)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::AlreadyRead(_))
  ));
}

#[tokio::test]
async fn mark_read_requires_ownership() {
  let s = store().await;
  let owner = user(&s, "owner@example.com").await;
  let other = user(&s, "other@example.com").await;
  let n = s
    .push_notification(owner.user_id, "ping".into())
    .await
    .unwrap();

  let err = s
    .mark_notification_read(n.notification_id, other.user_id)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(docket_core::Error::NotificationNotFound(_))
  ));

  // Still unread for the owner.
  let inbox = s.list_notifications(owner.user_id).await.unwrap();
  assert!(!inbox[0].is_read);
}

//! JSON REST API for Docket.
//!
//! Exposes an axum [`Router`] backed by any
//! [`docket_core::store::TrackerStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", docket_api::api_router(store.clone()))
//! ```

pub mod comments;
pub mod documents;
pub mod error;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod timeline;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use docket_core::store::TrackerStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TrackerStore + Clone + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Projects
    .route(
      "/projects",
      get(projects::list::<S>).post(projects::create::<S>),
    )
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>)
        .put(projects::update::<S>)
        .delete(projects::remove::<S>),
    )
    // Tasks
    .route("/tasks", get(tasks::list::<S>).post(tasks::create::<S>))
    .route(
      "/tasks/{id}",
      get(tasks::get_one::<S>)
        .put(tasks::update::<S>)
        .delete(tasks::remove::<S>),
    )
    .route("/tasks/{id}/assign", post(tasks::assign::<S>))
    // Documents
    .route(
      "/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/documents/{id}",
      get(documents::get_one::<S>)
        .put(documents::update::<S>)
        .delete(documents::remove::<S>),
    )
    // Comments
    .route(
      "/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route(
      "/comments/{id}",
      get(comments::get_one::<S>)
        .put(comments::update::<S>)
        .delete(comments::remove::<S>),
    )
    // Timeline
    .route("/timeline", get(timeline::list::<S>))
    // Notifications
    .route("/notifications", get(notifications::list::<S>))
    .route(
      "/notifications/{id}/mark_read",
      put(notifications::mark_read::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{Days, Utc};
  use docket_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn test_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn uuid_of(value: &Value) -> Uuid {
    value
      .as_str()
      .and_then(|s| Uuid::parse_str(s).ok())
      .expect("uuid field")
  }

  async fn register(router: &Router, email: &str) -> Uuid {
    let (status, body) =
      send(router, "POST", "/users", Some(json!({ "email": email }))).await;
    assert_eq!(status, StatusCode::CREATED);
    uuid_of(&body["user_id"])
  }

  fn project_body(title: &str, team: &[Uuid]) -> Value {
    let today = Utc::now().date_naive();
    json!({
      "title":        title,
      "description":  "a project",
      "start_date":   today,
      "end_date":     today + Days::new(30),
      "team_members": team,
    })
  }

  async fn make_project(router: &Router, title: &str, team: &[Uuid]) -> Uuid {
    let (status, body) =
      send(router, "POST", "/projects", Some(project_body(title, team))).await;
    assert_eq!(status, StatusCode::CREATED);
    uuid_of(&body["project_id"])
  }

  async fn make_task(
    router: &Router,
    title: &str,
    project_id: Uuid,
    assignee_id: Uuid,
  ) -> Uuid {
    let (status, body) = send(
      router,
      "POST",
      "/tasks",
      Some(json!({
        "title":       title,
        "description": "a task",
        "project_id":  project_id,
        "assignee_id": assignee_id,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    uuid_of(&body["task_id"])
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_and_fetch_a_user() {
    let router = test_router().await;
    let id = register(&router, "alice@example.com").await;

    let (status, body) =
      send(&router, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");

    let (status, _) =
      send(&router, "GET", &format!("/users/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn invalid_email_names_the_field() {
    let router = test_router().await;
    let (status, body) =
      send(&router, "POST", "/users", Some(json!({ "email": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
  }

  #[tokio::test]
  async fn duplicate_email_names_the_field() {
    let router = test_router().await;
    register(&router, "taken@example.com").await;

    let (status, body) = send(
      &router,
      "POST",
      "/users",
      Some(json!({ "email": "taken@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
  }

  // ── Projects ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn project_lifecycle_over_http() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let id = make_project(&router, "Alpha", &[lead]).await;

    let (status, body) =
      send(&router, "GET", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Alpha");

    let (status, body) = send(
      &router,
      "PUT",
      &format!("/projects/{id}"),
      Some(project_body("Beta", &[lead])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Beta");

    let (status, _) =
      send(&router, "DELETE", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&router, "GET", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn empty_team_is_rejected_up_front() {
    let router = test_router().await;
    let (status, body) =
      send(&router, "POST", "/projects", Some(project_body("Alpha", &[])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "team_members");
  }

  // ── Tasks ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn task_listing_requires_a_project() {
    let router = test_router().await;
    let (status, body) = send(&router, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "project_id is required");
  }

  #[tokio::test]
  async fn assignment_reaches_the_new_assignee() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let dev = register(&router, "dev@example.com").await;
    let project = make_project(&router, "Alpha", &[lead, dev]).await;
    let task = make_task(&router, "Ship it", project, lead).await;

    let (status, body) = send(
      &router,
      "POST",
      &format!("/tasks/{task}/assign"),
      Some(json!({ "assignee": dev })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uuid_of(&body["assignee_id"]), dev);

    let (status, inbox) = send(
      &router,
      "GET",
      &format!("/notifications?user_id={dev}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let inbox = inbox.as_array().unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(
      inbox[0]["message"],
      "You have been assigned task 'Ship it' in project 'Alpha'"
    );
  }

  // ── Timeline ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn project_timeline_over_http() {
    let router = test_router().await;
    let u1 = register(&router, "u1@example.com").await;
    let u2 = register(&router, "u2@example.com").await;
    let alpha = make_project(&router, "Alpha", &[u1, u2]).await;
    let t1 = make_task(&router, "T1", alpha, u2).await;
    send(
      &router,
      "POST",
      &format!("/tasks/{t1}/assign"),
      Some(json!({ "assignee": u1 })),
    )
    .await;

    let (status, body) = send(
      &router,
      "GET",
      &format!("/timeline?project_id={alpha}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0]["event_type"], "task_updated");
    assert_eq!(uuid_of(&events[0]["user"]), u1);
    assert_eq!(events[1]["event_type"], "task_created");
    assert_eq!(uuid_of(&events[1]["user"]), u2);
    assert_eq!(events[2]["event_type"], "project_created");
    assert_eq!(uuid_of(&events[2]["user"]), u1);
    assert_eq!(events[2]["description"], "Project 'Alpha' was created");

    // The subject reference is flattened onto the event.
    assert_eq!(uuid_of(&events[1]["task"]), t1);
    assert_eq!(uuid_of(&events[2]["project"]), alpha);
  }

  #[tokio::test]
  async fn deleted_project_filter_returns_404() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let id = make_project(&router, "Doomed", &[lead]).await;
    send(&router, "DELETE", &format!("/projects/{id}"), None).await;

    let (status, _) = send(
      &router,
      "GET",
      &format!("/timeline?project_id={id}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unfiltered, the project's events are still visible.
    let (status, body) = send(&router, "GET", "/timeline", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  // ── Documents ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn document_upload_lands_on_the_timeline() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let project = make_project(&router, "Alpha", &[lead]).await;

    let (status, _) = send(
      &router,
      "POST",
      "/documents",
      Some(json!({
        "name":        "Design notes",
        "description": "architecture sketches",
        "project_id":  project,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&router, "GET", "/timeline", None).await;
    let events = body.as_array().unwrap();
    assert_eq!(events[0]["event_type"], "document_uploaded");
    assert_eq!(
      events[0]["description"],
      "Document 'Design notes' was uploaded to project 'Alpha'"
    );
  }

  // ── Comments ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn comment_listing_needs_a_parent_filter() {
    let router = test_router().await;
    let (status, body) = send(&router, "GET", "/comments", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "task_id or project_id is required");
  }

  #[tokio::test]
  async fn comment_updates_touch_only_the_text() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let project = make_project(&router, "Alpha", &[lead]).await;
    let task = make_task(&router, "Ship it", project, lead).await;

    let (status, body) = send(
      &router,
      "POST",
      "/comments",
      Some(json!({
        "text":      "First pass",
        "author_id": lead,
        "task_id":   task,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment = uuid_of(&body["comment_id"]);
    assert_eq!(uuid_of(&body["project_id"]), project);

    let (status, body) = send(
      &router,
      "PUT",
      &format!("/comments/{comment}"),
      Some(json!({ "text": "Second pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Second pass");
    assert_eq!(uuid_of(&body["author_id"]), lead);
  }

  // ── Notifications ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mark_read_conflicts_read_as_400() {
    let router = test_router().await;
    let lead = register(&router, "lead@example.com").await;
    let dev = register(&router, "dev@example.com").await;
    let project = make_project(&router, "Alpha", &[lead, dev]).await;
    let task = make_task(&router, "Ship it", project, lead).await;
    send(
      &router,
      "POST",
      &format!("/tasks/{task}/assign"),
      Some(json!({ "assignee": dev })),
    )
    .await;

    let (_, inbox) = send(
      &router,
      "GET",
      &format!("/notifications?user_id={dev}"),
      None,
    )
    .await;
    let n = uuid_of(&inbox[0]["notification_id"]);

    let uri = format!("/notifications/{n}/mark_read?user_id={dev}");
    let (status, body) = send(&router, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);

    let (status, _) = send(&router, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Someone else's user_id cannot see or flip it.
    let (status, _) = send(
      &router,
      "PUT",
      &format!("/notifications/{n}/mark_read?user_id={lead}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Missing resources ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_ids_return_404() {
    let router = test_router().await;
    let id = Uuid::new_v4();

    for uri in [
      format!("/projects/{id}"),
      format!("/tasks/{id}"),
      format!("/documents/{id}"),
      format!("/comments/{id}"),
    ] {
      let (status, _) = send(&router, "GET", &uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
    }

    let (status, _) =
      send(&router, "DELETE", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}

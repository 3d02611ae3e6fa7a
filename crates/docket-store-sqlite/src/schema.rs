//! SQL schema for the Docket SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    username    TEXT,
    email       TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id        TEXT PRIMARY KEY REFERENCES users(user_id) ON DELETE CASCADE,
    role           TEXT NOT NULL,    -- 'qa' | 'manager' | 'developer'
    contact_number TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    project_id  TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    start_date  TEXT NOT NULL,    -- ISO 8601 date
    end_date    TEXT NOT NULL
);

-- Ordered team membership. `position` preserves the order members were
-- supplied in; the member at position 0 is the fallback event actor.
CREATE TABLE IF NOT EXISTS project_members (
    project_id TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    position   INTEGER NOT NULL,
    PRIMARY KEY (project_id, user_id)
);

CREATE TABLE IF NOT EXISTS tasks (
    task_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    status      TEXT NOT NULL,    -- 'open' | 'review' | ... | 'waiting_qa'
    project_id  TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    assignee_id TEXT NOT NULL REFERENCES users(user_id)
);

CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    file_name   TEXT,
    version     REAL NOT NULL,
    project_id  TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    text       TEXT NOT NULL,
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    task_id    TEXT NOT NULL REFERENCES tasks(task_id) ON DELETE CASCADE,
    project_id TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE
);

-- The timeline is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table, and the subject and
-- project columns carry no foreign keys: events outlive the entities they
-- reference, dangling ids included.
CREATE TABLE IF NOT EXISTS timeline_events (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id     TEXT NOT NULL UNIQUE,
    event_type   TEXT NOT NULL,
    description  TEXT NOT NULL,
    timestamp    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    subject_kind TEXT NOT NULL,   -- 'project' | 'task' | 'document' | 'comment'
    subject_id   TEXT NOT NULL,
    project_id   TEXT NOT NULL,   -- owning-project backlink at write time
    user_id      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    message         TEXT NOT NULL,
    is_read         INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_project_idx    ON timeline_events(project_id);
CREATE INDEX IF NOT EXISTS events_timestamp_idx  ON timeline_events(timestamp);
CREATE INDEX IF NOT EXISTS tasks_project_idx     ON tasks(project_id);
CREATE INDEX IF NOT EXISTS documents_project_idx ON documents(project_id);
CREATE INDEX IF NOT EXISTS comments_task_idx     ON comments(task_id);
CREATE INDEX IF NOT EXISTS comments_project_idx  ON comments(project_id);
CREATE INDEX IF NOT EXISTS notifications_user_idx ON notifications(user_id);

PRAGMA user_version = 1;
";

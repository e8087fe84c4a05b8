//! SQL schema for the Learning Log SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    date_joined   TEXT NOT NULL    -- RFC 3339 UTC, fixed microsecond width
);

CREATE TABLE IF NOT EXISTS topics (
    topic_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    date_added  TEXT NOT NULL,
    owner_id    INTEGER NOT NULL REFERENCES users(user_id),
    public      INTEGER NOT NULL DEFAULT 0 CHECK (public IN (0, 1))
);

-- An entry cannot outlive its topic.
CREATE TABLE IF NOT EXISTS entries (
    entry_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id    INTEGER NOT NULL REFERENCES topics(topic_id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    date_added  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS topics_owner_idx   ON topics(owner_id, public);
CREATE INDEX IF NOT EXISTS topics_public_idx  ON topics(public);
CREATE INDEX IF NOT EXISTS entries_topic_idx  ON entries(topic_id, date_added);

PRAGMA user_version = 1;
";

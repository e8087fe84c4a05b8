//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond width,
//! so lexical order in SQL equals chronological order. Booleans are stored as
//! `0`/`1` integers.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use learnlog_core::{
  entry::{Entry, EntryId},
  topic::{Topic, TopicId},
  user::{Credentials, User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps, so a record returned
/// from an insert is identical to the same record read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, username, date_joined, password_hash";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       i64,
  pub username:      String,
  pub date_joined:   String,
  pub password_hash: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      date_joined:   row.get(2)?,
      password_hash: row.get(3)?,
    })
  }

  pub fn into_credentials(self) -> Result<Credentials> {
    Ok(Credentials {
      user:          User {
        user_id:     UserId(self.user_id),
        username:    self.username,
        date_joined: decode_dt(&self.date_joined)?,
      },
      password_hash: self.password_hash,
    })
  }

  pub fn into_user(self) -> Result<User> {
    self.into_credentials().map(|c| c.user)
  }
}

pub const TOPIC_COLUMNS: &str = "topic_id, title, date_added, owner_id, public";

/// Raw values read directly from a `topics` row.
pub struct RawTopic {
  pub topic_id:   i64,
  pub title:      String,
  pub date_added: String,
  pub owner_id:   i64,
  pub public:     bool,
}

impl RawTopic {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      topic_id:   row.get(0)?,
      title:      row.get(1)?,
      date_added: row.get(2)?,
      owner_id:   row.get(3)?,
      public:     row.get(4)?,
    })
  }

  pub fn into_topic(self) -> Result<Topic> {
    Ok(Topic {
      topic_id:   TopicId(self.topic_id),
      title:      self.title,
      date_added: decode_dt(&self.date_added)?,
      owner:      UserId(self.owner_id),
      public:     self.public,
    })
  }
}

pub const ENTRY_COLUMNS: &str = "entry_id, topic_id, text, date_added";

/// Raw values read directly from an `entries` row.
pub struct RawEntry {
  pub entry_id:   i64,
  pub topic_id:   i64,
  pub text:       String,
  pub date_added: String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:   row.get(0)?,
      topic_id:   row.get(1)?,
      text:       row.get(2)?,
      date_added: row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<Entry> {
    Ok(Entry {
      entry_id:   EntryId(self.entry_id),
      topic_id:   TopicId(self.topic_id),
      text:       self.text,
      date_added: decode_dt(&self.date_added)?,
    })
  }
}

//! [`SqliteStore`] — the SQLite implementation of [`LearningStore`].

use std::path::Path;

use learnlog_core::{
  entry::{Entry, EntryId, NewEntry},
  store::LearningStore,
  topic::{NewTopic, Topic, TopicFilter, TopicId},
  user::{Credentials, User, UserId},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    ENTRY_COLUMNS, RawEntry, RawTopic, RawUser, TOPIC_COLUMNS, USER_COLUMNS,
    encode_dt, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Learning Log store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
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

// ─── LearningStore impl ──────────────────────────────────────────────────────

impl LearningStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, username: &str, password_hash: &str) -> Result<User> {
    let user = User {
      user_id:     UserId(0),
      username:    username.to_owned(),
      date_joined: now(),
    };

    let name_str = user.username.clone();
    let hash_str = password_hash.to_owned();
    let at_str   = encode_dt(user.date_joined);

    let row_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![name_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO users (username, password_hash, date_joined) VALUES (?1, ?2, ?3)",
          rusqlite::params![name_str, hash_str, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let row_id = row_id.ok_or_else(|| Error::UsernameTaken(user.username.clone()))?;
    tracing::info!(user_id = row_id, username = %user.username, "user added");
    Ok(User { user_id: UserId(row_id), ..user })
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id.0],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    tracing::debug!(user_id = %id, found = raw.is_some(), "user lookup");
    raw.map(RawUser::into_user).transpose()
  }

  async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>> {
    let name_str = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            rusqlite::params![name_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    tracing::debug!(%username, found = raw.is_some(), "credentials lookup");
    raw.map(RawUser::into_credentials).transpose()
  }

  // ── Topics ────────────────────────────────────────────────────────────────

  async fn add_topic(&self, input: NewTopic) -> Result<Topic> {
    let topic = Topic {
      topic_id:   TopicId(0),
      title:      input.title,
      date_added: now(),
      owner:      input.owner,
      public:     input.public,
    };

    let title_str = topic.title.clone();
    let at_str    = encode_dt(topic.date_added);
    let owner_id  = topic.owner.0;
    let public    = topic.public;

    let row_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO topics (title, date_added, owner_id, public) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![title_str, at_str, owner_id, public],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(
      topic_id = row_id,
      owner = %topic.owner,
      public = topic.public,
      "topic added"
    );
    Ok(Topic { topic_id: TopicId(row_id), ..topic })
  }

  async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>> {
    let raw: Option<RawTopic> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE topic_id = ?1"),
            rusqlite::params![id.0],
            RawTopic::from_row,
          )
          .optional()?)
      })
      .await?;

    tracing::debug!(topic_id = %id, found = raw.is_some(), "topic lookup");
    raw.map(RawTopic::into_topic).transpose()
  }

  async fn list_topics(&self, filter: TopicFilter) -> Result<Vec<Topic>> {
    let owner_id = filter.owner.map(|o| o.0);
    let public   = filter.public;

    let raws: Vec<RawTopic> = self
      .conn
      .call(move |conn| {
        // NULL parameters disable their condition.
        let mut stmt = conn.prepare(&format!(
          "SELECT {TOPIC_COLUMNS} FROM topics
           WHERE (?1 IS NULL OR owner_id = ?1)
             AND (?2 IS NULL OR public = ?2)
           ORDER BY date_added ASC, topic_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_id, public], RawTopic::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(?filter, count = raws.len(), "topics listed");
    raws.into_iter().map(RawTopic::into_topic).collect()
  }

  // ── Entries ───────────────────────────────────────────────────────────────

  async fn add_entry(&self, input: NewEntry) -> Result<Entry> {
    let entry = Entry {
      entry_id:   EntryId(0),
      topic_id:   input.topic_id,
      text:       input.text,
      date_added: now(),
    };

    let topic_id = entry.topic_id.0;
    let text_str = entry.text.clone();
    let at_str   = encode_dt(entry.date_added);

    let row_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM topics WHERE topic_id = ?1",
            rusqlite::params![topic_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO entries (topic_id, text, date_added) VALUES (?1, ?2, ?3)",
          rusqlite::params![topic_id, text_str, at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let row_id = row_id.ok_or(Error::TopicNotFound(entry.topic_id))?;
    tracing::info!(entry_id = row_id, topic_id = %entry.topic_id, "entry added");
    Ok(Entry { entry_id: EntryId(row_id), ..entry })
  }

  async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE entry_id = ?1"),
            rusqlite::params![id.0],
            RawEntry::from_row,
          )
          .optional()?)
      })
      .await?;

    tracing::debug!(entry_id = %id, found = raw.is_some(), "entry lookup");
    raw.map(RawEntry::into_entry).transpose()
  }

  async fn update_entry(&self, id: EntryId, text: String) -> Result<Entry> {
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE entries SET text = ?1 WHERE entry_id = ?2",
          rusqlite::params![text, id.0],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(Some(conn.query_row(
          &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE entry_id = ?1"),
          rusqlite::params![id.0],
          RawEntry::from_row,
        )?))
      })
      .await?;

    let entry = raw.ok_or(Error::EntryNotFound(id))?.into_entry()?;
    tracing::info!(entry_id = %id, topic_id = %entry.topic_id, "entry updated");
    Ok(entry)
  }

  async fn list_entries(&self, topic: TopicId) -> Result<Vec<Entry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM entries
           WHERE topic_id = ?1
           ORDER BY date_added DESC, entry_id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![topic.0], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(topic_id = %topic, count = raws.len(), "entries listed");
    raws.into_iter().map(RawEntry::into_entry).collect()
  }
}

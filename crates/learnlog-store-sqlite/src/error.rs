//! Error type for `learnlog-store-sqlite`.

use learnlog_core::{entry::EntryId, topic::TopicId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("topic not found: {0}")]
  TopicNotFound(TopicId),

  #[error("entry not found: {0}")]
  EntryNotFound(EntryId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

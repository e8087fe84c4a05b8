//! Entry — a dated note belonging to exactly one topic.
//!
//! Entries carry no owner of their own; visibility and write access are
//! always those of the parent topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topic::TopicId;

/// Row id of an entry.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl std::fmt::Display for EntryId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  pub entry_id:   EntryId,
  pub topic_id:   TopicId,
  pub text:       String,
  /// Server-assigned timestamp; unchanged by edits.
  pub date_added: DateTime<Utc>,
}

/// Input to [`crate::store::LearningStore::add_entry`].
#[derive(Debug, Clone)]
pub struct NewEntry {
  pub topic_id: TopicId,
  pub text:     String,
}

//! The `LearningStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `learnlog-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.
//! Access checks are not the store's concern: every method returns records
//! regardless of who asks.

use std::future::Future;

use crate::{
  entry::{Entry, EntryId, NewEntry},
  topic::{NewTopic, Topic, TopicFilter, TopicId},
  user::{Credentials, User, UserId},
};

/// Abstraction over a Learning Log storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LearningStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user. Returns an error if `username` is already taken.
  fn add_user<'a>(
    &'a self,
    username: &'a str,
    password_hash: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user and their password hash for credential checks.
  fn get_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Topics ────────────────────────────────────────────────────────────

  /// Persist a new topic. `date_added` is set by the store.
  fn add_topic(
    &self,
    input: NewTopic,
  ) -> impl Future<Output = Result<Topic, Self::Error>> + Send + '_;

  /// Retrieve a topic by id. Returns `None` if not found.
  fn get_topic(
    &self,
    id: TopicId,
  ) -> impl Future<Output = Result<Option<Topic>, Self::Error>> + Send + '_;

  /// Topics matching `filter`, oldest first.
  fn list_topics(
    &self,
    filter: TopicFilter,
  ) -> impl Future<Output = Result<Vec<Topic>, Self::Error>> + Send + '_;

  // ── Entries ───────────────────────────────────────────────────────────

  /// Persist a new entry under an existing topic. Returns an error if the
  /// topic does not exist.
  fn add_entry(
    &self,
    input: NewEntry,
  ) -> impl Future<Output = Result<Entry, Self::Error>> + Send + '_;

  /// Retrieve an entry by id. Returns `None` if not found.
  fn get_entry(
    &self,
    id: EntryId,
  ) -> impl Future<Output = Result<Option<Entry>, Self::Error>> + Send + '_;

  /// Replace the text of an entry and return the updated record.
  /// Returns an error if the entry does not exist.
  fn update_entry(
    &self,
    id: EntryId,
    text: String,
  ) -> impl Future<Output = Result<Entry, Self::Error>> + Send + '_;

  /// Entries belonging to `topic`, newest first.
  fn list_entries(
    &self,
    topic: TopicId,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + '_;
}

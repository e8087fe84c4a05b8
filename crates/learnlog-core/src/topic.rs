//! Topic — a named journal subject owned by one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Row id of a topic.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TopicId(pub i64);

impl std::fmt::Display for TopicId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// A topic as stored. `public` topics are readable by anyone; private ones
/// only by `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
  pub topic_id:   TopicId,
  pub title:      String,
  /// Server-assigned timestamp.
  pub date_added: DateTime<Utc>,
  pub owner:      UserId,
  pub public:     bool,
}

/// Input to [`crate::store::LearningStore::add_topic`].
/// `date_added` is always set by the store.
#[derive(Debug, Clone)]
pub struct NewTopic {
  pub title:  String,
  pub owner:  UserId,
  pub public: bool,
}

/// Parameters for [`crate::store::LearningStore::list_topics`]. Unset fields
/// do not filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicFilter {
  pub owner:  Option<UserId>,
  pub public: Option<bool>,
}

impl TopicFilter {
  /// Every public topic, regardless of owner.
  pub fn public() -> Self { Self { owner: None, public: Some(true) } }

  /// The private topics belonging to `owner`.
  pub fn private_of(owner: UserId) -> Self {
    Self { owner: Some(owner), public: Some(false) }
  }

  /// Whether `topic` satisfies this filter. Stores that filter in their own
  /// query language must select exactly the topics this accepts.
  pub fn matches(&self, topic: &Topic) -> bool {
    self.owner.is_none_or(|o| o == topic.owner)
      && self.public.is_none_or(|p| p == topic.public)
  }
}

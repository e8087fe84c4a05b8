//! The access guard for topics and their entries.
//!
//! Every decision is a pure function of the requester and the record. A
//! denial must reach the client as "not found", never "forbidden", so that a
//! private topic cannot be told apart from a missing one.

use crate::{Error, Result, entry::Entry, topic::Topic, user::UserId};

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
  Anonymous,
  User(UserId),
}

impl Requester {
  pub fn user_id(&self) -> Option<UserId> {
    match self {
      Self::Anonymous => None,
      Self::User(id) => Some(*id),
    }
  }

  /// Whether this requester is the authenticated user `owner`.
  pub fn is(&self, owner: UserId) -> bool { self.user_id() == Some(owner) }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Allow,
  Deny,
}

impl Access {
  /// Map a denial onto [`Error::NotFound`].
  pub fn or_not_found(self) -> Result<()> {
    match self {
      Self::Allow => Ok(()),
      Self::Deny => Err(Error::NotFound),
    }
  }
}

impl From<bool> for Access {
  fn from(allowed: bool) -> Self {
    if allowed { Self::Allow } else { Self::Deny }
  }
}

/// Read access to a topic: public topics are open to everyone, private ones
/// only to their owner.
pub fn authorize(requester: &Requester, topic: &Topic) -> Access {
  Access::from(topic.public || requester.is(topic.owner))
}

/// Write access to a topic and its entries: owner only, whatever the
/// visibility.
pub fn authorize_owner(requester: &Requester, topic: &Topic) -> Access {
  Access::from(requester.is(topic.owner))
}

/// Read access to an entry, which is exactly read access to its topic.
/// `topic` must be the entry's parent; anything else is denied.
pub fn authorize_entry(
  requester: &Requester,
  entry: &Entry,
  topic: &Topic,
) -> Access {
  if entry.topic_id != topic.topic_id {
    return Access::Deny;
  }
  authorize(requester, topic)
}

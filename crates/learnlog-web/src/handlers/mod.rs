pub mod entries;
pub mod topics;

use axum::{
  extract::{FromRequestParts, Path},
  http::request::Parts,
};
use learnlog_core::{
  access::{Requester, authorize_entry, authorize_owner},
  entry::{Entry, EntryId},
  store::LearningStore,
  topic::{Topic, TopicId},
};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// A record id taken from the URL path. Anything that does not parse as an
/// id names no record, so it is answered with the same 404 as a missing one.
pub struct RecordId<T>(pub T);

impl<S, T> FromRequestParts<S> for RecordId<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Send,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    match Path::<T>::from_request_parts(parts, state).await {
      Ok(Path(id)) => Ok(RecordId(id)),
      Err(rejection) => {
        tracing::debug!(%rejection, "unparseable record id");
        Err(Error::NotFound)
      }
    }
  }
}

/// Fetch a topic, or fail with [`Error::NotFound`].
pub(super) async fn find_topic<S>(store: &S, id: TopicId) -> Result<Topic, Error>
where
  S: LearningStore,
{
  store
    .get_topic(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)
}

/// Fetch a topic the requester may write to. A foreign topic is reported
/// exactly like a missing one.
pub(super) async fn owned_topic<S>(
  store: &S,
  requester: &Requester,
  id: TopicId,
) -> Result<Topic, Error>
where
  S: LearningStore,
{
  let topic = find_topic(store, id).await?;
  authorize_owner(requester, &topic).or_not_found().inspect_err(|_| {
    tracing::debug!(topic_id = %id, ?requester, "write to foreign topic denied");
  })?;
  Ok(topic)
}

/// Fetch an entry and its parent topic, provided the requester owns the
/// topic. The entry must first be visible under its topic's read rule.
pub(super) async fn owned_entry<S>(
  store: &S,
  requester: &Requester,
  id: EntryId,
) -> Result<(Entry, Topic), Error>
where
  S: LearningStore,
{
  let entry = store
    .get_entry(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let topic = find_topic(store, entry.topic_id).await?;
  authorize_entry(requester, &entry, &topic).or_not_found()?;
  authorize_owner(requester, &topic).or_not_found().inspect_err(|_| {
    tracing::debug!(entry_id = %id, ?requester, "edit of foreign entry denied");
  })?;
  Ok((entry, topic))
}

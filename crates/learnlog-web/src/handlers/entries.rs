//! Handlers for creating and editing entries. Only the owner of the parent
//! topic may do either; anyone else gets a 404.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/new_entry/{topic_id}` | blank form |
//! | `POST` | `/new_entry/{topic_id}` | form body: `text`; redirects to the topic |
//! | `GET`  | `/edit_entry/{entry_id}` | form pre-filled with the entry text |
//! | `POST` | `/edit_entry/{entry_id}` | form body: `text`; redirects to the topic |

use axum::{
  extract::{Form, State},
  response::{IntoResponse, Response},
};
use learnlog_core::{
  entry::{EntryId, NewEntry},
  form::{EntryForm, FormErrors},
  store::LearningStore,
  topic::TopicId,
};
use serde_json::json;

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  handlers::{RecordId, owned_entry, owned_topic},
  render::{self, FormView, Page},
};

// ─── New entry ───────────────────────────────────────────────────────────────

/// `GET /new_entry/{topic_id}`
pub async fn new_form<S>(
  State(state): State<AppState<S>>,
  user: Authenticated,
  RecordId(topic_id): RecordId<TopicId>,
) -> Result<Page, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let topic = owned_topic(state.store.as_ref(), &user.requester(), topic_id).await?;
  let form = EntryForm::default();
  Ok(Page::new(
    render::NEW_ENTRY,
    json!({ "topic": topic, "form": FormView::new(&form, &FormErrors::default()) }),
  ))
}

/// `POST /new_entry/{topic_id}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: Authenticated,
  RecordId(topic_id): RecordId<TopicId>,
  Form(form): Form<EntryForm>,
) -> Result<Response, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let topic = owned_topic(state.store.as_ref(), &user.requester(), topic_id).await?;

  let text = match form.validate() {
    Ok(text) => text,
    Err(errors) => {
      let context = json!({ "topic": topic, "form": FormView::new(&form, &errors) });
      return Ok(Page::invalid(render::NEW_ENTRY, context).into_response());
    }
  };

  let entry = state
    .store
    .add_entry(NewEntry { topic_id: topic.topic_id, text })
    .await
    .map_err(Error::store)?;

  tracing::info!(entry_id = %entry.entry_id, %topic_id, "entry created");
  Ok(render::redirect(&format!("/topics/{topic_id}")))
}

// ─── Edit entry ──────────────────────────────────────────────────────────────

/// `GET /edit_entry/{entry_id}`
pub async fn edit_form<S>(
  State(state): State<AppState<S>>,
  user: Authenticated,
  RecordId(entry_id): RecordId<EntryId>,
) -> Result<Page, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (entry, topic) =
    owned_entry(state.store.as_ref(), &user.requester(), entry_id).await?;
  let form = EntryForm::with_text(entry.text.clone());
  Ok(Page::new(
    render::EDIT_ENTRY,
    json!({
      "entry": entry,
      "topic": topic,
      "form":  FormView::new(&form, &FormErrors::default()),
    }),
  ))
}

/// `POST /edit_entry/{entry_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  user: Authenticated,
  RecordId(entry_id): RecordId<EntryId>,
  Form(form): Form<EntryForm>,
) -> Result<Response, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (entry, topic) =
    owned_entry(state.store.as_ref(), &user.requester(), entry_id).await?;

  let text = match form.validate() {
    Ok(text) => text,
    Err(errors) => {
      let context = json!({
        "entry": entry,
        "topic": topic,
        "form":  FormView::new(&form, &errors),
      });
      return Ok(Page::invalid(render::EDIT_ENTRY, context).into_response());
    }
  };

  state
    .store
    .update_entry(entry.entry_id, text)
    .await
    .map_err(Error::store)?;

  tracing::info!(%entry_id, topic_id = %topic.topic_id, "entry updated");
  Ok(render::redirect(&format!("/topics/{}", topic.topic_id)))
}

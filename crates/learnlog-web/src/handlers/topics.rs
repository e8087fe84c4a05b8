//! Handlers for the home page and topic pages.
//!
//! | Method | Path | Login | Notes |
//! |--------|------|-------|-------|
//! | `GET`  | `/` | no | home page |
//! | `GET`  | `/topics` | no | own private topics plus all public ones |
//! | `GET`  | `/topics/{topic_id}` | no | 404 if missing or private to someone else |
//! | `GET`  | `/new_topic` | yes | blank form |
//! | `POST` | `/new_topic` | yes | form body: `title`, `public` checkbox |

use axum::{
  extract::{Form, State},
  response::{IntoResponse, Response},
};
use learnlog_core::{
  access::{Requester, authorize},
  form::{FormErrors, TopicForm},
  store::LearningStore,
  topic::{NewTopic, TopicFilter, TopicId},
};
use serde_json::json;

use crate::{
  AppState,
  auth::{Authenticated, Identity},
  error::Error,
  handlers::{RecordId, find_topic},
  render::{self, FormView, Page},
};

/// `GET /`
pub async fn index() -> Page { Page::new(render::INDEX, json!({})) }

/// `GET /topics`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(requester): Identity,
) -> Result<Page, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let public_topics = state
    .store
    .list_topics(TopicFilter::public())
    .await
    .map_err(Error::store)?;

  let context = match requester {
    Requester::User(user_id) => {
      let topics = state
        .store
        .list_topics(TopicFilter::private_of(user_id))
        .await
        .map_err(Error::store)?;
      json!({ "topics": topics, "public_topics": public_topics })
    }
    Requester::Anonymous => json!({ "public_topics": public_topics }),
  };

  Ok(Page::new(render::TOPICS, context))
}

/// `GET /topics/{topic_id}` — the topic and its entries, newest first.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Identity(requester): Identity,
  RecordId(topic_id): RecordId<TopicId>,
) -> Result<Page, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let topic = find_topic(state.store.as_ref(), topic_id).await?;
  authorize(&requester, &topic).or_not_found().inspect_err(|_| {
    tracing::debug!(%topic_id, ?requester, "private topic hidden");
  })?;

  let entries = state
    .store
    .list_entries(topic.topic_id)
    .await
    .map_err(Error::store)?;

  Ok(Page::new(render::TOPIC, json!({ "topic": topic, "entries": entries })))
}

/// `GET /new_topic`
pub async fn new_form(_user: Authenticated) -> Page {
  let form = TopicForm::default();
  Page::new(
    render::NEW_TOPIC,
    json!({ "form": FormView::new(&form, &FormErrors::default()) }),
  )
}

/// `POST /new_topic` — redirects to `/topics` on success.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  Form(form): Form<TopicForm>,
) -> Result<Response, Error>
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let valid = match form.validate() {
    Ok(valid) => valid,
    Err(errors) => {
      let context = json!({ "form": FormView::new(&form, &errors) });
      return Ok(Page::invalid(render::NEW_TOPIC, context).into_response());
    }
  };

  let topic = state
    .store
    .add_topic(NewTopic {
      title:  valid.title,
      owner:  user.user_id,
      public: valid.public,
    })
    .await
    .map_err(Error::store)?;

  tracing::info!(
    topic_id = %topic.topic_id,
    owner = %topic.owner,
    public = topic.public,
    "topic created"
  );
  Ok(render::redirect("/topics"))
}

//! HTTP layer for the Learning Log.
//!
//! Exposes an axum [`Router`] serving topic and entry pages backed by any
//! [`LearningStore`]. Every page answers with a view name and a context
//! mapping (see [`render`]); form submissions redirect on success.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod render;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use learnlog_core::store::LearningStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{entries, topics};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LEARNLOG_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: LearningStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the Learning Log.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/",                       get(topics::index))
    .route("/topics",                 get(topics::list::<S>))
    .route("/topics/{topic_id}",      get(topics::show::<S>))
    .route("/new_topic",              get(topics::new_form).post(topics::create::<S>))
    .route("/new_entry/{topic_id}",   get(entries::new_form::<S>).post(entries::create::<S>))
    .route("/edit_entry/{entry_id}",  get(entries::edit_form::<S>).post(entries::update::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use learnlog_core::{
    entry::NewEntry,
    topic::{NewTopic, Topic, TopicFilter, TopicId},
    user::User,
  };
  use learnlog_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use crate::auth::hash_password;

  const FORM: &str = "application/x-www-form-urlencoded";

  struct Fixture {
    state: AppState<SqliteStore>,
    alice: User,
    bob:   User,
  }

  async fn fixture() -> Fixture {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let alice = store
      .add_user("alice", &hash_password("alice-pw").unwrap())
      .await
      .unwrap();
    let bob = store
      .add_user("bob", &hash_password("bob-pw").unwrap())
      .await
      .unwrap();
    Fixture { state: AppState { store: Arc::new(store) }, alice, bob }
  }

  impl Fixture {
    async fn topic(&self, owner: &User, title: &str, public: bool) -> Topic {
      self
        .state
        .store
        .add_topic(NewTopic { title: title.into(), owner: owner.user_id, public })
        .await
        .unwrap()
    }

    async fn entry(&self, topic: &Topic, text: &str) {
      self
        .state
        .store
        .add_entry(NewEntry { topic_id: topic.topic_id, text: text.into() })
        .await
        .unwrap();
    }

    async fn send(
      &self,
      method: &str,
      uri: &str,
      login: Option<(&str, &str)>,
      form: Option<&str>,
    ) -> Response {
      let mut builder = Request::builder().method(method).uri(uri);
      if let Some((user, pass)) = login {
        let creds = B64.encode(format!("{user}:{pass}"));
        builder = builder.header(header::AUTHORIZATION, format!("Basic {creds}"));
      }
      if form.is_some() {
        builder = builder.header(header::CONTENT_TYPE, FORM);
      }
      let req = builder
        .body(Body::from(form.unwrap_or_default().to_string()))
        .unwrap();
      router(self.state.clone()).oneshot(req).await.unwrap()
    }
  }

  const ALICE: Option<(&str, &str)> = Some(("alice", "alice-pw"));
  const BOB: Option<(&str, &str)> = Some(("bob", "bob-pw"));

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn text_body(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn location(resp: &Response) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
  }

  fn titles(v: &Value) -> Vec<&str> {
    v.as_array()
      .unwrap()
      .iter()
      .map(|t| t["title"].as_str().unwrap())
      .collect()
  }

  // ── Index ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_renders_for_anyone() {
    let f = fixture().await;
    let resp = f.send("GET", "/", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["view"], "index");
  }

  // ── Topic list ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn anonymous_topic_list_shows_only_public_topics() {
    let f = fixture().await;
    f.topic(&f.alice, "Alice public", true).await;
    f.topic(&f.alice, "Alice private", false).await;
    f.topic(&f.bob, "Bob public", true).await;

    let body = json_body(f.send("GET", "/topics", None, None).await).await;
    assert_eq!(body["view"], "topics");
    assert!(body["context"].get("topics").is_none());
    assert_eq!(
      titles(&body["context"]["public_topics"]),
      ["Alice public", "Bob public"]
    );
  }

  #[tokio::test]
  async fn owner_topic_list_adds_own_private_topics() {
    let f = fixture().await;
    f.topic(&f.alice, "Alice private", false).await;
    f.topic(&f.bob, "Bob private", false).await;
    f.topic(&f.bob, "Bob public", true).await;
    f.topic(&f.alice, "Alice private 2", false).await;

    let body = json_body(f.send("GET", "/topics", ALICE, None).await).await;
    assert_eq!(
      titles(&body["context"]["topics"]),
      ["Alice private", "Alice private 2"]
    );
    assert_eq!(titles(&body["context"]["public_topics"]), ["Bob public"]);
  }

  // ── Single topic ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn anonymous_reads_public_topic_with_entries_newest_first() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Chess", true).await;
    assert_eq!(topic.topic_id, TopicId(1));
    f.entry(&topic, "Opening").await;
    f.entry(&topic, "Middlegame").await;
    f.entry(&topic, "Endgame").await;

    let resp = f.send("GET", "/topics/1", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["view"], "topic");
    assert_eq!(body["context"]["topic"]["title"], "Chess");
    let texts: Vec<&str> = body["context"]["entries"]
      .as_array()
      .unwrap()
      .iter()
      .map(|e| e["text"].as_str().unwrap())
      .collect();
    assert_eq!(texts, ["Endgame", "Middlegame", "Opening"]);
  }

  #[tokio::test]
  async fn private_topic_is_visible_to_owner_only() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Diary", false).await;
    let uri = format!("/topics/{}", topic.topic_id);

    let resp = f.send("GET", &uri, ALICE, None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = f.send("GET", &uri, BOB, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = f.send("GET", &uri, None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn denied_topic_is_indistinguishable_from_missing_one() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Diary", false).await;

    let denied = f
      .send("GET", &format!("/topics/{}", topic.topic_id), BOB, None)
      .await;
    let missing = f.send("GET", "/topics/999", BOB, None).await;

    assert_eq!(denied.status(), missing.status());
    assert_eq!(text_body(denied).await, text_body(missing).await);
  }

  #[tokio::test]
  async fn unparseable_ids_are_not_found() {
    let f = fixture().await;
    let missing = text_body(f.send("GET", "/topics/999", None, None).await).await;

    for uri in ["/topics/abc", "/topics/99999999999999999999", "/topics/-"] {
      let resp = f.send("GET", uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
      assert_eq!(text_body(resp).await, missing, "{uri}");
    }

    for uri in ["/new_entry/abc", "/edit_entry/99999999999999999999"] {
      let resp = f.send("GET", uri, ALICE, None).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
    let resp = f.send("POST", "/edit_entry/x1", ALICE, Some("text=hi")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Authentication ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_required_pages_challenge_anonymous_requests() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Chess", true).await;

    for uri in [
      "/new_topic".to_string(),
      format!("/new_entry/{}", topic.topic_id),
      "/edit_entry/1".to_string(),
    ] {
      let resp = f.send("GET", &uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
      assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    }
  }

  #[tokio::test]
  async fn wrong_password_is_rejected_even_on_public_pages() {
    let f = fixture().await;
    let resp = f.send("GET", "/topics", Some(("alice", "nope")), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── New topic ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn new_topic_form_is_blank() {
    let f = fixture().await;
    let body = json_body(f.send("GET", "/new_topic", ALICE, None).await).await;
    assert_eq!(body["view"], "new_topic");
    assert_eq!(body["context"]["form"]["data"]["title"], "");
    assert_eq!(body["context"]["form"]["errors"], serde_json::json!({}));
  }

  #[tokio::test]
  async fn valid_new_topic_is_saved_and_redirects() {
    let f = fixture().await;
    let resp = f
      .send("POST", "/new_topic", ALICE, Some("title=Chess&public=on"))
      .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/topics");

    let saved = f.state.store.list_topics(TopicFilter::default()).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].title, "Chess");
    assert_eq!(saved[0].owner, f.alice.user_id);
    assert!(saved[0].public);
  }

  #[tokio::test]
  async fn unchecked_public_box_creates_private_topic() {
    let f = fixture().await;
    let resp = f.send("POST", "/new_topic", ALICE, Some("title=Diary")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let saved = f.state.store.list_topics(TopicFilter::default()).await.unwrap();
    assert!(!saved[0].public);
  }

  #[tokio::test]
  async fn invalid_new_topic_is_redisplayed_without_saving() {
    let f = fixture().await;
    let resp = f
      .send("POST", "/new_topic", ALICE, Some("title=&public=on"))
      .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(resp).await;
    assert_eq!(body["view"], "new_topic");
    assert_eq!(body["context"]["form"]["data"]["public"], "on");
    assert!(!body["context"]["form"]["errors"]["title"].as_array().unwrap().is_empty());

    let saved = f.state.store.list_topics(TopicFilter::default()).await.unwrap();
    assert!(saved.is_empty());
  }

  // ── New entry ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_adds_entry_and_is_redirected_to_topic() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Rust", false).await;
    let uri = format!("/new_entry/{}", topic.topic_id);

    let form = json_body(f.send("GET", &uri, ALICE, None).await).await;
    assert_eq!(form["view"], "new_entry");
    assert_eq!(form["context"]["topic"]["title"], "Rust");

    let resp = f
      .send("POST", &uri, ALICE, Some("text=Lifetimes+are+regions"))
      .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/topics/{}", topic.topic_id));

    let entries = f.state.store.list_entries(topic.topic_id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Lifetimes are regions");
  }

  #[tokio::test]
  async fn invalid_entry_is_redisplayed_without_saving() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Rust", false).await;
    let uri = format!("/new_entry/{}", topic.topic_id);

    let resp = f.send("POST", &uri, ALICE, Some("")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(resp).await;
    assert_eq!(body["view"], "new_entry");
    assert_eq!(body["context"]["topic"]["title"], "Rust");
    assert!(body["context"]["form"]["errors"]["text"].is_array());

    assert!(f.state.store.list_entries(topic.topic_id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn only_owner_may_add_entries() {
    let f = fixture().await;
    let private = f.topic(&f.alice, "Diary", false).await;
    let public = f.topic(&f.alice, "Chess", true).await;

    for topic in [&private, &public] {
      let uri = format!("/new_entry/{}", topic.topic_id);
      let resp = f.send("GET", &uri, BOB, None).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
      let resp = f.send("POST", &uri, BOB, Some("text=intrusion")).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
      assert!(f.state.store.list_entries(topic.topic_id).await.unwrap().is_empty());
    }

    let resp = f.send("GET", "/new_entry/999", ALICE, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Edit entry ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_edits_entry() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Rust", true).await;
    f.entry(&topic, "draft").await;
    let entry_id = f.state.store.list_entries(topic.topic_id).await.unwrap()[0].entry_id;
    let uri = format!("/edit_entry/{entry_id}");

    let form = json_body(f.send("GET", &uri, ALICE, None).await).await;
    assert_eq!(form["view"], "edit_entry");
    assert_eq!(form["context"]["form"]["data"]["text"], "draft");
    assert_eq!(form["context"]["entry"]["entry_id"], entry_id.0);

    let resp = f.send("POST", &uri, ALICE, Some("text=final")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/topics/{}", topic.topic_id));

    let entry = f.state.store.get_entry(entry_id).await.unwrap().unwrap();
    assert_eq!(entry.text, "final");
  }

  #[tokio::test]
  async fn invalid_edit_keeps_original_text() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Rust", false).await;
    f.entry(&topic, "draft").await;
    let entry_id = f.state.store.list_entries(topic.topic_id).await.unwrap()[0].entry_id;

    let resp = f
      .send("POST", &format!("/edit_entry/{entry_id}"), ALICE, Some("text=+++"))
      .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["view"], "edit_entry");

    let entry = f.state.store.get_entry(entry_id).await.unwrap().unwrap();
    assert_eq!(entry.text, "draft");
  }

  #[tokio::test]
  async fn non_owner_cannot_edit_entries() {
    let f = fixture().await;
    let topic = f.topic(&f.alice, "Chess", true).await;
    f.entry(&topic, "e4").await;
    let entry_id = f.state.store.list_entries(topic.topic_id).await.unwrap()[0].entry_id;
    let uri = format!("/edit_entry/{entry_id}");

    assert_eq!(f.send("GET", &uri, BOB, None).await.status(), StatusCode::NOT_FOUND);
    let resp = f.send("POST", &uri, BOB, Some("text=d4")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let entry = f.state.store.get_entry(entry_id).await.unwrap().unwrap();
    assert_eq!(entry.text, "e4");

    let resp = f.send("GET", "/edit_entry/999", ALICE, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}

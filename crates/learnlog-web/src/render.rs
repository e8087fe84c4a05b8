//! The rendering step: a named view plus a context mapping.
//!
//! Templating lives outside this crate. A page is serialised as
//! `{"view": ..., "context": {...}}` for whichever front end consumes it.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use learnlog_core::form::FormErrors;
use serde::Serialize;
use serde_json::{Value, json};

pub const INDEX: &str = "index";
pub const TOPICS: &str = "topics";
pub const TOPIC: &str = "topic";
pub const NEW_TOPIC: &str = "new_topic";
pub const NEW_ENTRY: &str = "new_entry";
pub const EDIT_ENTRY: &str = "edit_entry";

/// A rendered view.
#[derive(Debug)]
pub struct Page {
  status:  StatusCode,
  view:    &'static str,
  context: Value,
}

impl Page {
  pub fn new(view: &'static str, context: Value) -> Self {
    Self { status: StatusCode::OK, view, context }
  }

  /// A form re-displayed because the submission failed validation.
  pub fn invalid(view: &'static str, context: Value) -> Self {
    Self { status: StatusCode::UNPROCESSABLE_ENTITY, view, context }
  }
}

impl IntoResponse for Page {
  fn into_response(self) -> Response {
    let body = json!({ "view": self.view, "context": self.context });
    (self.status, Json(body)).into_response()
  }
}

/// The submitted (or initial) form values together with any errors.
#[derive(Debug, Serialize)]
pub struct FormView<'a, T: Serialize> {
  pub data:   &'a T,
  pub errors: &'a FormErrors,
}

impl<'a, T: Serialize> FormView<'a, T> {
  pub fn new(data: &'a T, errors: &'a FormErrors) -> Self { Self { data, errors } }
}

/// `303 See Other` to `path`, so the browser follows up with a GET.
pub fn redirect(path: &str) -> Response { Redirect::to(path).into_response() }

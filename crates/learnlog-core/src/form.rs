//! Submitted forms and their validation.
//!
//! Forms are deserialised straight from `application/x-www-form-urlencoded`
//! bodies. Missing fields deserialise to their empty value so that a missing
//! required field is reported as a validation error rather than a decoding
//! failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// Longest title accepted for a topic, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

const REQUIRED: &str = "This field is required.";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_owned()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Messages recorded against `field`, if any.
  pub fn field(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }

  fn into_result<T>(self, ok: T) -> Result<T, FormErrors> {
    if self.is_empty() { Ok(ok) } else { Err(self) }
  }
}

impl std::fmt::Display for FormErrors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for m in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {m}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for FormErrors {}

// ─── Checkbox ────────────────────────────────────────────────────────────────

/// Interpret an HTML checkbox field. Browsers omit unchecked boxes entirely
/// and send `on` for checked ones unless a `value` attribute says otherwise.
pub fn checkbox(value: Option<&str>) -> bool {
  value.is_some_and(|v| {
    let v = v.trim();
    ["on", "true", "1", "yes"]
      .iter()
      .any(|accepted| v.eq_ignore_ascii_case(accepted))
  })
}

// ─── Topic form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicForm {
  #[serde(default)]
  pub title:  String,
  #[serde(default)]
  pub public: Option<String>,
}

/// The cleaned values of a valid [`TopicForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTopic {
  pub title:  String,
  pub public: bool,
}

impl TopicForm {
  pub fn validate(&self) -> Result<ValidTopic, FormErrors> {
    let mut errors = FormErrors::default();
    let title = self.title.trim();

    if title.is_empty() {
      errors.add("title", REQUIRED);
    } else {
      let len = title.chars().count();
      if len > TITLE_MAX_CHARS {
        errors.add(
          "title",
          format!(
            "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {len})."
          ),
        );
      }
    }

    errors.into_result(ValidTopic {
      title:  title.to_owned(),
      public: checkbox(self.public.as_deref()),
    })
  }
}

// ─── Entry form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
  #[serde(default)]
  pub text: String,
}

impl EntryForm {
  /// A form pre-filled with existing entry text, for editing.
  pub fn with_text(text: impl Into<String>) -> Self { Self { text: text.into() } }

  /// Returns the entry text on success. Surrounding whitespace is kept; only
  /// a blank body is rejected.
  pub fn validate(&self) -> Result<String, FormErrors> {
    let mut errors = FormErrors::default();
    if self.text.trim().is_empty() {
      errors.add("text", REQUIRED);
    }
    errors.into_result(self.text.clone())
  }
}

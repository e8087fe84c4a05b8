//! Error types for `learnlog-core`.

use thiserror::Error;

use crate::form::FormErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// The record is absent, or the requester may not see it. The two cases
  /// are intentionally merged.
  #[error("not found")]
  NotFound,

  #[error("validation failed: {0}")]
  ValidationFailed(#[from] FormErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

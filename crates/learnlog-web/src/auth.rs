//! Requester identity: HTTP Basic credentials checked against argon2 hashes
//! stored with each user.
//!
//! A request without an `Authorization` header is anonymous. A request that
//! carries one must carry valid credentials; anything else is rejected rather
//! than silently downgraded to anonymous.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use learnlog_core::{access::Requester, store::LearningStore, user::User};
use rand_core::OsRng;

use crate::{AppState, error::Error};

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Stands in for the stored hash when the username is unknown, so that a
/// missing user costs the same argon2 work as a wrong password. Its password
/// is a random salt string nobody is told.
static ABSENT_USER_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
  let secret = SaltString::generate(&mut OsRng);
  hash_password(secret.as_str()).ok()
});

/// Check `password` against a PHC string. Unparseable hashes never match.
fn verify(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// Split a `Basic` authorization header into username and password.
/// Returns `Ok(None)` when no header is present.
fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, Error> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };

  let value = value.to_str().map_err(|_| Error::Unauthorized)?;
  let (scheme, encoded) = value.trim_start().split_once(' ').ok_or(Error::Unauthorized)?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return Err(Error::Unauthorized);
  }
  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds   = String::from_utf8(decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok(Some((username.to_owned(), password.to_owned())))
}

/// Resolve the user behind a request, if any.
pub async fn identify<S>(headers: &HeaderMap, store: &S) -> Result<Option<User>, Error>
where
  S: LearningStore,
{
  let Some((username, password)) = basic_credentials(headers)? else {
    return Ok(None);
  };

  let creds = store
    .get_credentials(&username)
    .await
    .map_err(Error::store)?;

  let Some(creds) = creds else {
    if let Some(hash) = ABSENT_USER_HASH.as_deref() {
      let _ = verify(&password, hash);
    }
    tracing::debug!(%username, "unknown user");
    return Err(Error::Unauthorized);
  };

  if !verify(&password, &creds.password_hash) {
    tracing::debug!(%username, "password rejected");
    return Err(Error::Unauthorized);
  }

  Ok(Some(creds.user))
}

/// The requester of any page; anonymous when no credentials were sent.
pub struct Identity(pub Requester);

/// A logged-in user. Handlers taking this reject anonymous requests with a
/// `401` challenge.
pub struct Authenticated(pub User);

impl Authenticated {
  pub fn requester(&self) -> Requester { Requester::User(self.0.user_id) }
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = identify(&parts.headers, state.store.as_ref()).await?;
    Ok(Identity(
      user.map_or(Requester::Anonymous, |u| Requester::User(u.user_id)),
    ))
  }
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: LearningStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identify(&parts.headers, state.store.as_ref())
      .await?
      .map(Authenticated)
      .ok_or(Error::Unauthorized)
  }
}

//! Bearer-token identity provider, the [`Authenticated`] extractor, and the
//! `/auth` handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"email":"...","password":"..."}`; returns a token |
//! | `GET`  | `/auth/me` | The account behind the presented token |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State, rejection::JsonRejection},
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskify_core::{
  Error as CoreError,
  access::{CallerId, IdentityVerifier},
  store::TaskStore,
};

use crate::{
  ApiState,
  error::ApiError,
  response::{Envelope, data},
};

// ─── Accounts ────────────────────────────────────────────────────────────────

/// A configured login. The `id` becomes the owner id of the account's tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub id:            String,
  pub name:          String,
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// The public view of an [`Account`].
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
  #[serde(rename = "_id")]
  pub id:    String,
  pub name:  String,
  pub email: String,
}

impl From<&Account> for AccountView {
  fn from(a: &Account) -> Self {
    Self {
      id:    a.id.clone(),
      name:  a.name.clone(),
      email: a.email.clone(),
    }
  }
}

const DECOY_SALT: &str = "dGFza2lmeS1kZWNveQ";

/// The set of accounts allowed to log in.
#[derive(Debug, Clone)]
pub struct Accounts {
  accounts: Vec<Account>,
  /// Verified against when no account has the email, so an unknown email
  /// costs as much as a wrong password.
  decoy:    Option<String>,
}

impl Accounts {
  pub fn new(accounts: Vec<Account>) -> Self {
    let decoy = SaltString::from_b64(DECOY_SALT)
      .and_then(|salt| {
        Argon2::default()
          .hash_password(b"taskify-decoy", &salt)
          .map(|h| h.to_string())
      })
      .inspect_err(|e| tracing::warn!(error = %e, "failed to prepare decoy password hash"))
      .ok();
    Self { accounts, decoy }
  }

  pub fn find(&self, id: &CallerId) -> Option<&Account> {
    self.accounts.iter().find(|a| a.id == id.as_str())
  }

  /// The account matching `email` whose password hash verifies `password`.
  ///
  /// A password is always checked, against the decoy hash if no account
  /// matches.
  pub fn authenticate(&self, email: &str, password: &str) -> Option<&Account> {
    let account = self.accounts.iter().find(|a| a.email == email);
    let hash = match account {
      Some(a) => &a.password_hash,
      None => self.decoy.as_ref()?,
    };
    let parsed = PasswordHash::new(hash)
      .inspect_err(|e| tracing::warn!(error = %e, "unparseable password hash"))
      .ok()?;
    let verified = Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok();
    account.filter(|_| verified)
  }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// The account id.
  pub sub:   String,
  pub email: String,
  pub iat:   i64,
  pub exp:   i64,
}

/// Issues and verifies HS256 session tokens.
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenService {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation: Validation::new(Algorithm::HS256),
      ttl,
    }
  }

  pub fn issue(&self, account: &Account) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
      sub:   account.id.clone(),
      email: account.email.clone(),
      iat:   now.timestamp(),
      exp:   (now + self.ttl).timestamp(),
    };
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
  }
}

impl IdentityVerifier for TokenService {
  type Error = jsonwebtoken::errors::Error;

  fn verify(&self, token: &str) -> Result<CallerId, Self::Error> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| CallerId::from(data.claims.sub))
      .inspect_err(|e| tracing::debug!(error = %e, "token rejected"))
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The verified caller. Present in a handler means the request carried a
/// valid bearer token; extraction fails with 401 otherwise, before the
/// handler body runs.
pub struct Authenticated(pub CallerId);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

impl<S> FromRequestParts<ApiState<S>> for Authenticated
where
  S: TaskStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let caller = state.gate.resolve(bearer_token(&parts.headers))?;
    Ok(Authenticated(caller))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Session {
  pub token: String,
  pub user:  AccountView,
}

#[derive(Debug, Serialize)]
pub struct Me {
  pub user: AccountView,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<Envelope<Session>>, ApiError>
where
  S: TaskStore + 'static,
{
  let Json(body) = body?;
  let account = state
    .accounts
    .authenticate(&body.email, &body.password)
    .ok_or(ApiError::InvalidCredentials)?;

  let token = state.gate.verifier().issue(account)?;
  tracing::info!(account = %account.id, "session issued");
  Ok(data(Session {
    token,
    user: account.into(),
  }))
}

/// `GET /auth/me`
pub async fn me<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Envelope<Me>>, ApiError>
where
  S: TaskStore + 'static,
{
  // A token can outlive the account it was issued for.
  let account = state
    .accounts
    .find(&caller)
    .ok_or(CoreError::Unauthenticated)?;
  Ok(data(Me { user: account.into() }))
}

#[cfg(test)]
mod tests {
  use rand_core::OsRng;

  use super::*;

  fn account(email: &str, password: &str) -> Account {
    let salt = SaltString::generate(&mut OsRng);
    Account {
      id:            "u1".to_string(),
      name:          "User".to_string(),
      email:         email.to_string(),
      password_hash: Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string(),
    }
  }

  #[test]
  fn authenticate_checks_email_and_password() {
    let accounts = Accounts::new(vec![account("u@example.com", "secret")]);
    assert!(accounts.authenticate("u@example.com", "secret").is_some());
    assert!(accounts.authenticate("u@example.com", "wrong").is_none());
  }

  #[test]
  fn unknown_email_is_checked_against_the_decoy() {
    let accounts = Accounts::new(Vec::new());
    assert!(accounts.decoy.is_some());
    // Even the decoy's own password never yields an account.
    assert!(accounts.authenticate("nobody@example.com", "taskify-decoy").is_none());
  }
}

//! The access gate: caller identity resolution and ownership checks.
//!
//! The gate never verifies credentials itself. It hands the presented
//! credential to an [`IdentityVerifier`] (the identity provider) and maps the
//! verified result into the owner-id space used for filtering.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  task::Task,
};

/// The stable identity of a caller; compared against `Task::owner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for CallerId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for CallerId {
  fn from(s: String) -> Self { Self(s) }
}

impl fmt::Display for CallerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// An identity provider that turns a presented credential into a verified
/// caller id.
pub trait IdentityVerifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn verify(&self, credential: &str) -> Result<CallerId, Self::Error>;
}

impl<V: IdentityVerifier + ?Sized> IdentityVerifier for Arc<V> {
  type Error = V::Error;

  fn verify(&self, credential: &str) -> Result<CallerId, Self::Error> {
    (**self).verify(credential)
  }
}

/// Resolves callers and enforces single-owner access.
#[derive(Debug, Clone)]
pub struct AccessGate<V> {
  verifier: V,
}

impl<V: IdentityVerifier> AccessGate<V> {
  pub fn new(verifier: V) -> Self { Self { verifier } }

  pub fn verifier(&self) -> &V { &self.verifier }

  /// Resolve the caller behind `credential`.
  ///
  /// A missing credential and a credential the verifier rejects are both
  /// [`Error::Unauthenticated`]; the verifier's reason is not exposed.
  pub fn resolve(&self, credential: Option<&str>) -> Result<CallerId> {
    let credential = credential
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .ok_or(Error::Unauthenticated)?;
    self
      .verifier
      .verify(credential)
      .map_err(|_| Error::Unauthenticated)
  }
}

/// Fail with [`Error::Unauthorized`] unless `caller` owns `task`.
pub fn authorize(caller: &CallerId, task: &Task) -> Result<()> {
  if task.is_owned_by(caller) {
    Ok(())
  } else {
    Err(Error::Unauthorized(task.id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Accepts `token-<id>` and yields `<id>`.
  struct PrefixVerifier;

  #[derive(Debug, thiserror::Error)]
  #[error("bad token")]
  struct BadToken;

  impl IdentityVerifier for PrefixVerifier {
    type Error = BadToken;

    fn verify(&self, credential: &str) -> Result<CallerId, BadToken> {
      credential
        .strip_prefix("token-")
        .map(CallerId::from)
        .ok_or(BadToken)
    }
  }

  #[test]
  fn resolves_verified_identity() {
    let gate = AccessGate::new(PrefixVerifier);
    assert_eq!(gate.resolve(Some("token-alice")).unwrap(), CallerId::from("alice"));
  }

  #[test]
  fn missing_credential_is_unauthenticated() {
    let gate = AccessGate::new(PrefixVerifier);
    assert!(matches!(gate.resolve(None), Err(Error::Unauthenticated)));
    assert!(matches!(gate.resolve(Some("  ")), Err(Error::Unauthenticated)));
  }

  #[test]
  fn rejected_credential_is_unauthenticated() {
    let gate = AccessGate::new(Arc::new(PrefixVerifier));
    assert!(matches!(gate.resolve(Some("forged")), Err(Error::Unauthenticated)));
  }
}

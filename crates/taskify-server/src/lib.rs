//! Server assembly for Taskify: configuration, state construction, and the
//! top-level router that mounts the API under `/api`.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use chrono::Duration;
use serde::Deserialize;
use taskify_api::{Account, Accounts, ApiState, TokenService};
use taskify_core::store::TaskStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which storage binding backs the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  /// JSON document with artificial latency; suited to demos.
  Local,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `TASKIFY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default)]
  pub backend:          Backend,
  /// SQLite database file, or the JSON document for the local backend.
  pub store_path:       PathBuf,
  pub jwt_secret:       String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours:  i64,
  /// Delay applied to every local-backend operation.
  #[serde(default)]
  pub local_latency_ms: u64,
  /// Account id that receives the sample tasks when the local store is empty.
  #[serde(default)]
  pub seed_owner:       Option<String>,
  #[serde(default)]
  pub accounts:         Vec<Account>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_token_ttl_hours() -> i64 { 24 * 30 }

impl ServerConfig {
  pub fn token_ttl(&self) -> Duration { Duration::hours(self.token_ttl_hours) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// Build the API state for `store` from `cfg`.
pub fn api_state<S: TaskStore>(store: Arc<S>, cfg: &ServerConfig) -> ApiState<S> {
  ApiState::new(
    store,
    TokenService::new(cfg.jwt_secret.as_bytes(), cfg.token_ttl()),
    Accounts::new(cfg.accounts.clone()),
  )
}

/// Build the top-level [`Router`]: the API nested under `/api`, with request
/// tracing.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: TaskStore + 'static,
{
  Router::new()
    .nest("/api", taskify_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use taskify_core::access::CallerId;
  use taskify_store_local::LocalStore;
  use tower::ServiceExt as _;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config(password_hash: String) -> ServerConfig {
    ServerConfig {
      host:             "127.0.0.1".to_string(),
      port:             0,
      backend:          Backend::Local,
      store_path:       PathBuf::from("unused.json"),
      jwt_secret:       "integration-secret".to_string(),
      token_ttl_hours:  1,
      local_latency_ms: 0,
      seed_owner:       Some("demo".to_string()),
      accounts:         vec![Account {
        id: "demo".to_string(),
        name: "Demo User".to_string(),
        email: "demo@example.com".to_string(),
        password_hash,
      }],
    }
  }

  async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
  }

  #[test]
  fn config_defaults_fill_optional_fields() {
    let cfg: ServerConfig = serde_json::from_value(json!({
      "store_path": "~/.local/share/taskify/tasks.db",
      "jwt_secret": "s",
    }))
    .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.backend, Backend::Sqlite);
    assert_eq!(cfg.token_ttl(), Duration::days(30));
    assert!(cfg.accounts.is_empty());
    assert!(cfg.seed_owner.is_none());
  }

  #[test]
  fn config_reads_local_backend_and_accounts() {
    let cfg: ServerConfig = serde_json::from_value(json!({
      "backend": "local",
      "store_path": "tasks.json",
      "jwt_secret": "s",
      "local_latency_ms": 500,
      "accounts": [{
        "id": "u1",
        "name": "User",
        "email": "u@example.com",
        "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
      }],
    }))
    .unwrap();
    assert_eq!(cfg.backend, Backend::Local);
    assert_eq!(cfg.local_latency_ms, 500);
    assert_eq!(cfg.accounts[0].id, "u1");
  }

  #[tokio::test]
  async fn seeded_local_store_end_to_end() {
    let cfg = config(hash("demo-pass"));
    let store = LocalStore::in_memory();
    store
      .seed_sample_tasks(&CallerId::from("demo"))
      .await
      .unwrap();
    let app = router(api_state(Arc::new(store), &cfg));

    let (status, body) = call(
      &app,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "demo@example.com", "password": "demo-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "GET", "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let (_, body) = call(&app, "GET", "/api/tasks/stats", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 6);

    let (status, _) = call(&app, "GET", "/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}

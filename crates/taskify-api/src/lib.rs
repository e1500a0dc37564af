//! JSON REST API for Taskify.
//!
//! Exposes an axum [`Router`] backed by any [`taskify_core::store::TaskStore`].
//! Every task route requires a bearer token issued by `/auth/login`; TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", taskify_api::api_router(state))
//! ```

pub mod analytics;
pub mod auth;
pub mod error;
pub mod response;
pub mod tasks;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use taskify_core::{access::AccessGate, repository::TaskRepository, store::TaskStore};

pub use auth::{Account, Accounts, TokenService};
pub use error::ApiError;

/// Shared state for every handler.
pub struct ApiState<S> {
  pub tasks:    TaskRepository<S>,
  pub gate:     Arc<AccessGate<TokenService>>,
  pub accounts: Arc<Accounts>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      tasks:    self.tasks.clone(),
      gate:     Arc::clone(&self.gate),
      accounts: Arc::clone(&self.accounts),
    }
  }
}

impl<S: TaskStore> ApiState<S> {
  pub fn new(store: Arc<S>, tokens: TokenService, accounts: Accounts) -> Self {
    Self {
      tasks:    TaskRepository::new(store),
      gate:     Arc::new(AccessGate::new(tokens)),
      accounts: Arc::new(accounts),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: TaskStore + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/me", get(auth::me::<S>))
    // Aggregates
    .route("/tasks/stats", get(analytics::stats::<S>))
    .route("/tasks/dashboard", get(analytics::dashboard::<S>))
    .route("/tasks/categories", get(analytics::categories::<S>))
    // Tasks
    .route("/tasks", get(tasks::list::<S>).post(tasks::create::<S>))
    .route(
      "/tasks/{id}",
      get(tasks::get_one::<S>)
        .put(tasks::update::<S>)
        .delete(tasks::delete_one::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

//! Read-only aggregate endpoints over the caller's tasks.

use axum::{Json, extract::State};
use taskify_core::{
  stats::{Dashboard, Summary},
  store::TaskStore,
};

use crate::{
  ApiState,
  auth::Authenticated,
  error::ApiError,
  response::{Envelope, data},
};

/// `GET /tasks/stats`
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Envelope<Summary>>, ApiError>
where
  S: TaskStore + 'static,
{
  Ok(data(state.tasks.stats(&caller).await?))
}

/// `GET /tasks/dashboard`
pub async fn dashboard<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Envelope<Dashboard>>, ApiError>
where
  S: TaskStore + 'static,
{
  Ok(data(state.tasks.dashboard(&caller).await?))
}

/// `GET /tasks/categories`
pub async fn categories<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Envelope<Vec<String>>>, ApiError>
where
  S: TaskStore + 'static,
{
  Ok(data(state.tasks.categories(&caller).await?))
}

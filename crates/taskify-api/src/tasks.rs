//! Handlers for `/tasks` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tasks` | Optional `?status=&priority=&category=&search=`; `all` disables a criterion |
//! | `POST`   | `/tasks` | Body: task fields; `title`, `description`, `priority`, `category` required |
//! | `GET`    | `/tasks/{id}` | 404 if missing, 403 if owned by someone else |
//! | `PUT`    | `/tasks/{id}` | Partial update; `"dueDate": null` clears the due date |
//! | `DELETE` | `/tasks/{id}` | Permanent |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use taskify_core::{
  filter::TaskFilter,
  store::TaskStore,
  task::{Task, TaskId, TaskInput},
};

use crate::{
  ApiState,
  auth::Authenticated,
  error::ApiError,
  response::{Envelope, data, message},
};

/// Parse a path segment into a [`TaskId`]. Anything that is not a UUID
/// cannot name a task, so it is reported as not found.
fn task_id(raw: &str) -> Result<TaskId, ApiError> {
  raw.parse().map_err(|_| ApiError::UnknownId)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status:   Option<String>,
  pub priority: Option<String>,
  pub category: Option<String>,
  pub search:   Option<String>,
}

/// `GET /tasks`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Envelope<Vec<Task>>>, ApiError>
where
  S: TaskStore + 'static,
{
  let filter = TaskFilter::parse(
    params.status.as_deref(),
    params.priority.as_deref(),
    params.category.as_deref(),
    params.search.as_deref(),
  )?;
  let tasks = state.tasks.list_filtered(&caller, &filter).await?;
  Ok(data(tasks))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /tasks`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
  body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TaskStore + 'static,
{
  let Json(input) = body?;
  let task = state.tasks.create(&caller, input).await?;
  tracing::info!(task = %task.id, owner = %caller, "task created");
  Ok((StatusCode::CREATED, data(task)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tasks/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Envelope<Task>>, ApiError>
where
  S: TaskStore + 'static,
{
  let task = state.tasks.get(&caller, task_id(&id)?).await?;
  Ok(data(task))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /tasks/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
  body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Envelope<Task>>, ApiError>
where
  S: TaskStore + 'static,
{
  let id = task_id(&id)?;
  let Json(input) = body?;
  let task = state.tasks.update(&caller, id, input).await?;
  tracing::info!(task = %task.id, owner = %caller, "task updated");
  Ok(data(task))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /tasks/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError>
where
  S: TaskStore + 'static,
{
  let id = task_id(&id)?;
  state.tasks.delete(&caller, id).await?;
  tracing::info!(task = %id, owner = %caller, "task deleted");
  Ok(message("Task deleted successfully"))
}

//! Task CRUD handlers.
//!
//! All routes sit behind the session middleware and read the caller from the
//! attached [`Principal`]. Only the author of a task may change or remove it.

pub mod types;

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    session::Principal,
    storage::{NewTask, Task, TaskStore},
};
use types::{CreateTaskRequest, ListTasksQuery, UpdateTaskRequest};

#[cfg(test)]
mod tests;

fn matches_search(task: &Task, needle: &str) -> bool {
    task.name.to_lowercase().contains(needle)
}

#[utoipa::path(
    get,
    path = "/tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Tasks, optionally filtered by name.", body = [Task]),
        (status = 401, description = "Missing or invalid session cookie."),
    ),
    tag = "tasks"
)]
/// List every task. With `search`, only tasks whose name contains it ignoring case.
pub async fn list_tasks(
    Extension(tasks): Extension<Arc<dyn TaskStore>>,
    Query(query): Query<ListTasksQuery>,
) -> impl IntoResponse {
    let all = match tasks.list().await {
        Ok(all) => all,
        Err(err) => {
            error!("Failed to list tasks: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let filtered: Vec<Task> = match query.search.as_deref().filter(|s| !s.is_empty()) {
        Some(search) => {
            let needle = search.to_lowercase();
            all.into_iter()
                .filter(|task| matches_search(task, &needle))
                .collect()
        }
        None => all,
    };

    (StatusCode::OK, Json(filtered)).into_response()
}

#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task detail.", body = Task),
        (status = 401, description = "Missing or invalid session cookie."),
        (status = 404, description = "Task not found.", body = String),
    ),
    tag = "tasks"
)]
pub async fn get_task(
    Path(task_id): Path<String>,
    Extension(tasks): Extension<Arc<dyn TaskStore>>,
) -> impl IntoResponse {
    match tasks.get_by_id(&task_id).await {
        Ok(Some(task)) => (StatusCode::OK, Json(task)).into_response(),
        Ok(None) => not_found(&task_id).into_response(),
        Err(err) => {
            error!("Failed to get task: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created, unfinished and authored by the caller.", body = Task),
        (status = 400, description = "Missing `name` or `duration`.", body = String),
        (status = 401, description = "Missing or invalid session cookie."),
    ),
    tag = "tasks"
)]
/// Create a task owned by the caller.
pub async fn create_task(
    Extension(principal): Extension<Principal>,
    Extension(tasks): Extension<Arc<dyn TaskStore>>,
    Json(payload): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    let (name, duration) = match payload.validate() {
        Ok(fields) => fields,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    let new_task = NewTask {
        name,
        duration,
        author: principal.username,
    };

    match tasks.insert(new_task).await {
        Ok(task) => {
            debug!(task_id = %task.task_id, "task created");
            (StatusCode::CREATED, Json(task)).into_response()
        }
        Err(err) => {
            error!("Failed to create task: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/tasks/{task_id}",
    request_body = UpdateTaskRequest,
    params(("task_id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task updated.", body = Task),
        (status = 400, description = "No updatable field or an invalid value.", body = String),
        (status = 401, description = "Missing or invalid session cookie."),
        (status = 403, description = "Caller is not the author.", body = String),
        (status = 404, description = "Task not found.", body = String),
    ),
    tag = "tasks"
)]
/// Update a task the caller authored. Absent fields keep their value.
pub async fn update_task(
    Path(task_id): Path<String>,
    Extension(principal): Extension<Principal>,
    Extension(tasks): Extension<Arc<dyn TaskStore>>,
    Json(payload): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    if let Err(response) = authorize(tasks.as_ref(), &task_id, &principal, "updated").await {
        return response;
    }

    let update = match payload.validate() {
        Ok(update) => update,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match tasks.update_by_id(&task_id, update).await {
        Ok(Some(task)) => (StatusCode::OK, Json(task)).into_response(),
        // Deleted between the ownership check and the update.
        Ok(None) => not_found(&task_id).into_response(),
        Err(err) => {
            error!("Failed to update task: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted.", body = Task),
        (status = 401, description = "Missing or invalid session cookie."),
        (status = 403, description = "Caller is not the author.", body = String),
        (status = 404, description = "Task not found.", body = String),
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    Path(task_id): Path<String>,
    Extension(principal): Extension<Principal>,
    Extension(tasks): Extension<Arc<dyn TaskStore>>,
) -> impl IntoResponse {
    if let Err(response) = authorize(tasks.as_ref(), &task_id, &principal, "deleted").await {
        return response;
    }

    match tasks.delete_by_id(&task_id).await {
        Ok(Some(task)) => {
            debug!(task_id = %task.task_id, "task deleted");
            (StatusCode::OK, Json(task)).into_response()
        }
        Ok(None) => not_found(&task_id).into_response(),
        Err(err) => {
            error!("Failed to delete task: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn not_found(task_id: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Task: {task_id} does not exist"),
    )
}

/// Load the task and make sure `principal` wrote it.
async fn authorize(
    tasks: &dyn TaskStore,
    task_id: &str,
    principal: &Principal,
    action: &str,
) -> Result<Task, axum::response::Response> {
    let task = match tasks.get_by_id(task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return Err(not_found(task_id).into_response()),
        Err(err) => {
            error!("Failed to get task: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    if task.author != principal.username {
        debug!(task_id, username = %principal.username, "caller is not the task author");
        return Err((
            StatusCode::FORBIDDEN,
            format!(
                "{} is not the author of this task, cannot be {action}",
                principal.username
            ),
        )
            .into_response());
    }

    Ok(task)
}

//! Task and user persistence.
//!
//! Handlers only see the [`TaskStore`] and [`UserStore`] traits. The service
//! runs on [`postgres::PgStore`]; [`memory::MemoryStore`] backs the tests.

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub(crate) mod unavailable;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A to-do item owned by the user who created it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub task_id: String,
    pub name: String,
    /// Planned duration in minutes.
    pub duration: i32,
    pub finished: bool,
    pub author: String,
}

/// Fields of a task before the store assigns its id.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub name: String,
    pub duration: i32,
    pub author: String,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub finished: Option<bool>,
}

impl TaskUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.duration.is_none() && self.finished.is_none()
    }

    fn apply(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(duration) = self.duration {
            task.duration = duration;
        }
        if let Some(finished) = self.finished {
            task.finished = finished;
        }
    }
}

/// Stored account: `password` is the salted hash checked at login.
#[derive(Clone)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>>;

    async fn get_by_id(&self, task_id: &str) -> Result<Option<Task>>;

    /// Insert `task` unfinished and return it with its generated `task_id`.
    async fn insert(&self, task: NewTask) -> Result<Task>;

    /// Remove a task, returning it if it existed.
    async fn delete_by_id(&self, task_id: &str) -> Result<Option<Task>>;

    /// Apply `update` and return the updated task if it existed.
    async fn update_by_id(&self, task_id: &str, update: TaskUpdate) -> Result<Option<Task>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<User>>;
}

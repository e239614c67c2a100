//! A store whose backend is always down.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{NewTask, Task, TaskStore, TaskUpdate, User, UserStore};

#[derive(Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl TaskStore for UnavailableStore {
    async fn list(&self) -> Result<Vec<Task>> {
        Err(anyhow!("connection refused"))
    }

    async fn get_by_id(&self, _task_id: &str) -> Result<Option<Task>> {
        Err(anyhow!("connection refused"))
    }

    async fn insert(&self, _task: NewTask) -> Result<Task> {
        Err(anyhow!("connection refused"))
    }

    async fn delete_by_id(&self, _task_id: &str) -> Result<Option<Task>> {
        Err(anyhow!("connection refused"))
    }

    async fn update_by_id(&self, _task_id: &str, _update: TaskUpdate) -> Result<Option<Task>> {
        Err(anyhow!("connection refused"))
    }
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn find(&self, _username: &str) -> Result<Option<User>> {
        Err(anyhow!("connection refused"))
    }
}

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewTask, Task, TaskStore, TaskUpdate, User, UserStore};

/// Process-local task and user collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an already salted password hash.
    pub async fn add_user(&self, username: &str, salted_hash: &str) {
        self.users.write().await.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password: salted_hash.to_string(),
            },
        );
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn get_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .find(|task| task.task_id == task_id)
            .cloned())
    }

    async fn insert(&self, task: NewTask) -> Result<Task> {
        let task = Task {
            task_id: Uuid::new_v4().to_string(),
            name: task.name,
            duration: task.duration,
            finished: false,
            author: task.author,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn delete_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter()
            .position(|task| task.task_id == task_id)
            .map(|index| tasks.remove(index)))
    }

    async fn update_by_id(&self, task_id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|task| task.task_id == task_id)
            .map(|task| {
                update.apply(task);
                task.clone()
            }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

//! Postgres-backed task and user storage.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::{NewTask, Task, TaskStore, TaskUpdate, User, UserStore};

const TASK_COLUMNS: &str = "task_id::text AS task_id, name, duration, finished, author";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a connection pool for `dsn`.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Task {
    Task {
        task_id: row.get("task_id"),
        name: row.get("name"),
        duration: row.get("duration"),
        finished: row.get("finished"),
        author: row.get("author"),
    }
}

// Ids that are not UUIDs cannot exist in the table.
fn parse_task_id(task_id: &str) -> Option<Uuid> {
    Uuid::parse_str(task_id).ok()
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list(&self) -> Result<Vec<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to list tasks")?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn get_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let Some(task_id) = parse_task_id(task_id) else {
            return Ok(None);
        };

        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = $1");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup task")?;

        Ok(row.as_ref().map(task_from_row))
    }

    async fn insert(&self, task: NewTask) -> Result<Task> {
        let query = format!(
            "INSERT INTO tasks (task_id, name, duration, author) VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&task.name)
            .bind(task.duration)
            .bind(&task.author)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert task")?;

        Ok(task_from_row(&row))
    }

    async fn delete_by_id(&self, task_id: &str) -> Result<Option<Task>> {
        let Some(task_id) = parse_task_id(task_id) else {
            return Ok(None);
        };

        let query = format!("DELETE FROM tasks WHERE task_id = $1 RETURNING {TASK_COLUMNS}");
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete task")?;

        Ok(row.as_ref().map(task_from_row))
    }

    async fn update_by_id(&self, task_id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        let Some(task_id) = parse_task_id(task_id) else {
            return Ok(None);
        };

        let query = format!(
            r"
            UPDATE tasks SET
                name = COALESCE($2, name),
                duration = COALESCE($3, duration),
                finished = COALESCE($4, finished)
            WHERE task_id = $1
            RETURNING {TASK_COLUMNS}
            "
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(task_id)
            .bind(update.name)
            .bind(update.duration)
            .bind(update.finished)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to update task")?;

        Ok(row.as_ref().map(task_from_row))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find(&self, username: &str) -> Result<Option<User>> {
        let query = "SELECT username, password FROM users WHERE username = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user")?;

        Ok(row.map(|row| User {
            username: row.get("username"),
            password: row.get("password"),
        }))
    }
}

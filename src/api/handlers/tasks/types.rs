//! Request payloads for the task API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::storage::TaskUpdate;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    pub name: Option<String>,
    /// Planned duration in minutes.
    pub duration: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub finished: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Case-insensitive substring of the task name.
    pub search: Option<String>,
}

impl CreateTaskRequest {
    /// Split into `(name, duration)`, or the message for the first missing field.
    pub(super) fn validate(self) -> Result<(String, i32), &'static str> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or("Error: no 'name' field")?;
        let duration = self
            .duration
            .filter(|duration| *duration != 0)
            .ok_or("Error: no 'duration' field")?;
        if duration < 0 {
            return Err("Error: invalid 'duration' field");
        }

        Ok((name, duration))
    }
}

impl UpdateTaskRequest {
    pub(super) fn validate(self) -> Result<TaskUpdate, &'static str> {
        let update = TaskUpdate {
            name: self.name,
            duration: self.duration,
            finished: self.finished,
        };

        if update.is_empty() {
            return Err("Could not find name or duration or finished key in object");
        }
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err("Error: invalid 'name' field");
        }
        if update.duration.is_some_and(|duration| duration <= 0) {
            return Err("Error: invalid 'duration' field");
        }

        Ok(update)
    }
}

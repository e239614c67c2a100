//! Route handlers: health, form login/logout, and the task API.

pub mod auth;
pub mod health;
pub mod tasks;

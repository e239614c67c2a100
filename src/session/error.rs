use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a request could not be resolved to a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionErrorKind {
    /// The request carried no `Cookie` header at all.
    CookieMissing,
    /// A `Cookie` header was sent but it holds no session cookie.
    TokenMissing,
    /// The session cookie names a token the store does not know (or that expired).
    SessionNotFound,
}

impl SessionErrorKind {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CookieMissing => "Cookie does not exist",
            Self::TokenMissing => "Cookie token could not be found",
            Self::SessionNotFound => "Cookie token could not be found in sessions",
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct SessionError {
    kind: SessionErrorKind,
    message: &'static str,
}

impl SessionError {
    #[must_use]
    pub const fn new(kind: SessionErrorKind) -> Self {
        Self {
            kind,
            message: kind.message(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SessionErrorKind {
        self.kind
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl From<SessionErrorKind> for SessionError {
    fn from(kind: SessionErrorKind) -> Self {
        Self::new(kind)
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}

//! Request gate for protected routes.

use axum::{
    extract::{Extension, Request},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    cookie, SessionConfig, SessionError, SessionErrorKind, SessionStore, SessionToken,
};

/// Authenticated identity attached to requests that passed [`require_session`].
#[derive(Clone, Debug)]
pub struct Principal {
    pub username: String,
    pub session_token: SessionToken,
}

/// Resolve the session cookie in `headers` to a principal.
///
/// # Errors
/// Returns a [`SessionError`] when the cookie header is missing, holds no
/// session cookie, or names a session the store does not know.
pub async fn authenticate(
    headers: &HeaderMap,
    store: &SessionStore,
    cookie_name: &str,
) -> Result<Principal, SessionError> {
    let mut values = headers.get_all(COOKIE).iter().peekable();
    if values.peek().is_none() {
        return Err(SessionErrorKind::CookieMissing.into());
    }

    // HTTP/2 clients may split cookies over several headers.
    let token = values
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| cookie::parse(value, cookie_name))
        .ok_or(SessionErrorKind::TokenMissing)?;

    let session = store
        .lookup(token)
        .await
        .ok_or(SessionErrorKind::SessionNotFound)?;

    Ok(Principal {
        username: session.username,
        session_token: session.token,
    })
}

/// `axum::middleware::from_fn` hook that rejects requests without a live session.
///
/// # Errors
/// Returns the [`SessionError`] from [`authenticate`]; it renders as `401`.
pub async fn require_session(
    Extension(store): Extension<SessionStore>,
    Extension(config): Extension<Arc<SessionConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, SessionError> {
    let resolved = authenticate(request.headers(), &store, config.cookie_name()).await;
    match resolved {
        Ok(principal) => {
            debug!(username = %principal.username, "session authenticated");
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(err) => {
            debug!(reason = %err, "session rejected");
            Err(err)
        }
    }
}

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderValue},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use tracing::info;

use crate::session::{cookie, Principal, SessionConfig, SessionStore};

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session closed, redirect to `/login`."),
        (status = 401, description = "Missing or invalid session cookie."),
    ),
    tag = "auth"
)]
/// Close the caller's session and drop the cookie.
pub async fn logout(
    Extension(principal): Extension<Principal>,
    Extension(sessions): Extension<SessionStore>,
    Extension(config): Extension<Arc<SessionConfig>>,
) -> impl IntoResponse {
    sessions.delete(principal.session_token.as_str()).await;

    info!(username = %principal.username, "user logged out");

    let cleared = HeaderValue::from_str(&cookie::clear(
        config.cookie_name(),
        config.cookie_secure(),
    ));

    match cleared {
        Ok(cleared) => ([(SET_COOKIE, cleared)], Redirect::to("/login")).into_response(),
        Err(_) => Redirect::to("/login").into_response(),
    }
}

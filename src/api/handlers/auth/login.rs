use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use super::password;
use crate::{
    session::{cookie, SessionConfig, SessionStore},
    storage::UserStore,
};

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to `/` with a session cookie, or back to `/login` when the credentials are rejected."),
        (status = 500, description = "User lookup or session creation failed."),
    ),
    tag = "auth"
)]
/// Check the submitted credentials and open a session on success.
pub async fn login(
    Extension(users): Extension<Arc<dyn UserStore>>,
    Extension(sessions): Extension<SessionStore>,
    Extension(config): Extension<Arc<SessionConfig>>,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let user = match users.find(&form.username).await {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to lookup user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(user) =
        user.filter(|user| password::verify(form.password.expose_secret(), &user.password))
    else {
        debug!(username = %form.username, "login rejected");
        return Redirect::to("/login").into_response();
    };

    let token = match sessions.create(&user.username, config.max_age()).await {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to create session: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let set_cookie = cookie::serialize(
        config.cookie_name(),
        token.as_str(),
        config.max_age(),
        config.cookie_secure(),
    );
    let Ok(set_cookie) = HeaderValue::from_str(&set_cookie) else {
        error!("Failed to build session cookie header");
        sessions.delete(token.as_str()).await;
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    info!(username = %user.username, "user logged in");

    ([(SET_COOKIE, set_cookie)], Redirect::to("/")).into_response()
}

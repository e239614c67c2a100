//! HTTP surface of the service.
//!
//! Public routes (`/health`, `/openapi.json`, `/login`) are merged with the
//! protected ones. The session middleware guards the task API, `/logout`, and
//! the static client served as fallback.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    response::Json,
    routing::{get, get_service, post},
    Router,
};
use std::{path::Path, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer,
    services::{ServeDir, ServeFile},
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

use crate::{
    session::{require_session, SessionConfig, SessionStore},
    storage::{TaskStore, UserStore},
};

pub mod handlers;
mod openapi;

pub use openapi::openapi;

/// Shared collaborators handed to every request through `Extension` layers.
#[derive(Clone)]
pub struct ServerState {
    pub sessions: SessionStore,
    pub session_config: Arc<SessionConfig>,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl ServerState {
    #[must_use]
    pub fn new(
        session_config: SessionConfig,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            session_config: Arc::new(session_config),
            users,
            tasks,
        }
    }
}

/// Build the application router serving the client from `client_dir`.
pub fn router(state: &ServerState, client_dir: &Path) -> Router {
    use handlers::{auth, health, tasks};

    let public = Router::new()
        .route("/health", get(health::health).options(health::health))
        .route("/openapi.json", get(|| async { Json(openapi()) }))
        .route(
            "/login",
            get_service(ServeFile::new(client_dir.join("login.html"))).post(auth::login),
        );

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/:task_id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .fallback_service(ServeDir::new(client_dir).append_index_html_on_directories(true))
        .layer(middleware::from_fn(require_session));

    public.merge(protected).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(state.sessions.clone()))
            .layer(Extension(state.session_config.clone()))
            .layer(Extension(state.users.clone()))
            .layer(Extension(state.tasks.clone())),
    )
}

/// Start the server
/// # Errors
/// Return error if failed to bind the port or serve requests
pub async fn new(port: u16, client_dir: &Path, state: ServerState) -> Result<()> {
    let app = router(&state, client_dir);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}, serving {}", port, client_dir.display());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

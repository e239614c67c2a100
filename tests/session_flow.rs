#![allow(clippy::unwrap_used)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use cctech::{
    api::{handlers::auth::password::salted_hash, router, ServerState},
    session::{cookie, SessionConfig},
    storage::memory::MemoryStore,
};
use serde_json::{json, Value};
use std::{path::Path, sync::Arc, time::Duration};
use tower::ServiceExt;

const SALT: &str = "saltsaltsaltsaltsalt";

async fn app(config: SessionConfig) -> Router {
    let store = Arc::new(MemoryStore::new());
    store.add_user("alice", &salted_hash("wonderland", SALT)).await;
    store.add_user("bob", &salted_hash("builder", SALT)).await;

    let state = ServerState::new(config, store.clone(), store);
    router(&state, &Path::new(env!("CARGO_MANIFEST_DIR")).join("client"))
}

async fn call(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = call(
        app,
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    let token = cookie::parse(set_cookie, cookie::SESSION_COOKIE_NAME).unwrap();
    format!("{}={token}", cookie::SESSION_COOKIE_NAME)
}

fn request(method: &str, uri: &str, session: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, format!("theme=dark; {session}"));
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn login_crud_logout() {
    let app = app(SessionConfig::new()).await;
    let alice = login(&app, "alice", "wonderland").await;
    let bob = login(&app, "bob", "builder").await;

    let response = call(
        &app,
        request(
            "POST",
            "/tasks",
            &alice,
            Some(json!({"name": "Plant roses", "duration": 90})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = json_body(response).await;
    let uri = format!("/tasks/{}", task["task_id"].as_str().unwrap());
    assert_eq!(task["author"], "alice");

    // Everyone logged in can read, only the author can write.
    let response = call(&app, request("GET", &uri, &bob, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = call(
        &app,
        request("PUT", &uri, &bob, Some(json!({"finished": true}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = call(
        &app,
        request("PUT", &uri, &alice, Some(json!({"finished": true}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["finished"], true);

    let response = call(&app, request("GET", "/tasks?search=ROSE", &bob, None)).await;
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(1));

    let response = call(&app, request("DELETE", &uri, &alice, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = call(&app, request("POST", "/logout", &alice, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = call(&app, request("GET", "/tasks", &alice, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["error"],
        "Cookie token could not be found in sessions"
    );

    // Logging alice out leaves bob's session alone.
    let response = call(&app, request("GET", "/tasks", &bob, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_client_requires_a_session() {
    let app = app(SessionConfig::new()).await;

    let response = call(
        &app,
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let alice = login(&app, "alice", "wonderland").await;
    let response = call(&app, request("GET", "/", &alice, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("/logout"));
}

#[tokio::test]
async fn cookie_without_session_token_is_rejected() {
    let app = app(SessionConfig::new()).await;

    let response = call(
        &app,
        Request::builder()
            .uri("/tasks")
            .header(COOKIE, "theme=dark")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await["error"],
        "Cookie token could not be found"
    );
}

#[tokio::test]
async fn health_is_public_and_counts_sessions() {
    let app = app(SessionConfig::new()).await;
    login(&app, "alice", "wonderland").await;

    let response = call(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-app").is_some());
    assert!(response.headers().get("x-request-id").is_some());
    let health = json_body(response).await;
    assert_eq!(health["name"], "cctech");
    assert_eq!(health["sessions"], 1);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(SessionConfig::new()).await;

    let response = call(
        &app,
        Request::builder()
            .uri("/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/tasks/{task_id}"].is_object());
}

#[tokio::test(start_paused = true)]
async fn session_expires_after_max_age() {
    let app = app(SessionConfig::new().with_max_age_ms(2_000)).await;
    let alice = login(&app, "alice", "wonderland").await;

    let response = call(&app, request("GET", "/tasks", &alice, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::advance(Duration::from_millis(2_001)).await;

    let response = call(&app, request("GET", "/tasks", &alice, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#![allow(clippy::unwrap_used)]

use crate::{
    api::{router, ServerState},
    session::{SessionConfig, SessionToken},
    storage::{memory::MemoryStore, unavailable::UnavailableStore, NewTask, Task, TaskStore},
};
use axum::{
    body::{to_bytes, Body},
    http::{
        self,
        header::{CONTENT_TYPE, COOKIE},
        StatusCode,
    },
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::{path::Path, sync::Arc};
use tower::ServiceExt;

struct Harness {
    app: Router,
    state: ServerState,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = ServerState::new(SessionConfig::new(), store.clone(), store.clone());
        let client_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("client");
        Self {
            app: router(&state, &client_dir),
            state,
            store,
        }
    }

    async fn login(&self, username: &str) -> SessionToken {
        self.state.sessions.create(username, None).await.unwrap()
    }

    async fn seed(&self, name: &str, author: &str) -> Task {
        self.store
            .insert(NewTask {
                name: name.to_string(),
                duration: 20,
                author: author.to_string(),
            })
            .await
            .unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: &SessionToken,
        body: Option<Value>,
    ) -> Response {
        let builder = http::Request::builder()
            .method(method)
            .uri(uri)
            .header(COOKIE, format!("cctech_be={token}"));
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.app.clone().oneshot(request.unwrap()).await.unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn text_body(response: Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn create_sets_author_and_unfinished() {
    let harness = Harness::new();
    let token = harness.login("alice").await;

    let response = harness
        .send(
            "POST",
            "/tasks",
            &token,
            Some(json!({"name": "laundry", "duration": 45})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let task = json_body(response).await;
    assert_eq!(task["name"], "laundry");
    assert_eq!(task["duration"], 45);
    assert_eq!(task["finished"], false);
    assert_eq!(task["author"], "alice");
    assert!(task["task_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let harness = Harness::new();
    let token = harness.login("alice").await;

    let response = harness
        .send("POST", "/tasks", &token, Some(json!({"duration": 10})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text_body(response).await, "Error: no 'name' field");

    let response = harness
        .send("POST", "/tasks", &token, Some(json!({"name": "laundry"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text_body(response).await, "Error: no 'duration' field");
}

#[tokio::test]
async fn list_filters_by_name_ignoring_case() {
    let harness = Harness::new();
    let token = harness.login("alice").await;
    harness.seed("Buy Milk", "alice").await;
    harness.seed("walk the dog", "bob").await;
    harness.seed("milkshake", "bob").await;

    let all = json_body(harness.send("GET", "/tasks", &token, None).await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(3));

    let response = harness
        .send("GET", "/tasks?search=MILK", &token, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let filtered = json_body(response).await;
    let names: Vec<&str> = filtered
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|task| task["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Buy Milk", "milkshake"]);
}

#[tokio::test]
async fn get_returns_task_or_not_found() {
    let harness = Harness::new();
    let token = harness.login("alice").await;
    let task = harness.seed("laundry", "bob").await;

    let response = harness
        .send("GET", &format!("/tasks/{}", task.task_id), &token, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["author"], "bob");

    let response = harness.send("GET", "/tasks/missing", &token, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_by_author() {
    let harness = Harness::new();
    let token = harness.login("alice").await;
    let task = harness.seed("laundry", "alice").await;

    let response = harness
        .send(
            "PUT",
            &format!("/tasks/{}", task.task_id),
            &token,
            Some(json!({"finished": true})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["finished"], true);
    assert_eq!(updated["name"], "laundry");
    assert_eq!(updated["duration"], 20);
}

#[tokio::test]
async fn update_rejections() {
    let harness = Harness::new();
    let alice = harness.login("alice").await;
    let bob = harness.login("bob").await;
    let task = harness.seed("laundry", "alice").await;
    let uri = format!("/tasks/{}", task.task_id);

    let response = harness
        .send("PUT", "/tasks/missing", &alice, Some(json!({"finished": true})))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness
        .send("PUT", &uri, &bob, Some(json!({"finished": true})))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        text_body(response).await,
        "bob is not the author of this task, cannot be updated"
    );

    let response = harness.send("PUT", &uri, &alice, Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unchanged = harness.store.get_by_id(&task.task_id).await.unwrap();
    assert_eq!(unchanged, Some(task));
}

#[tokio::test]
async fn delete_by_author_only() {
    let harness = Harness::new();
    let alice = harness.login("alice").await;
    let bob = harness.login("bob").await;
    let task = harness.seed("laundry", "alice").await;
    let uri = format!("/tasks/{}", task.task_id);

    let response = harness.send("DELETE", &uri, &bob, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = harness.send("DELETE", &uri, &alice, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["task_id"], task.task_id.as_str());

    let response = harness.send("DELETE", &uri, &alice, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_routes_require_a_session() {
    let harness = Harness::new();

    let response = harness
        .app
        .clone()
        .oneshot(
            http::Request::builder()
                .uri("/tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Cookie does not exist");
}

#[tokio::test]
async fn store_failure_is_internal_error_not_unauthorized() {
    let store = Arc::new(UnavailableStore);
    let state = ServerState::new(SessionConfig::new(), store.clone(), store);
    let app = router(&state, &Path::new(env!("CARGO_MANIFEST_DIR")).join("client"));
    let token = state.sessions.create("alice", None).await.unwrap();

    for (method, uri, body) in [
        ("GET", "/tasks".to_string(), Body::empty()),
        (
            "PUT",
            format!("/tasks/{}", uuid::Uuid::new_v4()),
            Body::from(json!({"finished": true}).to_string()),
        ),
    ] {
        let response = app
            .clone()
            .oneshot(
                http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(COOKIE, format!("cctech_be={token}"))
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method}");
    }

    // The session itself is untouched by the store outage.
    assert!(state.sessions.lookup(token.as_str()).await.is_some());
}

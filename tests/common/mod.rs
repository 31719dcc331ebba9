//! Mock collection server for sync tests.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// What `GET /posts` answers with.
#[derive(Debug, Clone)]
pub enum FetchMode {
    /// JSON array of posts with the given titles
    Posts(Vec<String>),
    /// Arbitrary body with status 200
    Raw(String),
    /// Error status
    Status(u16),
}

#[derive(Clone)]
struct MockState {
    fetch: Arc<Mutex<FetchMode>>,
    pushed: Arc<Mutex<Vec<serde_json::Value>>>,
    fetch_count: Arc<Mutex<usize>>,
}

/// Local stand-in for the remote post collection.
pub struct MockServer {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockServer {
    pub async fn start(mode: FetchMode) -> Self {
        let state = MockState {
            fetch: Arc::new(Mutex::new(mode)),
            pushed: Arc::new(Mutex::new(Vec::new())),
            fetch_count: Arc::new(Mutex::new(0)),
        };
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/posts", get(list_posts).post(create_post))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/posts", self.addr)
    }

    pub async fn set_mode(&self, mode: FetchMode) {
        *self.state.fetch.lock().await = mode;
    }

    pub async fn pushed(&self) -> Vec<serde_json::Value> {
        self.state.pushed.lock().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        *self.state.fetch_count.lock().await
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Titles `"post 1"` .. `"post n"`
pub fn titles(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("post {}", i)).collect()
}

async fn list_posts(State(state): State<MockState>) -> Response {
    *state.fetch_count.lock().await += 1;
    let mode = state.fetch.lock().await.clone();
    match mode {
        FetchMode::Posts(titles) => {
            let posts: Vec<serde_json::Value> = titles
                .iter()
                .enumerate()
                .map(|(i, title)| {
                    serde_json::json!({
                        "userId": 1,
                        "id": i + 1,
                        "title": title,
                        "body": "lorem ipsum"
                    })
                })
                .collect();
            Json(posts).into_response()
        }
        FetchMode::Raw(body) => (StatusCode::OK, body).into_response(),
        FetchMode::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}

async fn create_post(
    State(state): State<MockState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.pushed.lock().await.push(body.clone());
    let mut created = body;
    created["id"] = serde_json::json!(101);
    (StatusCode::CREATED, Json(created))
}

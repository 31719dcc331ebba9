//! HTTP handlers for manual sync and the status line
//!
//! - POST /api/v1/sync          — run a sync now, returns the outcome
//! - GET  /api/v1/sync/status   — transient status message

use super::{SyncEngine, SyncOutcome};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for sync handlers
#[derive(Clone)]
pub struct SyncState {
    pub engine: Arc<SyncEngine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncStatusResponse {
    syncing: bool,
    message: Option<String>,
}

/// Create the sync router
pub fn sync_router(state: SyncState) -> Router {
    Router::new()
        .route("/api/v1/sync", post(trigger_sync))
        .route("/api/v1/sync/status", get(sync_status))
        .with_state(state)
}

/// POST /api/v1/sync
async fn trigger_sync(State(state): State<SyncState>) -> impl IntoResponse {
    let outcome = state.engine.sync_now().await;
    let status = match outcome {
        SyncOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
        SyncOutcome::Skipped => StatusCode::CONFLICT,
        SyncOutcome::Merged { .. } | SyncOutcome::NothingToMerge => StatusCode::OK,
    };
    (status, Json(outcome))
}

/// GET /api/v1/sync/status
async fn sync_status(State(state): State<SyncState>) -> impl IntoResponse {
    Json(SyncStatusResponse {
        syncing: state.engine.is_syncing(),
        message: state.engine.status().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::error::{Error, Result};
    use crate::quotes::{Quote, QuoteStore};
    use crate::storage::MemorySlots;
    use crate::sync::RemoteSource;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedRemote(Option<Vec<Quote>>);

    #[async_trait::async_trait]
    impl RemoteSource for FixedRemote {
        async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
            self.0
                .clone()
                .ok_or_else(|| Error::Remote("unreachable".to_string()))
        }

        async fn push_quote(&self, _quote: &Quote) -> Result<()> {
            Ok(())
        }
    }

    async fn make_app(remote: FixedRemote) -> Router {
        let store = QuoteStore::load(Arc::new(MemorySlots::new()), Arc::new(MemorySlots::new()))
            .await
            .unwrap();
        let engine = Arc::new(SyncEngine::new(
            Arc::new(store),
            Arc::new(remote),
            &SyncConfig::default(),
        ));
        sync_router(SyncState { engine })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_sync() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/sync")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_manual_sync_then_status() {
        let app = make_app(FixedRemote(Some(vec![Quote::new("Life is a circle", "Server")]))).await;

        let resp = app.clone().oneshot(post_sync()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "merged");
        assert_eq!(json["conflicts"], 1);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sync/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["syncing"], false);
        assert_eq!(json["message"], "1 conflicts resolved (server version applied)");
    }

    #[tokio::test]
    async fn test_manual_sync_failure() {
        let app = make_app(FixedRemote(None)).await;

        let resp = app.oneshot(post_sync()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "failed");
        assert!(json["reason"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_status_empty_before_sync() {
        let app = make_app(FixedRemote(Some(Vec::new()))).await;
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sync/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert!(json["message"].is_null());
    }
}

//! HTTP handlers for the Quotes API
//!
//! Provides 8 REST endpoints:
//! - GET  /api/v1/quotes                — full collection
//! - POST /api/v1/quotes                — add a quote
//! - GET  /api/v1/quotes/random         — random quote (optional `?category=`)
//! - GET  /api/v1/quotes/last           — last viewed quote of this session
//! - POST /api/v1/quotes/import         — append a JSON array document
//! - GET  /api/v1/quotes/export         — download the collection as JSON
//! - GET  /api/v1/categories            — category options + selection
//! - PUT  /api/v1/categories/selected   — persist selection, return a quote

use crate::api::ApiError;
use crate::quotes::{IndexedQuote, QuoteStore, NO_QUOTES_MESSAGE};
use crate::sync::SyncEngine;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for quote handlers
#[derive(Clone)]
pub struct QuotesState {
    pub store: Arc<QuoteStore>,
    pub sync: Arc<SyncEngine>,
}

/// Body of `POST /api/v1/quotes`
#[derive(Debug, Deserialize)]
pub struct AddQuoteRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// Query of `GET /api/v1/quotes/random`
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub category: Option<String>,
}

/// Body of `PUT /api/v1/categories/selected`
#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    imported: usize,
    total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectCategoryResponse {
    selected: String,
    quote: Option<IndexedQuote>,
    message: Option<String>,
}

/// Create the quotes router
pub fn quotes_router(state: QuotesState) -> Router {
    Router::new()
        .route("/api/v1/quotes", get(list_quotes).post(add_quote))
        .route("/api/v1/quotes/random", get(random_quote))
        .route("/api/v1/quotes/last", get(last_viewed))
        .route("/api/v1/quotes/import", post(import_quotes))
        .route("/api/v1/quotes/export", get(export_quotes))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/categories/selected", put(select_category))
        .with_state(state)
}

/// GET /api/v1/quotes
async fn list_quotes(State(state): State<QuotesState>) -> impl IntoResponse {
    Json(state.store.quotes().await)
}

/// POST /api/v1/quotes
///
/// The new quote is also pushed to the server in the background.
async fn add_quote(
    State(state): State<QuotesState>,
    Json(request): Json<AddQuoteRequest>,
) -> Response {
    match state.store.add_quote(&request.text, &request.category).await {
        Ok(quote) => {
            state.sync.push_in_background(quote.clone());
            (StatusCode::CREATED, Json(quote)).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/v1/quotes/random
async fn random_quote(
    State(state): State<QuotesState>,
    Query(query): Query<RandomQuery>,
) -> Response {
    let category = match query.category {
        Some(category) => category,
        None => state.store.selected_category().await,
    };

    match state.store.pick_random(&category).await {
        Ok(Some(picked)) => Json(picked).into_response(),
        Ok(None) => ApiError::not_found(NO_QUOTES_MESSAGE).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/v1/quotes/last
async fn last_viewed(State(state): State<QuotesState>) -> Response {
    match state.store.restore_last_viewed().await {
        Ok(Some(quote)) => Json(quote).into_response(),
        Ok(None) => ApiError::not_found("No quote viewed in this session").into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// POST /api/v1/quotes/import
///
/// Takes the raw body so that malformed JSON is reported as an import error.
async fn import_quotes(State(state): State<QuotesState>, body: String) -> Response {
    match state.store.import_quotes(&body).await {
        Ok(imported) => Json(ImportResponse {
            imported,
            total: state.store.len().await,
        })
        .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/v1/quotes/export
async fn export_quotes(State(state): State<QuotesState>) -> Response {
    match state.store.export_quotes().await {
        Ok(json) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"quotes.json\"",
                ),
            ],
            json,
        )
            .into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/v1/categories
async fn list_categories(State(state): State<QuotesState>) -> impl IntoResponse {
    Json(state.store.category_options().await)
}

/// PUT /api/v1/categories/selected
async fn select_category(
    State(state): State<QuotesState>,
    Json(request): Json<SelectCategoryRequest>,
) -> Response {
    if let Err(err) = state.store.set_selected_category(&request.category).await {
        return ApiError::from(err).into_response();
    }

    match state.store.pick_random(&request.category).await {
        Ok(quote) => {
            let message = quote.is_none().then(|| NO_QUOTES_MESSAGE.to_string());
            Json(SelectCategoryResponse {
                selected: request.category,
                quote,
                message,
            })
            .into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

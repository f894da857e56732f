//! HTTP request surface for the search service.
//!
//! A thin axum layer over the immutable [`SearchService`]: the index and
//! catalog are built before serving begins, so concurrent requests share
//! the service by `Arc` with no locking. Model inference is the only slow
//! step and runs on the blocking thread pool so it never stalls the
//! accept loop.

use crate::io::{ErrorDetails, JsonResponse};
use crate::search::{ResultItem, SearchService};
use crate::{SearchError, io::ExitCode};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
struct AppState {
    service: Arc<SearchService>,
    default_limit: usize,
}

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
struct SearchRequest {
    prompt: String,
    /// Number of results; falls back to the configured default.
    #[serde(default)]
    k: Option<usize>,
}

/// Run the HTTP server until the process is stopped.
pub async fn serve_http(
    service: Arc<SearchService>,
    default_limit: usize,
    bind: String,
) -> anyhow::Result<()> {
    eprintln!(
        "Starting HTTP search server on {bind} ({} catalog entries, dimension {})",
        service.corpus_size(),
        service.dimension()
    );

    let state = AppState {
        service,
        default_limit,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "corpus_size": state.service.corpus_size(),
        "dimension": state.service.dimension().get(),
    }))
}

/// An empty result list is a successful response; only embedder and index
/// failures become error statuses.
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<ResultItem>>, (StatusCode, Json<JsonResponse>)> {
    let k = request.k.unwrap_or(state.default_limit);
    let service = state.service.clone();
    let prompt = request.prompt;

    let results = tokio::task::spawn_blocking(move || service.search(&prompt, k))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(JsonResponse {
                    status: "error".to_string(),
                    code: "TASK_FAILED".to_string(),
                    message: format!("Search task failed: {e}"),
                    data: None,
                    error: Some(ErrorDetails {
                        suggestions: vec![],
                    }),
                    exit_code: ExitCode::GeneralError as u8,
                }),
            )
        })?
        .map_err(|e| {
            let status = match &e {
                // The collaborator failed, not this service
                SearchError::Embedding(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(JsonResponse::from_error(&e)))
        })?;

    Ok(Json(results))
}

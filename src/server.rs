//! HTTP routes over a [`LeaderboardStore`].
//!
//! - `POST /api/highscores` with `{playerName, score, time, level}` returns `{"qualified": bool}`.
//! - `GET /api/highscores?limit=&level=` returns the ranked entries.
//! - `GET /api/highscores/stats` returns `{"totalEntries", "uniquePlayers"}`.
//! - `DELETE /api/highscores` empties the leaderboard, when reset is allowed.
//! - `GET /health` returns `{"ok": true}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::error::{StorageError, StoreResult};
use crate::leaderboard::{Entry, Stats};
use crate::store::LeaderboardStore;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "playerName", default)]
    pub player: String,
    #[serde(rename = "score", default)]
    pub points: i64,
    #[serde(rename = "time")]
    pub duration: f64,
    #[serde(rename = "level", default)]
    pub category: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub qualified: bool,
}

/// Raw query parameters, parsed by hand so malformed numbers get our own
/// error message.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub level: Option<String>,
}

impl ListQuery {
    /// A missing, empty or non-positive `limit` falls back to `default_limit`.
    /// A `limit` or `level` that is not an integer is a client error.
    pub fn resolve(&self, default_limit: usize) -> StoreResult<(usize, Option<i64>)> {
        let limit = match parse_param("limit", self.limit.as_deref())? {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(usize::MAX),
            _ => default_limit,
        };
        let level = parse_param("level", self.level.as_deref())?;

        Ok((limit, level))
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> StoreResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            StorageError::InvalidInput(format!("invalid {name} parameter '{raw}'"))
        }),
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StorageError),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the router. The store handle is cloned into every request.
///
/// `allow_reset` mounts `DELETE /api/highscores`. Without it the route answers
/// 405 and clearing stays a library call.
pub fn router(store: LeaderboardStore, allow_reset: bool) -> Router {
    let mut highscores = get(list_handler).post(submit_handler);
    if allow_reset {
        highscores = highscores.delete(clear_handler);
    }
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/highscores", highscores)
        .route("/api/highscores/stats", get(stats_handler))
        .with_state(store)
}

pub async fn serve(
    store: LeaderboardStore,
    addr: &str,
    allow_reset: bool,
) -> Result<(), std::io::Error> {
    let app = router(store, allow_reset);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

// Store calls may block on the file system, keep them off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn submit_handler(
    State(store): State<LeaderboardStore>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = payload?;
    let admission = run_blocking(move || {
        store.submit(
            &request.player,
            request.category,
            request.points,
            request.duration,
        )
    })
    .await?;
    Ok(Json(SubmitResponse {
        qualified: admission.is_admitted(),
    }))
}

async fn list_handler(
    State(store): State<LeaderboardStore>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let (limit, level) = query.resolve(store.capacity())?;
    let entries = run_blocking(move || match level {
        Some(level) => store.top_n_by_category(level, limit),
        None => store.top_n(limit),
    })
    .await?;
    Ok(Json(entries))
}

async fn stats_handler(State(store): State<LeaderboardStore>) -> Result<Json<Stats>, ApiError> {
    let stats = run_blocking(move || {
        store.initialize()?;
        Ok(store.stats())
    })
    .await?;
    Ok(Json(stats))
}

async fn clear_handler(State(store): State<LeaderboardStore>) -> Result<StatusCode, ApiError> {
    run_blocking(move || store.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}

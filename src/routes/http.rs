// GET handlers

use axum::{Json, extract::State, response::Html, response::IntoResponse};

use super::AppState;

/// GET /: static dashboard shell; data arrives through /api/stats polling.
pub(super) async fn dashboard_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(state.dashboard.as_str().to_owned())
}

/// GET /api/stats: one fresh snapshot.
pub(super) async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.snapshot().await)
}

/// GET /api/logs: reserved.
pub(super) async fn logs_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "logs": "Log functionality coming soon" }))
}

/// GET /api/terminal: log tails only.
pub(super) async fn terminal_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.aggregator.terminal_logs().await)
}

// HTTP routes: dashboard shell plus JSON feeds

mod http;

use axum::{Router, http::StatusCode, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::aggregator::SnapshotAggregator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: SnapshotAggregator,
    pub(crate) dashboard: Arc<String>,
}

/// Builds the router. Every request aggregates fresh data; nothing is cached.
pub fn app(aggregator: SnapshotAggregator, dashboard_html: String) -> Router {
    let state = AppState {
        aggregator,
        dashboard: Arc::new(dashboard_html),
    };
    Router::new()
        .route("/", get(http::dashboard_handler)) // GET /
        .route("/api/stats", get(http::stats_handler)) // GET /api/stats
        .route("/api/logs", get(http::logs_handler)) // GET /api/logs (reserved)
        .route("/api/terminal", get(http::terminal_handler)) // GET /api/terminal
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use crate::db::db_handler;
pub use crate::echo::echo_handler;
pub use crate::health::{health_handler, root_handler};
pub use crate::metrics::metrics_handler;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// The full route table. Anything else falls through to axum's 404/405.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/db", get(db_handler))
        .route("/echo", post(echo_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

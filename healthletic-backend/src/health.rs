use crate::metrics::Endpoint;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

pub async fn root_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.observe(Endpoint::Root);
    Json(json!({ "message": "Healthletic Backend Running" }))
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Liveness only. Never touches the database.
    state.metrics.observe(Endpoint::Health);
    Json(json!({ "status": "healthy" }))
}

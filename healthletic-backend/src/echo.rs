use crate::metrics::Endpoint;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub async fn echo_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.metrics.observe(Endpoint::Echo);
    let payload = parse_payload(&headers, &body);
    Json(json!({ "you_sent": payload }))
}

/// Lenient body parsing: anything that isn't a JSON request with a non-null
/// JSON value becomes an empty object. Malformed input is not an error.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Value {
    if !is_json_content_type(headers) {
        debug!("Echo body ignored: content type is not JSON");
        return empty();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => empty(),
        Ok(v) => v,
        Err(e) => {
            debug!("Echo body is not valid JSON: {}", e);
            empty()
        }
    }
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

// application/json or any application/*+json, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(raw) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

//! Per-endpoint request counters and their Prometheus text exposition.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder, TEXT_FORMAT};
use std::sync::Arc;
use tracing::{debug, error};

const REQUESTS_TOTAL: &str = "healthletic_requests_total";

/// Counted endpoints. `/metrics` is never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Root,
    Health,
    Db,
    Echo,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Root => "/",
            Endpoint::Health => "/health",
            Endpoint::Db => "/db",
            Endpoint::Echo => "/echo",
        }
    }
}

/// Request counters backed by a private registry. Nothing is registered globally.
#[derive(Clone)]
pub struct RequestMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
}

impl RequestMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Total HTTP Requests"),
            &["endpoint"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(RequestMetrics {
            registry,
            requests_total,
        })
    }

    pub fn observe(&self, endpoint: Endpoint) {
        self.requests_total
            .with_label_values(&[endpoint.as_str()])
            .inc();
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let body = state.metrics.render().map_err(|e| {
        error!("Failed to encode metrics: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    debug!("Serving {} bytes of metrics", body.len());
    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response())
}

use crate::config::DbConfig;
use crate::metrics::Endpoint;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds connect options for one probe. A `DB_PORT` outside the TCP port
/// range is only reported here, so the rest of the service keeps serving.
pub fn connect_options(cfg: &DbConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let port = u16::try_from(cfg.port).map_err(|_| {
        sqlx::Error::Configuration(format!("port {} is out of range 0-65535", cfg.port).into())
    })?;
    Ok(PgConnectOptions::new()
        .host(&cfg.host)
        .port(port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.name))
}

/// Opens a fresh connection, runs `SELECT 1` and closes it again.
///
/// No pooling: the connection lives only for this call. A failed query still
/// closes the connection before the error is returned; if connecting fails
/// there is nothing to release.
pub async fn probe(cfg: &DbConfig) -> Result<(), sqlx::Error> {
    let opts = connect_options(cfg)?;
    let mut conn = PgConnection::connect_with(&opts).await?;
    let queried = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&mut conn)
        .await;
    let closed = conn.close().await;
    queried?;
    closed
}

pub async fn db_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.observe(Endpoint::Db);

    match probe(&state.db).await {
        Ok(()) => {
            debug!("Database probe succeeded");
            (StatusCode::OK, Json(json!({ "db": "connected" })))
        }
        Err(e) => {
            warn!("Database probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "db_error": e.to_string() })),
            )
        }
    }
}

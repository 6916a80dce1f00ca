use crate::config::{Config, DbConfig};
use crate::metrics::RequestMetrics;
use tracing::{debug, info};

pub struct AppState {
    // Connection target for `/db`; each probe opens its own connection.
    pub db: DbConfig,
    pub metrics: RequestMetrics,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let db = cfg.db.clone();
        info!(
            "Database target: {}@{}:{}/{}",
            cfg.db.user, cfg.db.host, cfg.db.port, cfg.db.name
        );

        let metrics = RequestMetrics::new()?;
        debug!("Metrics registry created");

        Ok(AppState { db, metrics })
    }
}

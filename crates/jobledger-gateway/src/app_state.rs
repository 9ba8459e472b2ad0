//! Shared application state for the ledger gateway.
//!
//! Startup errors are returned, not panicked on, so `main` can log them
//! and exit cleanly.

use std::sync::Arc;

use jobledger_core::error::Result;

use crate::config::LedgerConfig;
use crate::obs::metrics::LedgerMetrics;
use crate::status::{self, StatusSource};
use crate::store::{self, ObjectStore};
use crate::updater::LedgerUpdater;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: LedgerConfig,
    updater: LedgerUpdater,
    metrics: Arc<LedgerMetrics>,
}

impl AppState {
    /// Build state with the backends named in `cfg`.
    pub async fn from_config(cfg: LedgerConfig) -> Result<Self> {
        let status = status::from_config(&cfg.status).await?;
        let store = store::from_config(&cfg.storage).await?;
        tracing::info!(
            status = status.name(),
            store = store.name(),
            default_destination = ?cfg.destination,
            "backends ready"
        );
        Ok(Self::new(cfg, status, store))
    }

    /// Build state around explicit backends.
    pub fn new(cfg: LedgerConfig, status: Arc<dyn StatusSource>, store: Arc<dyn ObjectStore>) -> Self {
        let metrics = Arc::new(LedgerMetrics::default());
        let updater = LedgerUpdater::new(status, store, Arc::clone(&metrics))
            .with_default_destination(cfg.destination.clone());
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                updater,
                metrics,
            }),
        }
    }

    pub fn cfg(&self) -> &LedgerConfig {
        &self.inner.cfg
    }

    pub fn updater(&self) -> &LedgerUpdater {
        &self.inner.updater
    }

    pub fn metrics(&self) -> &LedgerMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}

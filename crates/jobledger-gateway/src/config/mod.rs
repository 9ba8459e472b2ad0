//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use jobledger_core::error::{LedgerError, Result};

pub use schema::{
    GatewaySection, LedgerConfig, StaticJob, StaticMetric, StatusBackend, StatusSection,
    StorageBackend, StorageSection,
};

/// Config path used when `JOBLEDGER_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "jobledger.yaml";

pub fn load_from_file(path: &str) -> Result<LedgerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LedgerError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<LedgerConfig> {
    let cfg: LedgerConfig = serde_yaml::from_str(s)
        .map_err(|e| LedgerError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

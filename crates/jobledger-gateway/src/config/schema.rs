use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;
use jobledger_core::error::{LedgerError, Result};
use jobledger_core::event::Destination;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    pub version: u32,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub status: StatusSection,

    #[serde(default)]
    pub storage: StorageSection,

    /// Ledger location used when an event names none.
    #[serde(default)]
    pub destination: Option<Destination>,
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LedgerError::UnsupportedVersion);
        }
        if self.app_name.trim().is_empty() {
            return Err(LedgerError::Config("app_name must not be empty".into()));
        }

        self.gateway.validate()?;
        self.status.validate()?;
        self.storage.validate()?;

        if let Some(dest) = &self.destination {
            if dest.bucket.is_empty() || dest.key.is_empty() {
                return Err(LedgerError::Config(
                    "destination.bucket and destination.key must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

fn default_app_name() -> String {
    "jobledger".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            LedgerError::Config(format!("gateway.listen must be a socket address: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBackend {
    /// SageMaker `DescribeTrainingJob`.
    #[default]
    Sagemaker,
    /// Jobs listed in this config file.
    Static,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusSection {
    #[serde(default)]
    pub backend: StatusBackend,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub jobs: Vec<StaticJob>,
}

impl StatusSection {
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StatusBackend::Sagemaker => {
                require_aws("status.backend=sagemaker")?;
                if !self.jobs.is_empty() {
                    return Err(LedgerError::Config(
                        "status.jobs is only valid with status.backend=static".into(),
                    ));
                }
            }
            StatusBackend::Static => {
                if self.jobs.is_empty() {
                    return Err(LedgerError::Config(
                        "status.jobs must not be empty for status.backend=static".into(),
                    ));
                }
                let mut seen = HashSet::new();
                for job in &self.jobs {
                    if job.name.is_empty() {
                        return Err(LedgerError::Config("status.jobs[].name must not be empty".into()));
                    }
                    if !seen.insert(job.name.as_str()) {
                        return Err(LedgerError::Config(format!(
                            "status.jobs lists {} twice",
                            job.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticJob {
    pub name: String,

    #[serde(default = "default_job_status")]
    pub status: String,

    /// May be empty to model a job without metric definitions.
    #[serde(default)]
    pub metrics: Vec<StaticMetric>,
}

fn default_job_status() -> String {
    "Completed".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticMetric {
    pub name: String,
    pub value: f64,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    /// `<root>/<bucket>/<key>` on the local filesystem.
    Fs,
    /// Process memory; lost on restart.
    Memory,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StorageBackend::S3 => require_aws("storage.backend=s3"),
            StorageBackend::Fs => match self.root.as_deref() {
                Some(root) if !root.trim().is_empty() => Ok(()),
                _ => Err(LedgerError::Config(
                    "storage.root is required for storage.backend=fs".into(),
                )),
            },
            StorageBackend::Memory => Ok(()),
        }
    }
}

#[cfg(feature = "aws")]
fn require_aws(_what: &str) -> Result<()> {
    Ok(())
}

#[cfg(not(feature = "aws"))]
fn require_aws(what: &str) -> Result<()> {
    Err(LedgerError::Config(format!(
        "{what} needs the `aws` feature, which this build lacks"
    )))
}

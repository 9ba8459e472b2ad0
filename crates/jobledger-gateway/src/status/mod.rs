//! Job-status sources.
//!
//! A `StatusSource` answers "what did this job report?" for one job name.
//! `fetch_final_metrics` layers the shared contract on top: log the job's
//! status and refuse jobs that finished without metrics.

pub mod fixed;

#[cfg(feature = "aws")]
pub mod sagemaker;

use std::sync::Arc;

use async_trait::async_trait;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::record::JobMetric;

use crate::config::{StatusBackend, StatusSection};

pub use fixed::StaticStatus;

/// What the status service reported for a job.
#[derive(Debug, Clone, Default)]
pub struct JobStatus {
    /// Lifecycle state as reported (e.g. `Completed`), if any.
    pub status: Option<String>,
    pub final_metrics: Vec<JobMetric>,
}

#[async_trait]
pub trait StatusSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn describe_job(&self, job_name: &str) -> Result<JobStatus>;
}

/// Final metrics for `job_name`; `NoMetricsAvailable` when there are none.
pub async fn fetch_final_metrics(source: &dyn StatusSource, job_name: &str) -> Result<Vec<JobMetric>> {
    let described = source.describe_job(job_name).await.inspect_err(|e| {
        tracing::error!(source = source.name(), job = %job_name, error = %e, "status query failed");
    })?;

    tracing::info!(
        source = source.name(),
        job = %job_name,
        status = described.status.as_deref().unwrap_or("unknown"),
        metrics = described.final_metrics.len(),
        "job status"
    );

    if described.final_metrics.is_empty() {
        return Err(LedgerError::NoMetricsAvailable(job_name.to_string()));
    }
    Ok(described.final_metrics)
}

/// Build the configured status source.
pub async fn from_config(section: &StatusSection) -> Result<Arc<dyn StatusSource>> {
    match section.backend {
        StatusBackend::Static => Ok(Arc::new(StaticStatus::from_jobs(&section.jobs))),
        #[cfg(feature = "aws")]
        StatusBackend::Sagemaker => {
            let sdk = crate::aws::load_sdk_config(section.region.as_deref()).await;
            Ok(Arc::new(sagemaker::SageMakerStatus::new(&sdk)))
        }
        #[cfg(not(feature = "aws"))]
        StatusBackend::Sagemaker => Err(LedgerError::Config(
            "status.backend=sagemaker needs the `aws` feature".into(),
        )),
    }
}

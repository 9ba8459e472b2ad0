//! Status source backed by a fixed job table (config or tests).

use std::collections::HashMap;

use async_trait::async_trait;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::record::JobMetric;

use super::{JobStatus, StatusSource};
use crate::config::StaticJob;

#[derive(Debug, Default)]
pub struct StaticStatus {
    jobs: HashMap<String, JobStatus>,
}

impl StaticStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_jobs(jobs: &[StaticJob]) -> Self {
        let mut out = Self::new();
        for job in jobs {
            let metrics = job
                .metrics
                .iter()
                .map(|m| JobMetric::new(m.name.clone(), m.value, m.timestamp))
                .collect();
            out.insert(job.name.clone(), Some(job.status.clone()), metrics);
        }
        out
    }

    /// Builder-style insert, handy in tests.
    pub fn with_job(mut self, name: &str, metrics: Vec<JobMetric>) -> Self {
        self.insert(name.to_string(), Some("Completed".into()), metrics);
        self
    }

    pub fn insert(&mut self, name: String, status: Option<String>, final_metrics: Vec<JobMetric>) {
        self.jobs.insert(
            name,
            JobStatus {
                status,
                final_metrics,
            },
        );
    }
}

#[async_trait]
impl StatusSource for StaticStatus {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn describe_job(&self, job_name: &str) -> Result<JobStatus> {
        self.jobs
            .get(job_name)
            .cloned()
            .ok_or_else(|| LedgerError::Upstream(format!("job not found: {job_name}")))
    }
}

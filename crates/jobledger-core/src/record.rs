//! Metric observations as they come out of the status query and as they
//! land in the ledger.

/// One final metric reported for a job: (name, value, timestamp).
///
/// `timestamp` is seconds since the Unix epoch, fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct JobMetric {
    pub metric_name: String,
    pub value: f64,
    pub timestamp: f64,
}

impl JobMetric {
    pub fn new(metric_name: impl Into<String>, value: f64, timestamp: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            value,
            timestamp,
        }
    }

    /// Attach the owning job, producing the row that gets appended.
    pub fn stamp(&self, job_name: &str) -> MetricRecord {
        MetricRecord {
            job_name: job_name.to_string(),
            metric_name: self.metric_name.clone(),
            value: self.value,
            timestamp: self.timestamp,
        }
    }
}

/// A metric observation attributed to a job. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub job_name: String,
    pub metric_name: String,
    pub value: f64,
    pub timestamp: f64,
}

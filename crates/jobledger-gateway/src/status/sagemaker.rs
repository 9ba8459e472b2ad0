//! SageMaker `DescribeTrainingJob` status source.

use async_trait::async_trait;
use aws_sdk_sagemaker::error::DisplayErrorContext;
use aws_sdk_sagemaker::Client;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::record::JobMetric;

use super::{JobStatus, StatusSource};

pub struct SageMakerStatus {
    client: Client,
}

impl SageMakerStatus {
    pub fn new(sdk: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk),
        }
    }
}

#[async_trait]
impl StatusSource for SageMakerStatus {
    fn name(&self) -> &'static str {
        "sagemaker"
    }

    async fn describe_job(&self, job_name: &str) -> Result<JobStatus> {
        let out = self
            .client
            .describe_training_job()
            .training_job_name(job_name)
            .send()
            .await
            .map_err(|e| {
                LedgerError::Upstream(format!(
                    "describe_training_job {job_name}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let mut final_metrics = Vec::new();
        for m in out.final_metric_data_list() {
            let (Some(name), Some(value)) = (m.metric_name(), m.value()) else {
                tracing::warn!(job = %job_name, "final metric without name or value, skipped");
                continue;
            };
            let timestamp = m.timestamp().map(|t| t.as_secs_f64()).unwrap_or_default();
            final_metrics.push(JobMetric::new(name, widen(value), timestamp));
        }

        Ok(JobStatus {
            status: out.training_job_status().map(|s| s.as_str().to_string()),
            final_metrics,
        })
    }
}

/// f32 -> f64 through the shortest decimal form, so 0.8f32 becomes 0.8
/// rather than 0.800000011920929.
fn widen(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(f64::from(v))
}

#[cfg(test)]
mod tests {
    use super::widen;

    #[test]
    fn widen_keeps_decimal_form() {
        assert_eq!(widen(0.8), 0.8);
        assert_eq!(widen(0.125), 0.125);
        assert_eq!(widen(1.0), 1.0);
    }
}

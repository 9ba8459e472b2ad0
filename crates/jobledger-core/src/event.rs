//! Invocation wire types.
//!
//! The event is taken as a raw `serde_json::Value` so that a missing job
//! reference can be reported together with the event that lacked it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enrich::EnrichedMetric;
use crate::error::{LedgerError, Result};

/// Event field naming the job.
pub const JOB_FIELD: &str = "TrainingJobName";

/// Event field naming the ledger bucket.
pub const BUCKET_FIELD: &str = "DestinationBucket";

/// Event field naming the ledger object key.
pub const KEY_FIELD: &str = "CsvFile";

/// Location of a ledger object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
}

impl Destination {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Validated invocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub job_name: String,
    /// Set only when both bucket and file key were present and non-empty.
    pub destination: Option<Destination>,
}

impl InvocationRequest {
    /// Validate an invocation event. Unknown fields are ignored.
    ///
    /// The job reference is checked before anything else, so an event
    /// without one always fails as `MissingJobIdentifier`.
    pub fn from_event(event: &Value) -> Result<Self> {
        let Some(fields) = event.as_object() else {
            return Err(LedgerError::BadRequest("event must be a JSON object".into()));
        };

        let job_name = optional_str(fields, JOB_FIELD)?
            .ok_or_else(|| LedgerError::MissingJobIdentifier(event.to_string()))?;

        let bucket = optional_str(fields, BUCKET_FIELD)?;
        let key = optional_str(fields, KEY_FIELD)?;
        let destination = match (bucket, key) {
            (Some(bucket), Some(key)) => Some(Destination { bucket, key }),
            _ => None,
        };

        Ok(Self {
            job_name,
            destination,
        })
    }
}

/// A string field; absent, null and `""` all read as `None`.
fn optional_str(fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(LedgerError::BadRequest(format!(
            "{name} must be a string, got {other}"
        ))),
    }
}

/// Invocation result payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "TrainingMetrics")]
    pub metrics: Vec<EnrichedMetric>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_event() {
        let req = InvocationRequest::from_event(&json!({
            "TrainingJobName": "job-1",
            "DestinationBucket": "ml-metrics",
            "CsvFile": "model_metrics.csv",
            "Extra": 42
        }))
        .unwrap();
        assert_eq!(req.job_name, "job-1");
        assert_eq!(
            req.destination,
            Some(Destination::new("ml-metrics", "model_metrics.csv"))
        );
    }

    #[test]
    fn destination_needs_both_parts() {
        let req = InvocationRequest::from_event(&json!({
            "TrainingJobName": "job-1",
            "DestinationBucket": "ml-metrics"
        }))
        .unwrap();
        assert_eq!(req.destination, None);

        let req = InvocationRequest::from_event(&json!({
            "TrainingJobName": "job-1",
            "DestinationBucket": "",
            "CsvFile": "x.csv"
        }))
        .unwrap();
        assert_eq!(req.destination, None);
    }

    #[test]
    fn missing_job_names_field_and_event() {
        let err = InvocationRequest::from_event(&json!({ "CsvFile": "x.csv" })).unwrap_err();
        assert_eq!(err.client_code().as_str(), "MISSING_JOB_IDENTIFIER");
        let msg = err.to_string();
        assert!(msg.contains(JOB_FIELD));
        assert!(msg.contains("x.csv"));
    }

    #[test]
    fn null_or_empty_job_is_missing() {
        for ev in [json!({ "TrainingJobName": null }), json!({ "TrainingJobName": "" })] {
            let err = InvocationRequest::from_event(&ev).unwrap_err();
            assert!(matches!(err, LedgerError::MissingJobIdentifier(_)));
        }
    }

    #[test]
    fn non_object_or_wrong_type_is_bad_request() {
        let err = InvocationRequest::from_event(&json!(["job-1"])).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

        let err = InvocationRequest::from_event(&json!({ "TrainingJobName": 7 })).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

        let err = InvocationRequest::from_event(&json!({
            "TrainingJobName": "job-1",
            "CsvFile": 5
        }))
        .unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
        assert!(err.to_string().contains(KEY_FIELD));
    }

    #[test]
    fn missing_job_wins_over_mistyped_optional_fields() {
        let err = InvocationRequest::from_event(&json!({ "CsvFile": 5 })).unwrap_err();
        assert!(matches!(err, LedgerError::MissingJobIdentifier(_)));
        assert!(err.to_string().contains(JOB_FIELD));
    }

    #[test]
    fn response_field_names() {
        let resp = InvocationResponse {
            metrics: vec![EnrichedMetric {
                metric_name: "accuracy".into(),
                value: 0.8,
                timestamp: 10.0,
                past_min: 0.5,
                past_max: 0.9,
            }],
        };
        let v = serde_json::to_value(&resp).unwrap();
        let m = &v["TrainingMetrics"][0];
        assert_eq!(m["MetricName"], "accuracy");
        assert_eq!(m["PastMin"], 0.5);
        assert_eq!(m["PastMax"], 0.9);
        assert_eq!(m["Timestamp"], 10.0);
    }
}

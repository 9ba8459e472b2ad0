//! Attach prior-history bounds to freshly reported metrics.

use serde::Serialize;

use crate::history::HistoryIndex;
use crate::record::JobMetric;

/// `past_min` reported for a metric with no history.
///
/// Together with [`NO_HISTORY_MAX`] this forms an inverted pair
/// (min > max) that cannot occur for real history.
pub const NO_HISTORY_MIN: f64 = 1.0;

/// `past_max` reported for a metric with no history.
pub const NO_HISTORY_MAX: f64 = 0.0;

/// A new metric plus the bounds of its own prior values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichedMetric {
    pub metric_name: String,
    pub value: f64,
    pub timestamp: f64,
    pub past_min: f64,
    pub past_max: f64,
}

impl EnrichedMetric {
    /// True when the bounds are the no-history sentinel.
    pub fn has_history(&self) -> bool {
        self.past_min <= self.past_max
    }
}

/// One output entry per input metric, in input order.
pub fn enrich(metrics: &[JobMetric], history: &HistoryIndex) -> Vec<EnrichedMetric> {
    metrics
        .iter()
        .map(|m| {
            let (past_min, past_max) = history
                .bounds(&m.metric_name)
                .unwrap_or((NO_HISTORY_MIN, NO_HISTORY_MAX));
            EnrichedMetric {
                metric_name: m.metric_name.clone(),
                value: m.value,
                timestamp: m.timestamp,
                past_min,
                past_max,
            }
        })
        .collect()
}

//! Per-metric history of prior values, rebuilt from the ledger on every
//! invocation.

use std::collections::HashMap;

use crate::ledger::Ledger;

/// Prior values grouped by metric name.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    by_metric: HashMap<String, Vec<f64>>,
}

impl HistoryIndex {
    /// No history at all (fresh ledger or no destination).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect prior values for the metric names in `wanted`, in ledger order.
    ///
    /// Rows for other metrics are ignored. Values that are not finite
    /// floats are skipped with a warning.
    pub fn build<'a>(ledger: &Ledger, wanted: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_metric: HashMap<String, Vec<f64>> = wanted
            .into_iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();

        for row in ledger.rows() {
            let Some(values) = by_metric.get_mut(&row.metric_name) else {
                continue;
            };
            match row.value_f64() {
                Some(v) => values.push(v),
                None => tracing::warn!(
                    job = %row.job_name,
                    metric = %row.metric_name,
                    value = %row.value,
                    "skipping non-numeric ledger value"
                ),
            }
        }

        Self { by_metric }
    }

    /// Prior values for `metric`, empty if none.
    pub fn values(&self, metric: &str) -> &[f64] {
        self.by_metric.get(metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(min, max)` over prior values, `None` when there is no history.
    pub fn bounds(&self, metric: &str) -> Option<(f64, f64)> {
        let values = self.values(metric);
        let (first, rest) = values.split_first()?;
        Some(
            rest.iter()
                .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }

    /// Number of prior values per tracked metric, for logging.
    pub fn sizes(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self
            .by_metric
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LEDGER: &str = "TrainingJobName,MetricName,Value,Timestamp\n\
        j1,accuracy,0.5,1\n\
        j1,loss,0.3,1\n\
        j2,accuracy,0.9,2\n\
        j3,accuracy,0.7,3\n\
        j3,recall,0.1,3\n";

    #[test]
    fn groups_only_wanted_metrics() {
        let ledger = Ledger::parse(LEDGER).unwrap();
        let idx = HistoryIndex::build(&ledger, ["accuracy", "loss"]);
        assert_eq!(idx.values("accuracy"), &[0.5, 0.9, 0.7]);
        assert_eq!(idx.values("loss"), &[0.3]);
        assert!(idx.values("recall").is_empty());
        assert_eq!(idx.sizes(), vec![("accuracy", 3), ("loss", 1)]);
    }

    #[test]
    fn bounds_over_prior_values() {
        let ledger = Ledger::parse(LEDGER).unwrap();
        let idx = HistoryIndex::build(&ledger, ["accuracy"]);
        assert_eq!(idx.bounds("accuracy"), Some((0.5, 0.9)));
        assert_eq!(idx.bounds("missing"), None);
    }

    #[test]
    fn non_numeric_values_are_skipped() {
        let text = "TrainingJobName,MetricName,Value,Timestamp\nj,f1,oops,1\nj,f1,0.4,1\n";
        let ledger = Ledger::parse(text).unwrap();
        let idx = HistoryIndex::build(&ledger, ["f1"]);
        assert_eq!(idx.values("f1"), &[0.4]);
    }
}

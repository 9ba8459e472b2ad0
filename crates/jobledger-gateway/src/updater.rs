//! Ledger updater pipeline.
//!
//! One invocation runs strictly in sequence:
//! validate event -> fetch job status -> download ledger -> merge ->
//! upload ledger -> enrich.
//!
//! The ledger object is not locked. Two invocations writing the same
//! destination can interleave their read-modify-write cycles and the later
//! upload wins; rows from the earlier one are lost.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::Instrument;

use jobledger_core::enrich::enrich;
use jobledger_core::error::Result;
use jobledger_core::event::{Destination, InvocationRequest, InvocationResponse};
use jobledger_core::history::HistoryIndex;
use jobledger_core::ledger::Ledger;
use jobledger_core::record::JobMetric;

use crate::obs::metrics::LedgerMetrics;
use crate::status::{fetch_final_metrics, StatusSource};
use crate::store::ObjectStore;

pub struct LedgerUpdater {
    status: Arc<dyn StatusSource>,
    store: Arc<dyn ObjectStore>,
    default_destination: Option<Destination>,
    metrics: Arc<LedgerMetrics>,
}

impl LedgerUpdater {
    pub fn new(
        status: Arc<dyn StatusSource>,
        store: Arc<dyn ObjectStore>,
        metrics: Arc<LedgerMetrics>,
    ) -> Self {
        Self {
            status,
            store,
            default_destination: None,
            metrics,
        }
    }

    /// Ledger used when an event does not name one.
    pub fn with_default_destination(mut self, dest: Option<Destination>) -> Self {
        self.default_destination = dest;
        self
    }

    /// Handle one invocation event.
    pub async fn invoke(&self, event: &Value) -> Result<InvocationResponse> {
        let started = Instant::now();
        let res = self.run(event).await;

        let outcome = match &res {
            Ok(_) => "ok",
            Err(e) => e.client_code().as_str(),
        };
        self.metrics.invocations.inc(&[("outcome", outcome)]);
        self.metrics.invoke_duration.observe(&[], started.elapsed());
        res
    }

    async fn run(&self, event: &Value) -> Result<InvocationResponse> {
        tracing::info!(%event, "invocation received");
        let req = InvocationRequest::from_event(event)?;

        let span = tracing::info_span!("invoke", job = %req.job_name);
        async move {
            let metrics = fetch_final_metrics(self.status.as_ref(), &req.job_name).await?;

            let destination = req
                .destination
                .clone()
                .or_else(|| self.default_destination.clone());

            let history = match &destination {
                Some(dest) => self.merge(dest, &req.job_name, &metrics).await?,
                None => {
                    tracing::info!("no destination given, ledger untouched");
                    HistoryIndex::empty()
                }
            };

            let enriched = enrich(&metrics, &history);
            let with_history = enriched.iter().filter(|m| m.has_history()).count();
            tracing::info!(metrics = ?enriched, with_history, "enriched metrics");
            Ok(InvocationResponse { metrics: enriched })
        }
        .instrument(span)
        .await
    }

    /// Append `metrics` for `job_name` to the ledger at `dest` and return
    /// the history that existed before the append.
    pub async fn merge(
        &self,
        dest: &Destination,
        job_name: &str,
        metrics: &[JobMetric],
    ) -> Result<HistoryIndex> {
        let mut ledger = match self.store.get(dest).await? {
            Some(raw) => {
                self.metrics.ledger_fetches.inc(&[("result", "found")]);
                Ledger::from_bytes(&raw)?
            }
            None => {
                tracing::warn!(store = self.store.name(), %dest, "ledger not found, starting a fresh one");
                self.metrics.ledger_fetches.inc(&[("result", "fresh")]);
                Ledger::new()
            }
        };

        let history = HistoryIndex::build(&ledger, metrics.iter().map(|m| m.metric_name.as_str()));
        tracing::info!(past = ?history.sizes(), prior_rows = ledger.len(), "past metrics");

        for m in metrics {
            ledger.append(&m.stamp(job_name));
        }
        self.store.put(dest, ledger.to_bytes()).await?;

        self.metrics.rows_appended.add(&[], metrics.len() as u64);
        tracing::info!(
            store = self.store.name(),
            %dest,
            rows = ledger.len(),
            appended = metrics.len(),
            "ledger uploaded"
        );
        Ok(history)
    }
}

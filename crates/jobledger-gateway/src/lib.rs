//! jobledger gateway library entry.
//!
//! This crate wires the job-status source, the ledger object store, the
//! ledger updater pipeline and the HTTP surface into one service. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod status;
pub mod store;
pub mod transport;
pub mod updater;

#[cfg(feature = "aws")]
pub mod aws;

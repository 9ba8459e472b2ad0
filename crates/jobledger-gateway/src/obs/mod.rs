//! Lightweight in-process metrics (dependency-free).
//!
//! Counters and a latency histogram stored as atomics, rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;

//! HTTP transport for invocations.

pub mod invoke;

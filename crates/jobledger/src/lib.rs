//! Top-level facade crate for jobledger.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use jobledger_core::*;
}

pub mod gateway {
    pub use jobledger_gateway::*;
}

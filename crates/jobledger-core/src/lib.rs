//! jobledger core: metric records, the CSV ledger codec, history and
//! enrichment, invocation wire types, and the shared error type.
//!
//! Nothing in this crate performs I/O. The gateway fetches bytes from the
//! status service and the object store and hands them here; everything
//! returned is plain data ready to be serialized or uploaded.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A corrupt ledger
//! or a malformed event surfaces as `LedgerError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod enrich;
pub mod error;
pub mod event;
pub mod history;
pub mod ledger;
pub mod record;

/// Shared result type.
pub use error::{LedgerError, Result};

//! Shared error type across jobledger crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invocation event lacks the job reference.
    MissingJobIdentifier,
    /// The job finished without any recorded final metrics.
    NoMetricsAvailable,
    /// Invalid input / malformed event.
    BadRequest,
    /// The stored ledger does not follow the ledger format.
    MalformedLedger,
    /// Object store failure.
    Storage,
    /// Job-status service failure.
    Upstream,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Config rejected at load time.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MissingJobIdentifier => "MISSING_JOB_IDENTIFIER",
            ClientCode::NoMetricsAvailable => "NO_METRICS_AVAILABLE",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::MalformedLedger => "MALFORMED_LEDGER",
            ClientCode::Storage => "STORAGE",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Carries the offending event, rendered as JSON.
    #[error("{field} key not found in event: {0}", field = crate::event::JOB_FIELD)]
    MissingJobIdentifier(String),
    #[error("no metrics found for job {0}; make sure metric definitions are set before training")]
    NoMetricsAvailable(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("malformed ledger at line {line}: {reason}")]
    MalformedLedger { line: usize, reason: String },
    #[error("storage: {0}")]
    Storage(String),
    #[error("status query failed: {0}")]
    Upstream(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            LedgerError::MissingJobIdentifier(_) => ClientCode::MissingJobIdentifier,
            LedgerError::NoMetricsAvailable(_) => ClientCode::NoMetricsAvailable,
            LedgerError::BadRequest(_) => ClientCode::BadRequest,
            LedgerError::MalformedLedger { .. } => ClientCode::MalformedLedger,
            LedgerError::Storage(_) => ClientCode::Storage,
            LedgerError::Upstream(_) => ClientCode::Upstream,
            LedgerError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            LedgerError::Config(_) => ClientCode::Config,
            LedgerError::Internal(_) => ClientCode::Internal,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LedgerError::MalformedLedger {
            line,
            reason: reason.into(),
        }
    }
}

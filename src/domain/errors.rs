//! Domain errors for the marketflow core.

use thiserror::Error;

/// Domain-level errors raised at the boundary of a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The transition table has no edge from `from` to `to`
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Unknown status name
    #[error("Invalid workflow status: {0}")]
    InvalidStatus(String),

    /// Unknown priority or notification level name
    #[error("Invalid workflow priority: {0}")]
    InvalidPriority(String),

    /// Unknown workflow type name
    #[error("Invalid workflow type: {0}")]
    InvalidType(String),

    /// Aggregate invariant broken, or unknown metrics status name
    #[error("Invalid workflow metrics: {0}")]
    InvalidMetrics(String),
}

impl DomainError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InvalidPriority(_) => "invalid_priority",
            Self::InvalidType(_) => "invalid_type",
            Self::InvalidMetrics(_) => "invalid_metrics",
        }
    }
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Normalize an enum string for lookup: trimmed, lowercase, `-` as `_`.
pub(crate) fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase().replace('-', "_")
}

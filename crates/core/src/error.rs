//! Error types for the tutorkit domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The engine has a
//! deliberately small taxonomy: every operation is pure, so failures are
//! always invalid-input failures reported synchronously to the caller.

use thiserror::Error;

/// The top-level error type for all policy-engine operations.
#[derive(Debug, Clone, Error)]
pub enum PolicyError {
    /// The requested strategy id is not in the registry.
    ///
    /// Never silently defaulted — substituting a fallback strategy would
    /// corrupt the reproducibility of recorded research comparisons.
    #[error("unknown strategy '{id}'")]
    UnknownStrategy { id: String },

    /// An event is missing a field required for ordering or context
    /// accumulation. Replay skips the offending event and continues.
    #[error("malformed event '{event_id}': {reason}")]
    MalformedEvent { event_id: String, reason: String },
}

/// Result type alias using our PolicyError.
pub type Result<T> = std::result::Result<T, PolicyError>;

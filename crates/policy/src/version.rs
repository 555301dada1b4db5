//! Policy provenance tags.
//!
//! Two independent version identifiers are stamped onto every emitted
//! decision point:
//!
//! - [`POLICY_VERSION`] identifies the strategy/threshold table revision.
//! - [`POLICY_SEMANTICS_VERSION`] identifies the rule-evaluation logic
//!   revision.
//!
//! They vary independently so a threshold-table change does not invalidate
//! reproducibility claims about the decision logic, and vice versa. Bump a
//! tag only when that layer's observable behavior changes.

use serde::{Deserialize, Serialize};

/// Revision of the strategy threshold table.
pub const POLICY_VERSION: &str = "strategy-table-v1";

/// Revision of the rule-evaluation logic.
pub const POLICY_SEMANTICS_VERSION: &str = "rule-eval-v1";

/// The pair of provenance tags attached to emitted decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVersionStamp {
    /// Threshold-table revision id.
    pub policy_version: String,
    /// Rule-evaluation logic revision id.
    pub policy_semantics_version: String,
}

impl PolicyVersionStamp {
    /// The stamp for the code currently compiled in.
    pub fn current() -> Self {
        Self {
            policy_version: POLICY_VERSION.into(),
            policy_semantics_version: POLICY_SEMANTICS_VERSION.into(),
        }
    }
}

impl Default for PolicyVersionStamp {
    fn default() -> Self {
        Self::current()
    }
}

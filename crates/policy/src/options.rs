//! Engine option knobs, passed explicitly into every evaluation.
//!
//! These are configuration parameters, not strategies: they change how the
//! rule chain and the context fold behave for *any* strategy.

use serde::{Deserialize, Serialize};

/// How the escalation rule's guard is composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoEscalation {
    /// Escalate once the error count reaches the strategy's escalate
    /// threshold, whether or not the hint ladder was climbed (default).
    #[default]
    AlwaysAfterHintThreshold,
    /// Escalate only when the error threshold is reached *and* the hint
    /// ladder is exhausted.
    ThresholdGated,
}

/// When the per-attempt error counter resets.
///
/// The reset-on-explanation rule is a design default inferred from observed
/// behavior, so it is a named, swappable policy rather than hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorResetPolicy {
    /// A viewed explanation resets the error and retry counters for the
    /// next round, so the following error does not re-trigger escalation
    /// immediately (default).
    #[default]
    ResetOnExplanation,
    /// Counters reset only on a successful execution (or a fresh attempt).
    OnSuccessOnly,
}

/// Options applied to a whole evaluation or replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Escalation guard composition.
    #[serde(default)]
    pub auto_escalation: AutoEscalation,
    /// Error counter reset rule.
    #[serde(default)]
    pub error_reset: ErrorResetPolicy,
}

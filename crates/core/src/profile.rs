//! Learner profile types.
//!
//! The profile is a read-only input: the engine reads the current strategy
//! and preference knobs but never mutates or persists it. Fields beyond
//! these (coverage evidence, mastery scores) belong to external
//! collaborators and are not modeled here.

use serde::{Deserialize, Serialize};

/// A learner's profile as handed off by the external profile store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// Unique learner ID.
    pub id: String,

    /// The strategy currently assigned to this learner.
    pub current_strategy: String,

    /// Per-learner preference knobs.
    #[serde(default)]
    pub preferences: LearnerPreferences,
}

/// Preference overrides carried on the profile.
///
/// These are recorded and displayed by the surrounding system; the engine's
/// thresholds come from the strategy table, so unset preferences are the
/// common case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnerPreferences {
    /// Preferred escalation threshold, if the learner overrode the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_threshold: Option<f64>,

    /// Preferred delay (in decision points) before aggregating to a note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_delay: Option<u32>,
}

impl LearnerProfile {
    /// Create a profile with default preferences.
    pub fn new(id: impl Into<String>, current_strategy: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_strategy: current_strategy.into(),
            preferences: LearnerPreferences::default(),
        }
    }
}

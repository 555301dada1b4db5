//! The fixed table of named strategies and their thresholds.
//!
//! Thresholds are `f64` so that `hint-only` carries a real
//! `f64::INFINITY` — threshold comparisons against it are false by numeric
//! construction, with no sentinel integers to get silently wrong.

use serde::{Deserialize, Serialize};
use tutorkit_core::{PolicyError, Result};

/// A named threshold configuration controlling how aggressively the engine
/// escalates to explanations and aggregates help into study notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Strategy id, e.g. `"adaptive-medium"`.
    pub id: String,
    /// Error count at which hinting escalates to a full explanation.
    /// `f64::INFINITY` for strategies that never escalate.
    pub escalate_threshold: f64,
    /// Error count at which accumulated help is aggregated into a study
    /// note. Invariant: `2 × escalate_threshold` whenever finite.
    pub aggregate_threshold: f64,
}

impl StrategyConfig {
    fn new(id: &str, escalate_threshold: f64, aggregate_threshold: f64) -> Self {
        Self {
            id: id.into(),
            escalate_threshold,
            aggregate_threshold,
        }
    }
}

/// The registry of built-in strategies.
///
/// The table is fixed by design: four canonical strategies, resolved by id.
/// Unknown ids are an error, never a silent default — replayed research
/// data must stay attributable to the exact thresholds that produced it.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<StrategyConfig>,
}

impl StrategyRegistry {
    /// Create a registry with the canonical strategy table.
    pub fn builtin() -> Self {
        Self {
            strategies: vec![
                StrategyConfig::new("hint-only", f64::INFINITY, f64::INFINITY),
                StrategyConfig::new("adaptive-low", 5.0, 10.0),
                StrategyConfig::new("adaptive-medium", 3.0, 6.0),
                StrategyConfig::new("adaptive-high", 2.0, 4.0),
            ],
        }
    }

    /// Resolve a strategy id to its configuration.
    pub fn resolve(&self, id: &str) -> Result<&StrategyConfig> {
        self.strategies
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| PolicyError::UnknownStrategy { id: id.into() })
    }

    /// All strategies in stable order, for threshold display.
    pub fn list(&self) -> &[StrategyConfig] {
        &self.strategies
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

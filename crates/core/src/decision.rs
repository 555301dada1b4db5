//! Decisions and the per-attempt context they are evaluated against.

use serde::{Deserialize, Serialize};

/// Depth of the hint ladder. Hints advance level by level and cap here;
/// escalation to a full explanation is the step beyond the ladder.
pub const MAX_HINT_LEVEL: u8 = 3;

/// Causal state for one `(learner_id, problem_id)` attempt.
///
/// Mutated only by the context accumulator; never read back into storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// Errors since the attempt started (or since the last reset).
    pub error_count: u32,
    /// Execution attempts since the last reset, regardless of outcome.
    pub retry_count: u32,
    /// Highest hint ladder level seen this attempt, capped at
    /// [`MAX_HINT_LEVEL`]. Never decreases within an attempt.
    pub current_hint_level: u8,
}

/// The pedagogical action the engine chose at a decision point.
///
/// A closed tagged union so that the evaluator and every consumer handle
/// all variants exhaustively at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    /// No intervention; the learner keeps working.
    NoAction,
    /// Show the next hint at the given ladder level.
    ShowHint { level: u8 },
    /// Escalate from hinting to a full explanation.
    ShowExplanation,
    /// Aggregate accumulated help into a durable study note.
    AggregateToTextbook,
}

impl Decision {
    /// Short label for logs and diff rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::NoAction => "no_action",
            Decision::ShowHint { .. } => "show_hint",
            Decision::ShowExplanation => "show_explanation",
            Decision::AggregateToTextbook => "aggregate_to_textbook",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::ShowHint { level } => write!(f, "show_hint(level {level})"),
            other => write!(f, "{}", other.label()),
        }
    }
}

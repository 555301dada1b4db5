//! Rule evaluation — the pure mapping from (strategy, context, event) to a
//! pedagogical decision.
//!
//! Rules are checked in a fixed order and the first match wins. Each
//! outcome carries the rule id and a human-readable reasoning string so a
//! stored decision log stays auditable.

use tracing::debug;
use tutorkit_core::{Decision, DecisionContext, EventType, InteractionEvent, MAX_HINT_LEVEL};

use crate::options::AutoEscalation;
use crate::registry::StrategyConfig;

/// Rule id: accumulated errors reached the aggregate threshold.
pub const RULE_AGGREGATE_THRESHOLD: &str = "aggregate-threshold";
/// Rule id: accumulated errors reached the escalate threshold.
pub const RULE_ESCALATE_THRESHOLD: &str = "escalate-threshold";
/// Rule id: a hint request advances the hint ladder.
pub const RULE_HINT_LADDER_ADVANCE: &str = "hint-ladder-advance";
/// Rule id: nothing fired.
pub const RULE_BELOW_THRESHOLD: &str = "below-threshold";

/// The outcome of evaluating the rule chain at one decision point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// The decision taken.
    pub decision: Decision,
    /// Which rule fired.
    pub rule_fired: &'static str,
    /// Human-readable explanation of why.
    pub reasoning: String,
}

/// Evaluate the rule chain for a decision-point event.
///
/// Pure: no state is read or written beyond the arguments. Threshold
/// comparisons use the strategy's `f64` values directly, so `hint-only`'s
/// infinite thresholds make rules 1 and 2 unreachable with no
/// special-casing.
pub fn evaluate(
    config: &StrategyConfig,
    ctx: &DecisionContext,
    event: &InteractionEvent,
    mode: AutoEscalation,
) -> RuleOutcome {
    let errors = f64::from(ctx.error_count);

    let outcome = if errors >= config.aggregate_threshold {
        RuleOutcome {
            decision: Decision::AggregateToTextbook,
            rule_fired: RULE_AGGREGATE_THRESHOLD,
            reasoning: format!(
                "error count {} reached aggregate threshold {} for '{}'",
                ctx.error_count, config.aggregate_threshold, config.id
            ),
        }
    } else if escalation_fires(config, ctx, mode) {
        RuleOutcome {
            decision: Decision::ShowExplanation,
            rule_fired: RULE_ESCALATE_THRESHOLD,
            reasoning: format!(
                "error count {} reached escalate threshold {} for '{}' (hint level {})",
                ctx.error_count, config.escalate_threshold, config.id, ctx.current_hint_level
            ),
        }
    } else if matches!(event.event_type, EventType::HintRequest | EventType::HintView) {
        let level = (ctx.current_hint_level + 1).min(MAX_HINT_LEVEL);
        RuleOutcome {
            decision: Decision::ShowHint { level },
            rule_fired: RULE_HINT_LADDER_ADVANCE,
            reasoning: format!(
                "hint requested at ladder level {}, advancing to {}",
                ctx.current_hint_level, level
            ),
        }
    } else {
        RuleOutcome {
            decision: Decision::NoAction,
            rule_fired: RULE_BELOW_THRESHOLD,
            reasoning: format!(
                "error count {} below thresholds for '{}'",
                ctx.error_count, config.id
            ),
        }
    };

    debug!(
        event_id = %event.id,
        strategy = %config.id,
        rule = outcome.rule_fired,
        decision = %outcome.decision,
        "rule evaluated"
    );

    outcome
}

fn escalation_fires(config: &StrategyConfig, ctx: &DecisionContext, mode: AutoEscalation) -> bool {
    let threshold_reached = f64::from(ctx.error_count) >= config.escalate_threshold;
    match mode {
        AutoEscalation::AlwaysAfterHintThreshold => threshold_reached,
        AutoEscalation::ThresholdGated => {
            threshold_reached && ctx.current_hint_level >= MAX_HINT_LEVEL
        }
    }
}

//! The policy engine facade.
//!
//! Thin wrapper owning the strategy registry, the option knobs, and the
//! version stamp. Construct one fresh wherever needed — it holds no mutable
//! state, so concurrent callers (a live tutoring session and a research
//! replay of the same learner) cannot interfere with each other.

use serde::Serialize;
use tracing::debug;
use tutorkit_core::{Decision, DecisionContext, InteractionEvent, LearnerProfile, Result, sort_events};

use crate::context::ContextAccumulator;
use crate::evaluator::evaluate;
use crate::options::EngineOptions;
use crate::registry::StrategyRegistry;
use crate::replay::{CounterfactualComparison, ReplayDecisionPoint, compare, replay};
use crate::version::PolicyVersionStamp;

/// A single live decision for an in-progress problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveDecision {
    /// The action to take now.
    pub decision: Decision,
    /// The context the decision was evaluated against.
    pub context: DecisionContext,
    /// Which rule fired.
    pub rule_fired: String,
    /// Human-readable explanation.
    pub reasoning: String,
    /// The strategy that was applied (from the learner's profile).
    pub strategy: String,
    /// Provenance tags for the rule logic and threshold table.
    pub stamp: PolicyVersionStamp,
}

/// The adaptive-tutoring policy engine.
///
/// Every operation is a pure function over its inputs: the engine never
/// mutates the trace or profile it is given and never writes to any store.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    registry: StrategyRegistry,
    options: EngineOptions,
}

impl PolicyEngine {
    /// Create an engine with the built-in strategy table and the given
    /// options.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            registry: StrategyRegistry::builtin(),
            options,
        }
    }

    /// The strategy registry (for threshold display).
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// The options this engine was constructed with.
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Make one live decision for an in-progress problem.
    ///
    /// `events` is the current problem's event slice including the event
    /// that just occurred; the strategy comes from the learner's profile.
    /// Returns `Ok(None)` when the latest event is not a decision point.
    /// The caller is responsible for persisting any resulting events (e.g.
    /// logging a `hint_view`) — the engine writes nothing.
    pub fn decide(
        &self,
        profile: &LearnerProfile,
        events: &[InteractionEvent],
    ) -> Result<Option<LiveDecision>> {
        let config = self.registry.resolve(&profile.current_strategy)?;

        let mut ordered = events.to_vec();
        sort_events(&mut ordered);
        let contexts = ContextAccumulator::new(self.options.error_reset).fold(&ordered);

        // The decision is for the most recent well-formed event.
        let Some((event, context)) = ordered
            .iter()
            .zip(contexts.iter())
            .rev()
            .find_map(|(e, c)| c.map(|c| (e, c)))
        else {
            return Ok(None);
        };

        if !event.event_type.is_decision_point() {
            debug!(event_id = %event.id, "latest event is context-only, no decision");
            return Ok(None);
        }

        let outcome = evaluate(config, &context, event, self.options.auto_escalation);
        Ok(Some(LiveDecision {
            decision: outcome.decision,
            context,
            rule_fired: outcome.rule_fired.into(),
            reasoning: outcome.reasoning,
            strategy: config.id.clone(),
            stamp: PolicyVersionStamp::current(),
        }))
    }

    /// Deterministically re-derive the decision sequence for a stored trace
    /// under the given strategy.
    pub fn replay(
        &self,
        profile: &LearnerProfile,
        trace: &[InteractionEvent],
        strategy_id: &str,
    ) -> Result<Vec<ReplayDecisionPoint>> {
        replay(&self.registry, profile, trace, strategy_id, self.options)
    }

    /// Replay the identical trace under two strategies and diff the
    /// decision sequences.
    pub fn compare(
        &self,
        profile: &LearnerProfile,
        trace: &[InteractionEvent],
        baseline_id: &str,
        alternate_id: &str,
    ) -> Result<CounterfactualComparison> {
        compare(
            &self.registry,
            profile,
            trace,
            baseline_id,
            alternate_id,
            self.options,
        )
    }
}

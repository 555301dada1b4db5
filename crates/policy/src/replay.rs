//! Deterministic trace replay and counterfactual strategy comparison.
//!
//! Replay is a read-only projection: sort the trace by the canonical
//! ordering key, fold contexts, evaluate the rule chain at every
//! decision-point event, and stamp each emitted point with the policy
//! version tags. The trace and profile are never mutated and nothing is
//! written to any store, so the same trace can be replayed under
//! arbitrarily many strategies for comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use tutorkit_core::{
    Decision, DecisionContext, EventType, InteractionEvent, LearnerProfile, Result, sort_events,
};

use crate::context::ContextAccumulator;
use crate::evaluator::evaluate;
use crate::options::EngineOptions;
use crate::registry::StrategyRegistry;
use crate::version::PolicyVersionStamp;

/// One replayed decision, attributable to the exact rule logic and
/// threshold table that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayDecisionPoint {
    /// Sequential index over decision points only, starting at 0.
    pub index: usize,
    /// The event this decision was evaluated at.
    pub event_id: String,
    /// When that event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event's type.
    pub event_type: EventType,
    /// The classified error subtype, when the event carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subtype_id: Option<String>,
    /// The context the rule chain saw.
    pub context: DecisionContext,
    /// The decision taken.
    pub decision: Decision,
    /// Which rule fired.
    pub rule_fired: String,
    /// Human-readable explanation.
    pub reasoning: String,
    /// The strategy this replay ran under.
    pub strategy: String,
    /// Threshold-table revision id.
    pub policy_version: String,
    /// Rule-logic revision id.
    pub policy_semantics_version: String,
}

/// Replay a stored trace under the given strategy.
///
/// Non-decision events are consumed for context but do not appear in the
/// output; malformed events are skipped entirely. The profile is read-only
/// attribution input — replay derives everything from the trace itself.
pub fn replay(
    registry: &StrategyRegistry,
    profile: &LearnerProfile,
    trace: &[InteractionEvent],
    strategy_id: &str,
    options: EngineOptions,
) -> Result<Vec<ReplayDecisionPoint>> {
    let config = registry.resolve(strategy_id)?;
    let stamp = PolicyVersionStamp::current();

    let mut ordered = trace.to_vec();
    sort_events(&mut ordered);

    let contexts = ContextAccumulator::new(options.error_reset).fold(&ordered);

    let mut points = Vec::new();
    for (event, context) in ordered.iter().zip(contexts.iter()) {
        // None marks a malformed row the accumulator already skipped.
        let Some(context) = context else { continue };
        if !event.event_type.is_decision_point() {
            continue;
        }

        let outcome = evaluate(config, context, event, options.auto_escalation);
        points.push(ReplayDecisionPoint {
            index: points.len(),
            event_id: event.id.clone(),
            timestamp: event.timestamp,
            event_type: event.event_type,
            error_subtype_id: event.error_subtype_id.clone(),
            context: *context,
            decision: outcome.decision,
            rule_fired: outcome.rule_fired.into(),
            reasoning: outcome.reasoning,
            strategy: config.id.clone(),
            policy_version: stamp.policy_version.clone(),
            policy_semantics_version: stamp.policy_semantics_version.clone(),
        });
    }

    info!(
        learner = %profile.id,
        strategy = %config.id,
        events = trace.len(),
        decision_points = points.len(),
        "replay complete"
    );

    Ok(points)
}

/// One decision point where the two strategies disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionDivergence {
    /// Decision-point index shared by both replays.
    pub index: usize,
    /// The event both decisions were evaluated at.
    pub event_id: String,
    /// What the baseline strategy decided.
    pub baseline_decision: Decision,
    /// What the alternate strategy decided.
    pub alternate_decision: Decision,
    /// The rule that fired under the baseline.
    pub baseline_rule: String,
    /// The rule that fired under the alternate.
    pub alternate_rule: String,
}

/// The result of replaying the same trace under two strategies.
///
/// Holds both full decision sequences, the divergence rows, and an
/// event-id index over the baseline built once at construction so lookups
/// during diff rendering are O(1) rather than an O(n) rescan.
#[derive(Debug, Clone, Serialize)]
pub struct CounterfactualComparison {
    /// Strategy id the baseline replay ran under.
    pub baseline_strategy: String,
    /// Strategy id the alternate replay ran under.
    pub alternate_strategy: String,
    /// The baseline decision sequence.
    pub baseline: Vec<ReplayDecisionPoint>,
    /// The alternate decision sequence.
    pub alternate: Vec<ReplayDecisionPoint>,
    /// Points where the decisions differ, in index order.
    pub divergences: Vec<DecisionDivergence>,
    /// Total decision points compared.
    pub points_compared: usize,
    #[serde(skip)]
    baseline_index: HashMap<String, usize>,
}

impl CounterfactualComparison {
    /// Look up the baseline decision point for an event id.
    pub fn baseline_for(&self, event_id: &str) -> Option<&ReplayDecisionPoint> {
        self.baseline_index
            .get(event_id)
            .map(|&i| &self.baseline[i])
    }

    /// Whether the two strategies produced identical decision sequences.
    pub fn is_identical(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// Replay the identical trace under two strategies and diff the outcomes.
///
/// Both replays see the same events in the same order, so the sequences
/// have equal length with matching event ids at each index; only
/// decision/rule/reasoning may differ.
pub fn compare(
    registry: &StrategyRegistry,
    profile: &LearnerProfile,
    trace: &[InteractionEvent],
    baseline_id: &str,
    alternate_id: &str,
    options: EngineOptions,
) -> Result<CounterfactualComparison> {
    let baseline = replay(registry, profile, trace, baseline_id, options)?;
    let alternate = replay(registry, profile, trace, alternate_id, options)?;

    let baseline_index: HashMap<String, usize> = baseline
        .iter()
        .enumerate()
        .map(|(i, p)| (p.event_id.clone(), i))
        .collect();

    let mut divergences = Vec::new();
    for point in &alternate {
        let Some(&i) = baseline_index.get(&point.event_id) else {
            continue;
        };
        let base = &baseline[i];
        if base.decision != point.decision {
            divergences.push(DecisionDivergence {
                index: point.index,
                event_id: point.event_id.clone(),
                baseline_decision: base.decision.clone(),
                alternate_decision: point.decision.clone(),
                baseline_rule: base.rule_fired.clone(),
                alternate_rule: point.rule_fired.clone(),
            });
        }
    }

    Ok(CounterfactualComparison {
        baseline_strategy: baseline_id.into(),
        alternate_strategy: alternate_id.into(),
        points_compared: baseline.len(),
        baseline,
        alternate,
        divergences,
        baseline_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(seq: i64, event_type: EventType) -> InteractionEvent {
        InteractionEvent {
            id: format!("e{seq}"),
            timestamp: Utc.timestamp_opt(1_700_000_000 + seq, 0).unwrap(),
            ..InteractionEvent::new("l1", "s1", "p1", event_type)
        }
    }

    fn profile() -> LearnerProfile {
        LearnerProfile::new("l1", "adaptive-medium")
    }

    fn three_errors() -> Vec<InteractionEvent> {
        vec![
            event(0, EventType::Error),
            event(1, EventType::Error),
            event(2, EventType::Error),
        ]
    }

    #[test]
    fn empty_trace_yields_no_points() {
        let registry = StrategyRegistry::builtin();
        let points = replay(
            &registry,
            &profile(),
            &[],
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn three_errors_escalate_at_third_under_adaptive_medium() {
        let registry = StrategyRegistry::builtin();
        let points = replay(
            &registry,
            &profile(),
            &three_errors(),
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();

        let decisions: Vec<&Decision> = points.iter().map(|p| &p.decision).collect();
        assert_eq!(
            decisions,
            vec![
                &Decision::NoAction,
                &Decision::NoAction,
                &Decision::ShowExplanation
            ]
        );
    }

    #[test]
    fn unknown_strategy_fails_replay() {
        let registry = StrategyRegistry::builtin();
        let result = replay(
            &registry,
            &profile(),
            &three_errors(),
            "adaptive-extreme",
            EngineOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn non_decision_events_are_context_only() {
        let registry = StrategyRegistry::builtin();
        let trace = vec![
            event(0, EventType::Execution),
            event(1, EventType::Error),
            event(2, EventType::TextbookAdd),
        ];
        let points = replay(
            &registry,
            &profile(),
            &trace,
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].event_id, "e1");
        assert_eq!(points[0].index, 0);
        // The execution event still contributed to context.
        assert_eq!(points[0].context.retry_count, 1);
    }

    #[test]
    fn replay_sorts_unordered_input() {
        let registry = StrategyRegistry::builtin();
        let mut trace = three_errors();
        trace.reverse();
        let points = replay(
            &registry,
            &profile(),
            &trace,
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        let ids: Vec<&str> = points.iter().map(|p| p.event_id.as_str()).collect();
        assert_eq!(ids, vec!["e0", "e1", "e2"]);
        assert_eq!(points[2].decision, Decision::ShowExplanation);
    }

    #[test]
    fn replay_does_not_mutate_the_trace() {
        let registry = StrategyRegistry::builtin();
        let mut trace = three_errors();
        trace.reverse();
        let before: Vec<String> = trace.iter().map(|e| e.id.clone()).collect();
        replay(
            &registry,
            &profile(),
            &trace,
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        let after: Vec<String> = trace.iter().map(|e| e.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn every_point_carries_version_stamps() {
        let registry = StrategyRegistry::builtin();
        let points = replay(
            &registry,
            &profile(),
            &three_errors(),
            "adaptive-high",
            EngineOptions::default(),
        )
        .unwrap();
        let stamp = PolicyVersionStamp::current();
        for point in &points {
            assert_eq!(point.policy_version, stamp.policy_version);
            assert_eq!(
                point.policy_semantics_version,
                stamp.policy_semantics_version
            );
            assert_eq!(point.strategy, "adaptive-high");
        }
    }

    #[test]
    fn comparison_diffs_matching_event_ids() {
        let registry = StrategyRegistry::builtin();
        let comparison = compare(
            &registry,
            &profile(),
            &three_errors(),
            "hint-only",
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();

        assert_eq!(comparison.points_compared, 3);
        assert_eq!(comparison.baseline.len(), comparison.alternate.len());
        for (b, a) in comparison.baseline.iter().zip(comparison.alternate.iter()) {
            assert_eq!(b.event_id, a.event_id);
            assert_eq!(b.index, a.index);
        }

        // Only the third decision differs: hint-only never escalates.
        assert_eq!(comparison.divergences.len(), 1);
        let divergence = &comparison.divergences[0];
        assert_eq!(divergence.event_id, "e2");
        assert_eq!(divergence.baseline_decision, Decision::NoAction);
        assert_eq!(divergence.alternate_decision, Decision::ShowExplanation);
    }

    #[test]
    fn baseline_lookup_by_event_id() {
        let registry = StrategyRegistry::builtin();
        let comparison = compare(
            &registry,
            &profile(),
            &three_errors(),
            "hint-only",
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();

        let point = comparison.baseline_for("e1").unwrap();
        assert_eq!(point.decision, Decision::NoAction);
        assert!(comparison.baseline_for("nope").is_none());
    }

    #[test]
    fn same_strategy_comparison_is_identical() {
        let registry = StrategyRegistry::builtin();
        let comparison = compare(
            &registry,
            &profile(),
            &three_errors(),
            "adaptive-medium",
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        assert!(comparison.is_identical());
    }

    #[test]
    fn replay_points_export_as_json() {
        let registry = StrategyRegistry::builtin();
        let points = replay(
            &registry,
            &profile(),
            &three_errors(),
            "adaptive-medium",
            EngineOptions::default(),
        )
        .unwrap();
        let json = serde_json::to_string(&points).unwrap();
        assert!(json.contains("escalate-threshold"));
        let parsed: Vec<ReplayDecisionPoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, points);
    }
}

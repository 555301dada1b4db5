//! Context accumulation — folding an ordered event slice into the causal
//! state each rule evaluation needs.
//!
//! The fold is pure: no side effects, no retained state between calls.
//! Running it twice over the same input yields identical output, which is
//! what makes stored-trace replay deterministic.

use std::collections::HashMap;
use tracing::warn;
use tutorkit_core::{DecisionContext, EventType, InteractionEvent, MAX_HINT_LEVEL};

use crate::options::ErrorResetPolicy;

/// Per-attempt running state, keyed by `(learner_id, problem_id)`.
#[derive(Debug, Default, Clone)]
struct AttemptState {
    session_id: String,
    ctx: DecisionContext,
}

/// Folds ordered event slices into per-event decision contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAccumulator {
    error_reset: ErrorResetPolicy,
}

impl ContextAccumulator {
    /// Create an accumulator with the given error-reset policy.
    pub fn new(error_reset: ErrorResetPolicy) -> Self {
        Self { error_reset }
    }

    /// Fold events (already in canonical order) into contexts.
    ///
    /// The result is parallel to the input: `result[i]` is the context as
    /// of `events[i]`, or `None` if that event was malformed and skipped.
    ///
    /// The snapshot at an event reflects that event's *accumulating*
    /// effects but not its *reset* effects — a successful execution or an
    /// explanation view is observed at full count, and the reset takes
    /// effect from the following event. This lets an explanation view
    /// itself trigger aggregation before clearing the counter.
    pub fn fold(&self, events: &[InteractionEvent]) -> Vec<Option<DecisionContext>> {
        let mut attempts: HashMap<(String, String), AttemptState> = HashMap::new();
        let mut contexts = Vec::with_capacity(events.len());

        for event in events {
            if let Err(err) = event.validate() {
                warn!(error = %err, "skipping malformed event during context fold");
                contexts.push(None);
                continue;
            }

            let key = (event.learner_id.clone(), event.problem_id.clone());
            let state = attempts.entry(key).or_insert_with(|| AttemptState {
                session_id: event.session_id.clone(),
                ctx: DecisionContext::default(),
            });

            // A fresh session starts a fresh attempt for this problem.
            if state.session_id != event.session_id {
                state.session_id = event.session_id.clone();
                state.ctx = DecisionContext::default();
            }

            match event.event_type {
                EventType::Error => {
                    state.ctx.error_count += 1;
                }
                EventType::Execution => {
                    state.ctx.retry_count += 1;
                    if event.successful == Some(false) {
                        state.ctx.error_count += 1;
                    }
                }
                EventType::HintRequest | EventType::HintView => {
                    if let Some(level) = event.hint_level {
                        let level = level.min(MAX_HINT_LEVEL);
                        if level > state.ctx.current_hint_level {
                            state.ctx.current_hint_level = level;
                        }
                    }
                }
                // Unknown events never pass validation above.
                EventType::ExplanationView
                | EventType::TextbookAdd
                | EventType::TextbookUpdate
                | EventType::Unknown => {}
            }

            contexts.push(Some(state.ctx));

            // Post-snapshot resets.
            match event.event_type {
                EventType::Execution if event.successful == Some(true) => {
                    // The attempt is resolved; the next event for this
                    // problem starts a fresh attempt.
                    state.ctx = DecisionContext::default();
                }
                EventType::ExplanationView
                    if self.error_reset == ErrorResetPolicy::ResetOnExplanation =>
                {
                    // Escalation opens a new round: counters clear, but the
                    // ladder stays climbed within the attempt.
                    state.ctx.error_count = 0;
                    state.ctx.retry_count = 0;
                }
                _ => {}
            }
        }

        contexts
    }
}

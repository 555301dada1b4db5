//! Adaptive-tutoring policy engine — strategy table, rule evaluation, and
//! deterministic trace replay.
//!
//! Given a time-ordered log of a learner's interaction events, the engine
//! decides at each qualifying event what pedagogical action to take next:
//! show a hint, escalate to a full explanation, or aggregate accumulated
//! help into a durable study note. The same rule logic runs in two modes:
//!
//! - **live** — one decision at a time as a learner works a problem
//!   ([`PolicyEngine::decide`]);
//! - **replay** — deterministic re-derivation of the whole decision
//!   sequence for a stored trace under a chosen strategy
//!   ([`PolicyEngine::replay`]), including counterfactual comparison of two
//!   strategies over the identical trace ([`PolicyEngine::compare`]).
//!
//! # Architecture
//!
//! ```text
//! raw event log
//!      │
//!      ▼
//! ┌───────────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ ContextAccumulator │──▶│ RuleEvaluator │──▶│ ReplayDriver │
//! └───────────────────┘   └───────────────┘   └──────────────┘
//!                                                    │
//!                                           version stamping
//!                                                    │
//!                                                    ▼
//!                              live caller / research dashboard
//! ```
//!
//! Every operation is pure and synchronous: no I/O, no suspension points,
//! no shared mutable state. There is deliberately no global "current
//! strategy" — every call takes strategy, profile, and options explicitly,
//! so the engine can be constructed fresh per test and shared across
//! concurrent callers.

pub mod context;
pub mod engine;
pub mod evaluator;
pub mod options;
pub mod registry;
pub mod replay;
pub mod version;

// Re-export key types at crate root for ergonomics
pub use context::ContextAccumulator;
pub use engine::{LiveDecision, PolicyEngine};
pub use evaluator::{
    RULE_AGGREGATE_THRESHOLD, RULE_BELOW_THRESHOLD, RULE_ESCALATE_THRESHOLD,
    RULE_HINT_LADDER_ADVANCE, RuleOutcome, evaluate,
};
pub use options::{AutoEscalation, EngineOptions, ErrorResetPolicy};
pub use registry::{StrategyConfig, StrategyRegistry};
pub use replay::{CounterfactualComparison, DecisionDivergence, ReplayDecisionPoint, compare, replay};
pub use version::{POLICY_SEMANTICS_VERSION, POLICY_VERSION, PolicyVersionStamp};

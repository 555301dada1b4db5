//! # tutorkit Core
//!
//! Domain types and error definitions for the tutorkit adaptive-tutoring
//! policy engine. This crate has **zero framework dependencies** — it
//! defines the domain model that the policy and config crates implement
//! against.
//!
//! ## Design Philosophy
//!
//! Everything the engine consumes or emits is defined here as a plain,
//! serializable value type. The engine itself is pure: events and profiles
//! flow in, decisions flow out, nothing is persisted or mutated in place.
//! This enables:
//! - Deterministic replay of stored traces under any strategy
//! - Fresh construction per test with no cross-talk
//! - Clean dependency graph (all crates depend inward on core)

pub mod decision;
pub mod error;
pub mod event;
pub mod profile;

// Re-export key types at crate root for ergonomics
pub use decision::{Decision, DecisionContext, MAX_HINT_LEVEL};
pub use error::{PolicyError, Result};
pub use event::{EventType, InteractionEvent, sort_events};
pub use profile::{LearnerPreferences, LearnerProfile};

//! Interaction events — the raw material every decision is derived from.
//!
//! Events are recorded by the tutoring runtime and handed to the engine as
//! ordered slices. They are immutable once recorded: the engine never writes
//! events, it only folds them into per-attempt context.
//!
//! Replay determinism hinges on the canonical ordering key
//! `(timestamp, problem_id, event_type, id)` — when timestamps collide the
//! remaining components break the tie the same way on every run.

use crate::error::PolicyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of interaction event types.
///
/// `Unknown` is the serde catch-all for event types this engine does not
/// recognize (research traces imported from elsewhere may carry a few);
/// such events are treated as malformed and skipped during accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The learner submitted an attempt (successful or not).
    Execution,
    /// A recognized error occurred in the learner's work.
    Error,
    /// The learner asked for a hint.
    HintRequest,
    /// A hint was displayed at some ladder level.
    HintView,
    /// A full explanation was displayed.
    ExplanationView,
    /// A study note was created.
    TextbookAdd,
    /// An existing study note was updated.
    TextbookUpdate,
    /// Unrecognized event type from an imported trace.
    #[serde(other)]
    Unknown,
}

impl EventType {
    /// The snake_case wire name, also used as the ordering-key component
    /// so the tie-break stays stable if variants are ever reordered.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Execution => "execution",
            EventType::Error => "error",
            EventType::HintRequest => "hint_request",
            EventType::HintView => "hint_view",
            EventType::ExplanationView => "explanation_view",
            EventType::TextbookAdd => "textbook_add",
            EventType::TextbookUpdate => "textbook_update",
            EventType::Unknown => "unknown",
        }
    }

    /// Whether events of this type are decision points: the engine
    /// evaluates a rule and emits a decision. Other types are consumed for
    /// context only.
    pub fn is_decision_point(&self) -> bool {
        matches!(
            self,
            EventType::Error
                | EventType::HintRequest
                | EventType::HintView
                | EventType::ExplanationView
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded learner interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Unique event ID.
    pub id: String,

    /// The learner this event belongs to.
    pub learner_id: String,

    /// The session the event was recorded in.
    pub session_id: String,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// The problem the learner was working on.
    pub problem_id: String,

    /// What happened.
    pub event_type: EventType,

    /// For `execution` events: whether the attempt succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful: Option<bool>,

    /// For `error` events: the classified error subtype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subtype_id: Option<String>,

    /// For hint events: the ladder level shown/requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_level: Option<u8>,

    /// Concepts this event provides evidence about (consumed by the
    /// external coverage scorer, carried opaquely here).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept_ids: Vec<String>,
}

impl InteractionEvent {
    /// Create a new event with a fresh UUID and the current time.
    ///
    /// Used by live callers logging their own events and by tests; replayed
    /// traces arrive fully populated from the external store.
    pub fn new(
        learner_id: impl Into<String>,
        session_id: impl Into<String>,
        problem_id: impl Into<String>,
        event_type: EventType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            learner_id: learner_id.into(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            problem_id: problem_id.into(),
            event_type,
            successful: None,
            error_subtype_id: None,
            hint_level: None,
            concept_ids: Vec::new(),
        }
    }

    /// Set the execution outcome.
    pub fn with_successful(mut self, successful: bool) -> Self {
        self.successful = Some(successful);
        self
    }

    /// Set the hint ladder level.
    pub fn with_hint_level(mut self, level: u8) -> Self {
        self.hint_level = Some(level);
        self
    }

    /// Set the classified error subtype.
    pub fn with_error_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.error_subtype_id = Some(subtype.into());
        self
    }

    /// The canonical ordering key: `(timestamp, problem_id, event_type, id)`.
    pub fn ordering_key(&self) -> (DateTime<Utc>, &str, &'static str, &str) {
        (
            self.timestamp,
            &self.problem_id,
            self.event_type.as_str(),
            &self.id,
        )
    }

    /// Check the fields required for ordering and context accumulation.
    ///
    /// The external store normally hands off sanitized records, but imported
    /// research traces may contain a few corrupt rows; those must be skipped
    /// rather than aborting a whole replay.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.id.is_empty() {
            return Err(PolicyError::MalformedEvent {
                event_id: "<missing>".into(),
                reason: "empty id".into(),
            });
        }
        if self.learner_id.is_empty() {
            return Err(self.malformed("empty learner_id"));
        }
        if self.problem_id.is_empty() {
            return Err(self.malformed("empty problem_id"));
        }
        if self.event_type == EventType::Unknown {
            return Err(self.malformed("unrecognized event_type"));
        }
        Ok(())
    }

    fn malformed(&self, reason: &str) -> PolicyError {
        PolicyError::MalformedEvent {
            event_id: self.id.clone(),
            reason: reason.into(),
        }
    }
}

/// Sort events in place by the canonical ordering key.
pub fn sort_events(events: &mut [InteractionEvent]) {
    events.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn event(id: &str, problem: &str, event_type: EventType, secs: i64) -> InteractionEvent {
        InteractionEvent {
            timestamp: at(secs),
            id: id.into(),
            ..InteractionEvent::new("l1", "s1", problem, event_type)
        }
    }

    #[test]
    fn event_type_wire_names_roundtrip() {
        let json = serde_json::to_string(&EventType::HintView).unwrap();
        assert_eq!(json, "\"hint_view\"");
        let parsed: EventType = serde_json::from_str("\"explanation_view\"").unwrap();
        assert_eq!(parsed, EventType::ExplanationView);
    }

    #[test]
    fn unrecognized_event_type_parses_as_unknown() {
        let parsed: EventType = serde_json::from_str("\"telemetry_ping\"").unwrap();
        assert_eq!(parsed, EventType::Unknown);
    }

    #[test]
    fn decision_point_classification() {
        assert!(EventType::Error.is_decision_point());
        assert!(EventType::HintRequest.is_decision_point());
        assert!(EventType::HintView.is_decision_point());
        assert!(EventType::ExplanationView.is_decision_point());
        assert!(!EventType::Execution.is_decision_point());
        assert!(!EventType::TextbookAdd.is_decision_point());
        assert!(!EventType::TextbookUpdate.is_decision_point());
        assert!(!EventType::Unknown.is_decision_point());
    }

    #[test]
    fn sort_orders_by_timestamp_first() {
        let mut events = vec![
            event("b", "p1", EventType::Error, 10),
            event("a", "p1", EventType::Error, 5),
        ];
        sort_events(&mut events);
        assert_eq!(events[0].id, "a");
        assert_eq!(events[1].id, "b");
    }

    #[test]
    fn sort_breaks_timestamp_ties_deterministically() {
        // Same timestamp: problem_id, then event_type wire name, then id.
        let mut events = vec![
            event("z", "p2", EventType::Error, 0),
            event("y", "p1", EventType::HintView, 0),
            event("x", "p1", EventType::Error, 0),
            event("a", "p1", EventType::Error, 0),
        ];
        sort_events(&mut events);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "x", "y", "z"]);
    }

    #[test]
    fn validate_rejects_empty_required_fields() {
        let mut e = event("e1", "p1", EventType::Error, 0);
        assert!(e.validate().is_ok());

        e.problem_id.clear();
        assert!(matches!(
            e.validate(),
            Err(PolicyError::MalformedEvent { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_event_type() {
        let e = event("e1", "p1", EventType::Unknown, 0);
        let err = e.validate().unwrap_err();
        assert!(err.to_string().contains("unrecognized"));
    }

    #[test]
    fn event_roundtrips_through_json() {
        let e = InteractionEvent::new("l1", "s1", "p1", EventType::HintView)
            .with_hint_level(2)
            .with_error_subtype("off-by-one");
        let json = serde_json::to_string(&e).unwrap();
        let parsed: InteractionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, e.id);
        assert_eq!(parsed.hint_level, Some(2));
        assert_eq!(parsed.error_subtype_id.as_deref(), Some("off-by-one"));
    }
}

//! Port for structured decision logging.
//!
//! Defines the [`ConversationLogger`] trait for recording orchestration
//! events (turn decisions, delegation fallbacks, auto-run start/stop) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! audit trail of every speaker decision (JSONL in the infrastructure
//! adapter).

use chorus_domain::{ConversationId, PersonaId, StopReason, TurnDecision};
use serde_json::{Value, json};

/// A structured orchestration event for logging.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier, one of the `ConversationEvent::*` constants.
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub const TURN_DECISION: &'static str = "turn_decision";
    pub const DELEGATION_FALLBACK: &'static str = "delegation_fallback";
    pub const AUTO_RUN_STARTED: &'static str = "auto_run_started";
    pub const AUTO_RUN_STOPPED: &'static str = "auto_run_stopped";

    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A decision accepted by the orchestration service.
    pub fn turn_decision(conversation_id: &ConversationId, decision: &TurnDecision) -> Self {
        Self::new(
            Self::TURN_DECISION,
            json!({
                "conversation_id": conversation_id.as_str(),
                "persona_id": decision.persona_id.as_str(),
                "source": decision.source.as_str(),
                "priority_score": decision.priority_score,
                "factors": decision.factors,
                "reasoning": decision.reasoning,
            }),
        )
    }

    /// The reasoning backend's answer was unusable and the fallback decided.
    pub fn delegation_fallback(
        conversation_id: &ConversationId,
        error_kind: &'static str,
        error: &str,
        chosen: &PersonaId,
    ) -> Self {
        Self::new(
            Self::DELEGATION_FALLBACK,
            json!({
                "conversation_id": conversation_id.as_str(),
                "error_kind": error_kind,
                "error": error,
                "fallback_persona_id": chosen.as_str(),
            }),
        )
    }

    pub fn auto_run_started(conversation_id: &ConversationId, run_id: u64) -> Self {
        Self::new(
            Self::AUTO_RUN_STARTED,
            json!({
                "conversation_id": conversation_id.as_str(),
                "run_id": run_id,
            }),
        )
    }

    pub fn auto_run_stopped(
        conversation_id: &ConversationId,
        run_id: u64,
        messages_generated: usize,
        reason: &StopReason,
    ) -> Self {
        Self::new(
            Self::AUTO_RUN_STOPPED,
            json!({
                "conversation_id": conversation_id.as_str(),
                "run_id": run_id,
                "messages_generated": messages_generated,
                "stop_reason": reason,
            }),
        )
    }
}

/// Port for logging orchestration events to a structured log.
///
/// The `log` method is synchronous and non-fallible so that a broken log
/// sink never disturbs a decision; implementations swallow write failures.
pub trait ConversationLogger: Send + Sync {
    /// Record an orchestration event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

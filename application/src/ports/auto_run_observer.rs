//! Auto-run observer port
//!
//! Defines callbacks for following an automatic conversation as it runs.

use chorus_domain::{ConversationId, Message, StopReason, TurnDecision};

/// Callback for progress of an auto-run loop
///
/// Implementations live in the host (UI push, notifications, metrics).
/// Callbacks run on the loop task and must not block.
pub trait AutoRunObserver: Send + Sync {
    /// Called when a speaker was chosen, before generation starts.
    fn on_decision(&self, _conversation_id: &ConversationId, _decision: &TurnDecision) {}

    /// Called with each generated message.
    fn on_message(&self, _conversation_id: &ConversationId, _message: &Message) {}

    /// Called once when the loop reaches its terminal state.
    fn on_stopped(&self, _conversation_id: &ConversationId, _reason: &StopReason) {}
}

/// No-op observer for when nobody is watching
pub struct NoAutoRunObserver;

impl AutoRunObserver for NoAutoRunObserver {}

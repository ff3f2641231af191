//! Per-conversation orchestration state and its registry.
//!
//! Each attached conversation owns one [`ConversationOrchestrationState`]
//! behind its own async mutex, so decisions inside a conversation are
//! serialized while distinct conversations proceed independently. The
//! registry map itself sits behind a std mutex that is never held across an
//! `.await`.

use chorus_domain::{ConversationId, PersonaId, TurnDecision};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory state the engine keeps for one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOrchestrationState {
    pub last_speaker: Option<PersonaId>,
    /// Turns granted per persona since attach.
    pub turn_counts: HashMap<PersonaId, u64>,
    pub total_decisions: u64,
    pub attached_at: DateTime<Utc>,
    pub last_decision_at: Option<DateTime<Utc>>,
}

impl ConversationOrchestrationState {
    pub fn new() -> Self {
        Self {
            last_speaker: None,
            turn_counts: HashMap::new(),
            total_decisions: 0,
            attached_at: Utc::now(),
            last_decision_at: None,
        }
    }

    /// Record an accepted decision.
    pub fn record(&mut self, decision: &TurnDecision) {
        *self
            .turn_counts
            .entry(decision.persona_id.clone())
            .or_insert(0) += 1;
        self.last_speaker = Some(decision.persona_id.clone());
        self.total_decisions += 1;
        self.last_decision_at = Some(Utc::now());
    }

    pub fn turns_of(&self, persona_id: &PersonaId) -> u64 {
        self.turn_counts.get(persona_id).copied().unwrap_or(0)
    }
}

impl Default for ConversationOrchestrationState {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) type StateSlot = Arc<tokio::sync::Mutex<ConversationOrchestrationState>>;

/// Registry of attached conversations.
#[derive(Default)]
pub(crate) struct StateRegistry {
    slots: Mutex<HashMap<ConversationId, StateSlot>>,
}

impl StateRegistry {
    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<ConversationId, StateSlot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attach a conversation. Returns `false` if it was already attached.
    pub(crate) fn attach(&self, id: &ConversationId) -> bool {
        let mut slots = self.slots();
        if slots.contains_key(id) {
            return false;
        }
        slots.insert(id.clone(), StateSlot::default());
        true
    }

    pub(crate) fn get(&self, id: &ConversationId) -> Option<StateSlot> {
        self.slots().get(id).cloned()
    }

    pub(crate) fn get_or_attach(&self, id: &ConversationId) -> StateSlot {
        self.slots().entry(id.clone()).or_default().clone()
    }

    /// Drop a conversation's state. Returns `false` if it was not attached.
    pub(crate) fn remove(&self, id: &ConversationId) -> bool {
        self.slots().remove(id).is_some()
    }

    /// Drop every conversation's state, returning how many were attached.
    pub(crate) fn clear(&self) -> usize {
        let mut slots = self.slots();
        let count = slots.len();
        slots.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.slots().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::{DecisionSource, TurnFactors};

    fn decision(persona: &str) -> TurnDecision {
        TurnDecision::new(
            PersonaId::new(persona),
            "test",
            0.5,
            TurnFactors::default(),
            DecisionSource::RoundRobin,
        )
    }

    #[test]
    fn test_record_updates_counts() {
        let mut state = ConversationOrchestrationState::new();
        state.record(&decision("a"));
        state.record(&decision("b"));
        state.record(&decision("a"));

        assert_eq!(state.last_speaker, Some(PersonaId::new("a")));
        assert_eq!(state.turns_of(&PersonaId::new("a")), 2);
        assert_eq!(state.turns_of(&PersonaId::new("b")), 1);
        assert_eq!(state.turns_of(&PersonaId::new("c")), 0);
        assert_eq!(state.total_decisions, 3);
        assert!(state.last_decision_at.is_some());
    }

    #[test]
    fn test_registry_lifecycle() {
        let registry = StateRegistry::default();
        let id = ConversationId::new("c-1");

        assert!(registry.attach(&id));
        assert!(!registry.attach(&id));
        assert!(registry.get(&id).is_some());
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.get(&id).is_none());
    }

    #[tokio::test]
    async fn test_get_or_attach_shares_the_slot() {
        let registry = StateRegistry::default();
        let id = ConversationId::new("c-1");

        let first = registry.get_or_attach(&id);
        first.lock().await.record(&decision("a"));

        let second = registry.get_or_attach(&id);
        assert_eq!(second.lock().await.total_decisions, 1);

        registry.attach(&ConversationId::new("c-2"));
        assert_eq!(registry.clear(), 2);
        assert_eq!(registry.len(), 0);
    }
}

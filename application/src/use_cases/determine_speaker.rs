//! Determine Speaker use case
//!
//! Entry point for "who speaks next". Dispatches on the conversation mode and
//! selection strategy, keeps the per-conversation orchestration state and
//! logs every accepted decision.
//!
//! | Strategy | Path |
//! |----------|------|
//! | round-robin | roster order after the current speaker |
//! | random | uniform, never the current speaker when avoidable |
//! | intelligent + backend | [`ReasoningAdapter`] (delegated, with fallback) |
//! | intelligent, no backend | weighted argmax of the local factor scores |

use crate::config::{EngineConfig, ReasoningParams};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::conversation_source::ConversationSnapshot;
use crate::ports::reasoning_backend::ReasoningBackend;
use crate::use_cases::orchestration_state::{ConversationOrchestrationState, StateRegistry};
use crate::use_cases::reasoning_adapter::{DecisionContext, ReasoningAdapter};
use chorus_domain::conversation::last_assistant_speaker;
use chorus_domain::orchestration::selection::{
    ScoredPersona, score_roster, select_random, select_round_robin, select_weighted,
};
use chorus_domain::orchestration::{ParticipationStats, compute_stats};
use chorus_domain::persona::active_personas;
use chorus_domain::{
    ConversationId, ConversationMode, ConversationType, DecisionSource, Message, ModePolicy,
    Persona, PersonaId, ScoringConfig, SelectionStrategy, TurnDecision, TurnFactors,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to callers of the orchestration service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("No active personas in conversation {0}")]
    NoPersonas(ConversationId),

    #[error("Conversation not attached: {0}")]
    UnknownConversation(ConversationId),
}

/// Input for a speaker decision
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub conversation_id: ConversationId,
    /// Full roster; inactive personas are filtered out.
    pub personas: Vec<Persona>,
    /// Full log, oldest first.
    pub messages: Vec<Message>,
    pub mode: ConversationMode,
    pub conversation_type: ConversationType,
    pub strategy: SelectionStrategy,
}

impl TurnRequest {
    /// Automatic-mode discussion using the intelligent strategy.
    pub fn new(
        conversation_id: impl Into<ConversationId>,
        personas: Vec<Persona>,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            personas,
            messages,
            mode: ConversationMode::Auto,
            conversation_type: ConversationType::default(),
            strategy: SelectionStrategy::default(),
        }
    }

    /// Build a request from a conversation snapshot.
    pub fn from_snapshot(
        conversation_id: ConversationId,
        snapshot: ConversationSnapshot,
        default_strategy: SelectionStrategy,
    ) -> Self {
        Self {
            conversation_id,
            personas: snapshot.personas,
            messages: snapshot.messages,
            mode: snapshot.mode,
            conversation_type: snapshot.conversation_type,
            strategy: snapshot.strategy.unwrap_or(default_strategy),
        }
    }

    pub fn with_mode(mut self, mode: ConversationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_type(mut self, conversation_type: ConversationType) -> Self {
        self.conversation_type = conversation_type;
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Service deciding who speaks next in each attached conversation
pub struct OrchestrationService {
    scoring: ScoringConfig,
    backend: Option<Arc<dyn ReasoningBackend>>,
    reasoning_params: ReasoningParams,
    logger: Arc<dyn ConversationLogger>,
    registry: StateRegistry,
}

impl OrchestrationService {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            backend: None,
            reasoning_params: ReasoningParams::default(),
            logger: Arc::new(NoConversationLogger),
            registry: StateRegistry::default(),
        }
    }

    /// Service configured from the scoring and reasoning slices.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.scoring().clone()).with_reasoning_params(config.reasoning().clone())
    }

    /// Route intelligent decisions through `backend`.
    pub fn with_reasoning_backend(mut self, backend: Arc<dyn ReasoningBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_reasoning_params(mut self, params: ReasoningParams) -> Self {
        self.reasoning_params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn has_reasoning_backend(&self) -> bool {
        self.backend.is_some()
    }

    // ==================== Decisions ====================

    /// Decide who speaks next.
    ///
    /// Manual conversations get `Ok(None)` without touching any state.
    /// The conversation is attached on first use.
    pub async fn determine_speaker(
        &self,
        request: &TurnRequest,
    ) -> Result<Option<TurnDecision>, OrchestrationError> {
        if !request.mode.is_auto() {
            debug!(
                "Conversation {} is in manual mode, no speaker decision",
                request.conversation_id
            );
            return Ok(None);
        }

        let personas = active_personas(&request.personas);
        if personas.is_empty() {
            return Err(OrchestrationError::NoPersonas(
                request.conversation_id.clone(),
            ));
        }

        let slot = self.registry.get_or_attach(&request.conversation_id);
        let mut state = slot.lock().await;

        let current = last_assistant_speaker(&request.messages)
            .cloned()
            .or_else(|| state.last_speaker.clone());
        let stats = compute_stats(&request.messages, &personas);
        let scored = score_roster(&personas, &request.messages, &stats, &self.scoring);

        let decision = match (request.strategy, &self.backend) {
            (SelectionStrategy::Intelligent, Some(backend)) => {
                let adapter = ReasoningAdapter::new(
                    backend.clone(),
                    self.reasoning_params.clone(),
                    self.logger.clone(),
                );
                let policy = ModePolicy::for_type(
                    request.conversation_type,
                    self.scoring.fallback_participation_gap,
                );
                let ctx = DecisionContext {
                    conversation_id: &request.conversation_id,
                    personas: &personas,
                    messages: &request.messages,
                    stats: &stats,
                    scored: &scored,
                    current_speaker: current.as_ref(),
                    policy: &policy,
                };
                adapter.decide(&ctx).await
            }
            (strategy, _) => select_locally(strategy, &personas, &scored, &stats, current.as_ref()),
        }
        .ok_or_else(|| OrchestrationError::NoPersonas(request.conversation_id.clone()))?;

        state.record(&decision);
        drop(state);

        info!(
            "Conversation {}: {} speaks next ({}, priority {:.2})",
            request.conversation_id, decision.persona_id, decision.source, decision.priority_score
        );
        self.logger.log(ConversationEvent::turn_decision(
            &request.conversation_id,
            &decision,
        ));

        Ok(Some(decision))
    }

    // ==================== Lifecycle ====================

    /// Attach a conversation. Returns `false` if it was already attached.
    pub fn attach(&self, conversation_id: &ConversationId) -> bool {
        self.registry.attach(conversation_id)
    }

    /// Detach a conversation, dropping its state.
    pub fn detach(&self, conversation_id: &ConversationId) -> Result<(), OrchestrationError> {
        if self.registry.remove(conversation_id) {
            Ok(())
        } else {
            Err(OrchestrationError::UnknownConversation(
                conversation_id.clone(),
            ))
        }
    }

    /// Clear a conversation's state. Returns `false` if there was none.
    pub fn reset(&self, conversation_id: &ConversationId) -> bool {
        let removed = self.registry.remove(conversation_id);
        if removed {
            debug!("Reset orchestration state of {}", conversation_id);
        }
        removed
    }

    /// Clear every conversation's state, returning how many were dropped.
    pub fn reset_all(&self) -> usize {
        let count = self.registry.clear();
        debug!("Reset orchestration state of {} conversation(s)", count);
        count
    }

    /// Snapshot of a conversation's state.
    pub async fn state(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationOrchestrationState, OrchestrationError> {
        let slot = self
            .registry
            .get(conversation_id)
            .ok_or_else(|| OrchestrationError::UnknownConversation(conversation_id.clone()))?;
        let state = slot.lock().await;
        Ok(state.clone())
    }

    pub fn attached_count(&self) -> usize {
        self.registry.len()
    }
}

/// Round-robin, random and weighted paths. Never awaits.
fn select_locally(
    strategy: SelectionStrategy,
    personas: &[Persona],
    scored: &[ScoredPersona<'_>],
    stats: &ParticipationStats,
    current: Option<&PersonaId>,
) -> Option<TurnDecision> {
    match strategy {
        SelectionStrategy::RoundRobin => {
            let persona = select_round_robin(personas, current)?;
            Some(scored_decision(
                scored,
                &persona.id,
                format!("Round robin: {} follows in roster order", persona.name),
                DecisionSource::RoundRobin,
            ))
        }
        SelectionStrategy::Random => {
            let persona = select_random(personas, current, &mut rand::thread_rng())?;
            Some(scored_decision(
                scored,
                &persona.id,
                format!("Random pick: {}", persona.name),
                DecisionSource::Random,
            ))
        }
        SelectionStrategy::Intelligent => {
            let best = select_weighted(scored)?;
            let stat = stats.get(&best.persona.id);
            let reasoning = format!(
                "{} scored highest (relevance {:.2}, expertise {:.2}, balance {:.2}, flow {:.2}; {} prior messages)",
                best.persona.name,
                best.factors.relevance,
                best.factors.expertise,
                best.factors.participation_balance,
                best.factors.conversation_flow,
                stat.map(|s| s.message_count).unwrap_or(0)
            );
            Some(TurnDecision::new(
                best.persona.id.clone(),
                reasoning,
                best.score,
                best.factors,
                DecisionSource::Weighted,
            ))
        }
    }
}

fn scored_decision(
    scored: &[ScoredPersona<'_>],
    persona_id: &PersonaId,
    reasoning: String,
    source: DecisionSource,
) -> TurnDecision {
    let (factors, score) = scored
        .iter()
        .find(|s| &s.persona.id == persona_id)
        .map(|s| (s.factors, s.score))
        .unwrap_or((TurnFactors::default(), 0.0));
    TurnDecision::new(persona_id.clone(), reasoning, score, factors, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reasoning_backend::{BackendError, ReasoningRequest};
    use async_trait::async_trait;
    use chorus_domain::ExperienceLevel;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct UnreachableBackend;

    #[async_trait]
    impl ReasoningBackend for UnreachableBackend {
        async fn invoke(&self, _request: &ReasoningRequest) -> Result<String, BackendError> {
            Err(BackendError::Unavailable("connection refused".to_string()))
        }
    }

    struct FixedBackend(String);

    #[async_trait]
    impl ReasoningBackend for FixedBackend {
        async fn invoke(&self, _request: &ReasoningRequest) -> Result<String, BackendError> {
            Ok(self.0.clone())
        }
    }

    /// Answers after a delay with the first roster persona that is not the
    /// current speaker named in the prompt.
    struct SlowBackend {
        delay: Duration,
        roster: Vec<&'static str>,
    }

    #[async_trait]
    impl ReasoningBackend for SlowBackend {
        async fn invoke(&self, request: &ReasoningRequest) -> Result<String, BackendError> {
            tokio::time::sleep(self.delay).await;
            let current = request
                .user_prompt
                .lines()
                .find_map(|line| line.strip_prefix("Current speaker: "));
            let next = self
                .roster
                .iter()
                .find(|id| Some(**id) != current)
                .unwrap();
            Ok(format!(
                r#"{{"next_persona_id":"{}","reasoning":"next in line","priority_score":0.7,
                "factors":{{"relevance":0.5,"expertise":0.5,"participation_balance":0.5,"conversation_flow":0.5}}}}"#,
                next
            ))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn roster() -> Vec<Persona> {
        vec![
            Persona::new("alice", "Alice", "Designer"),
            Persona::new("bob", "Bob", "Engineer"),
            Persona::new("carol", "Carol", "Manager"),
        ]
    }

    fn service() -> OrchestrationService {
        OrchestrationService::new(ScoringConfig::default())
    }

    // ==================== Dispatch ====================

    #[tokio::test]
    async fn test_manual_mode_is_a_no_op() {
        let service = service();
        let request = TurnRequest::new("c-1", vec![], vec![]).with_mode(ConversationMode::Manual);

        assert_eq!(service.determine_speaker(&request).await, Ok(None));
        assert_eq!(service.attached_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_roster_is_an_error() {
        let service = service();
        let request = TurnRequest::new("c-1", vec![Persona::new("x", "X", "y").deactivated()], vec![]);

        assert_eq!(
            service.determine_speaker(&request).await,
            Err(OrchestrationError::NoPersonas(ConversationId::new("c-1")))
        );
    }

    #[tokio::test]
    async fn test_round_robin_follows_roster_and_records_state() {
        let service = service();
        let messages = vec![Message::user("go"), Message::assistant("bob", "hi")];
        let request = TurnRequest::new("c-1", roster(), messages)
            .with_strategy(SelectionStrategy::RoundRobin);

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(decision.persona_id.as_str(), "carol");
        assert_eq!(decision.source, DecisionSource::RoundRobin);

        let state = service.state(&ConversationId::new("c-1")).await.unwrap();
        assert_eq!(state.last_speaker, Some(PersonaId::new("carol")));
        assert_eq!(state.total_decisions, 1);
    }

    #[tokio::test]
    async fn test_state_last_speaker_used_when_log_has_none() {
        let service = service();
        let request = TurnRequest::new("c-1", roster(), vec![Message::user("go")])
            .with_strategy(SelectionStrategy::RoundRobin);

        let first = service.determine_speaker(&request).await.unwrap().unwrap();
        let second = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(first.persona_id.as_str(), "alice");
        assert_eq!(second.persona_id.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_random_never_repeats_current_speaker() {
        let service = service();
        let messages = vec![Message::assistant("alice", "hi")];
        let request = TurnRequest::new("c-1", roster(), messages)
            .with_strategy(SelectionStrategy::Random);

        for _ in 0..50 {
            let decision = service.determine_speaker(&request).await.unwrap().unwrap();
            assert_ne!(decision.persona_id.as_str(), "alice");
            assert_eq!(decision.source, DecisionSource::Random);
        }
    }

    #[tokio::test]
    async fn test_inactive_personas_are_never_selected() {
        let service = service();
        let mut personas = roster();
        personas[1] = personas[1].clone().deactivated();
        let messages = vec![Message::assistant("alice", "hi")];
        let request = TurnRequest::new("c-1", personas, messages)
            .with_strategy(SelectionStrategy::RoundRobin);

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(decision.persona_id.as_str(), "carol");
    }

    // ==================== Intelligent ====================

    #[tokio::test]
    async fn test_weighted_path_picks_the_expert() {
        let logger = Arc::new(RecordingLogger::default());
        let service = service().with_conversation_logger(logger.clone());
        let personas = vec![
            Persona::new("alice", "Alice", "Designer").with_experience(ExperienceLevel::Entry),
            Persona::new("bob", "Bob", "engineer").with_experience(ExperienceLevel::Mastery),
        ];
        let messages = vec![Message::user("can someone review this code architecture?")];
        let request = TurnRequest::new("c-1", personas, messages);

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(decision.persona_id.as_str(), "bob");
        assert_eq!(decision.source, DecisionSource::Weighted);
        assert!(decision.factors.is_in_unit_range());

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, ConversationEvent::TURN_DECISION);
    }

    #[tokio::test]
    async fn test_single_persona_with_unreachable_backend() {
        let service = service().with_reasoning_backend(Arc::new(UnreachableBackend));
        let request = TurnRequest::new(
            "c-1",
            vec![Persona::new("solo", "Solo", "Engineer")],
            vec![Message::user("anyone?")],
        );

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(decision.persona_id.as_str(), "solo");
        assert!(decision.is_fallback());
    }

    #[tokio::test]
    async fn test_delegated_answer_outside_roster_stays_inside() {
        let answer = r#"{"next_persona_id":"zed","reasoning":"x","priority_score":0.5,
            "factors":{"relevance":0.5,"expertise":0.5,"participation_balance":0.5,"conversation_flow":0.5}}"#;
        let logger = Arc::new(RecordingLogger::default());
        let service = service()
            .with_reasoning_backend(Arc::new(FixedBackend(answer.to_string())))
            .with_conversation_logger(logger.clone());
        let request = TurnRequest::new("c-1", roster(), vec![Message::assistant("alice", "hi")]);

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert!(roster().iter().any(|p| p.id == decision.persona_id));
        assert_ne!(decision.persona_id.as_str(), "alice");

        let events = logger.events.lock().unwrap();
        let kinds: Vec<&str> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(kinds, vec!["delegation_fallback", "turn_decision"]);
    }

    #[tokio::test]
    async fn test_non_intelligent_strategies_skip_the_backend() {
        let service = service().with_reasoning_backend(Arc::new(UnreachableBackend));
        let request = TurnRequest::new("c-1", roster(), vec![])
            .with_strategy(SelectionStrategy::RoundRobin);

        let decision = service.determine_speaker(&request).await.unwrap().unwrap();
        assert_eq!(decision.source, DecisionSource::RoundRobin);
    }

    // ==================== Concurrency ====================

    #[tokio::test(start_paused = true)]
    async fn test_same_conversation_decisions_are_sequential() {
        let delay = Duration::from_millis(300);
        let service = service().with_reasoning_backend(Arc::new(SlowBackend {
            delay,
            roster: vec!["alice", "bob", "carol"],
        }));
        let request = TurnRequest::new("c-1", roster(), vec![Message::user("go")]);
        let other = TurnRequest::new("c-2", roster(), vec![Message::user("go")]);

        let started = tokio::time::Instant::now();
        let timed = |request: &TurnRequest| {
            let service = &service;
            let request = request.clone();
            async move {
                let decision = service.determine_speaker(&request).await;
                (decision, started.elapsed())
            }
        };
        let ((first, first_elapsed), (second, second_elapsed), (independent, other_elapsed)) =
            tokio::join!(timed(&request), timed(&request), timed(&other));

        // The later decision saw the earlier one as the current speaker.
        let mut speakers = vec![
            first.unwrap().unwrap().persona_id,
            second.unwrap().unwrap().persona_id,
        ];
        speakers.sort();
        assert_eq!(speakers, vec![PersonaId::new("alice"), PersonaId::new("bob")]);

        let state = service.state(&ConversationId::new("c-1")).await.unwrap();
        assert_eq!(state.total_decisions, 2);
        assert_eq!(state.last_speaker, Some(PersonaId::new("bob")));
        assert!(first_elapsed.max(second_elapsed) >= delay * 2);

        // The other conversation finished after one backend round trip.
        assert_eq!(
            independent.unwrap().unwrap().persona_id,
            PersonaId::new("alice")
        );
        assert!(other_elapsed < delay * 2);
    }

    // ==================== Lifecycle ====================

    #[tokio::test]
    async fn test_lifecycle() {
        let service = service();
        let c1 = ConversationId::new("c-1");
        let c2 = ConversationId::new("c-2");

        assert_eq!(
            service.state(&c1).await,
            Err(OrchestrationError::UnknownConversation(c1.clone()))
        );
        assert!(service.attach(&c1));
        assert!(!service.attach(&c1));
        assert_eq!(service.state(&c1).await.unwrap().total_decisions, 0);

        assert!(service.detach(&c1).is_ok());
        assert!(service.detach(&c1).is_err());

        service.attach(&c1);
        service.attach(&c2);
        assert!(service.reset(&c1));
        assert!(!service.reset(&c1));
        assert_eq!(service.reset_all(), 1);
        assert_eq!(service.attached_count(), 0);
    }
}

//! Delegated intelligent path.
//!
//! Renders the turn prompt, asks the reasoning backend under a hard
//! deadline, validates the structured answer and, on any failure, hands the
//! decision to the participation-aware fallback. There is no retry: one
//! backend call per decision at most.

use crate::config::ReasoningParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::reasoning_backend::{BackendError, ReasoningBackend, ReasoningRequest};
use chorus_domain::conversation::recent_window;
use chorus_domain::orchestration::selection::ScoredPersona;
use chorus_domain::orchestration::{
    AnswerError, ParticipationStats, parse_delegated_answer, select_fallback,
};
use chorus_domain::{
    ConversationId, DecisionSource, Message, ModePolicy, Persona, PersonaId, TurnDecision,
    TurnFactors, TurnPromptContext, TurnPromptTemplate,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a delegated answer was not used.
///
/// Never surfaced to callers; every variant resolves through the fallback.
#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("reasoning backend failed: {0}")]
    Backend(#[from] BackendError),

    #[error("reasoning backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("unparseable answer: {0}")]
    Parse(String),

    #[error("answer names a persona outside the roster: {0}")]
    UnknownPersona(PersonaId),

    #[error("{field} = {value} is outside [0, 1]")]
    OutOfRange { field: &'static str, value: f64 },
}

impl DelegationError {
    pub fn kind(&self) -> &'static str {
        match self {
            DelegationError::Backend(_) => "backend",
            DelegationError::Timeout(_) => "timeout",
            DelegationError::Parse(_) => "parse",
            DelegationError::UnknownPersona(_) => "unknown_persona",
            DelegationError::OutOfRange { .. } => "out_of_range",
        }
    }
}

impl From<AnswerError> for DelegationError {
    fn from(error: AnswerError) -> Self {
        match error {
            AnswerError::OutOfRange { field, value } => DelegationError::OutOfRange { field, value },
            other => DelegationError::Parse(other.to_string()),
        }
    }
}

/// Inputs of one delegated decision.
pub struct DecisionContext<'a> {
    pub conversation_id: &'a ConversationId,
    /// Active roster, in roster order.
    pub personas: &'a [Persona],
    pub messages: &'a [Message],
    pub stats: &'a ParticipationStats,
    /// Local scores of `personas`, used for fallback decisions.
    pub scored: &'a [ScoredPersona<'a>],
    pub current_speaker: Option<&'a PersonaId>,
    pub policy: &'a ModePolicy,
}

/// Adapter between the orchestration service and a reasoning backend.
pub struct ReasoningAdapter {
    backend: Arc<dyn ReasoningBackend>,
    params: ReasoningParams,
    logger: Arc<dyn ConversationLogger>,
}

impl ReasoningAdapter {
    pub fn new(
        backend: Arc<dyn ReasoningBackend>,
        params: ReasoningParams,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            backend,
            params,
            logger,
        }
    }

    /// Decide the next speaker, falling back on any delegation failure.
    ///
    /// Returns `None` only for an empty roster.
    pub async fn decide(&self, ctx: &DecisionContext<'_>) -> Option<TurnDecision> {
        match self.delegate(ctx).await {
            Ok(decision) => {
                debug!(
                    "Delegated decision for {}: {}",
                    ctx.conversation_id, decision.persona_id
                );
                Some(decision)
            }
            Err(error) => {
                let decision = fallback_decision(ctx, &error)?;
                warn!(
                    "Delegated decision for {} failed ({}), falling back to {}",
                    ctx.conversation_id, error, decision.persona_id
                );
                self.logger.log(ConversationEvent::delegation_fallback(
                    ctx.conversation_id,
                    error.kind(),
                    &error.to_string(),
                    &decision.persona_id,
                ));
                Some(decision)
            }
        }
    }

    async fn delegate(&self, ctx: &DecisionContext<'_>) -> Result<TurnDecision, DelegationError> {
        let request = self.build_request(ctx);

        let raw = tokio::time::timeout(self.params.timeout, self.backend.invoke(&request))
            .await
            .map_err(|_| DelegationError::Timeout(self.params.timeout))??;

        let answer = parse_delegated_answer(&raw)?;
        if !ctx.personas.iter().any(|p| p.id == answer.next_persona_id) {
            return Err(DelegationError::UnknownPersona(answer.next_persona_id));
        }

        Ok(TurnDecision::new(
            answer.next_persona_id,
            answer.reasoning,
            answer.priority_score,
            answer.factors,
            DecisionSource::Delegated,
        ))
    }

    fn build_request(&self, ctx: &DecisionContext<'_>) -> ReasoningRequest {
        let prompt_ctx = TurnPromptContext {
            personas: ctx.personas,
            stats: ctx.stats,
            recent_messages: recent_window(ctx.messages, self.params.context_messages),
            current_speaker: ctx.current_speaker,
            policy: ctx.policy,
        };

        ReasoningRequest {
            conversation_id: ctx.conversation_id.clone(),
            system_prompt: TurnPromptTemplate::system().to_string(),
            user_prompt: TurnPromptTemplate::decision_prompt(&prompt_ctx),
            response_schema: TurnPromptTemplate::response_schema(),
        }
    }
}

fn fallback_decision(ctx: &DecisionContext<'_>, error: &DelegationError) -> Option<TurnDecision> {
    let available: Vec<PersonaId> = ctx.personas.iter().map(|p| p.id.clone()).collect();
    let chosen = select_fallback(ctx.stats, ctx.current_speaker, &available, ctx.policy)?;

    let (factors, score) = ctx
        .scored
        .iter()
        .find(|s| &s.persona.id == chosen)
        .map(|s| (s.factors, s.score))
        .unwrap_or((TurnFactors::default(), 0.0));

    Some(TurnDecision::new(
        chosen.clone(),
        format!(
            "Fallback for {} after {} failure: least recent and least heard speaker",
            ctx.policy.conversation_type,
            error.kind()
        ),
        score,
        factors,
        DecisionSource::Fallback,
    ))
}

//! Conversation source port
//!
//! The host owns conversations, rosters and message logs. The auto-run loop
//! re-reads a fresh [`ConversationSnapshot`] before every decision so that
//! settings changed mid-run (mode, speed, roster) take effect on the next
//! turn.

use async_trait::async_trait;
use chorus_domain::{
    ConversationId, ConversationMode, ConversationType, Message, PacingSpeed, Persona,
    SelectionStrategy, UserId,
};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Authoritative view of one conversation at a point in time.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    /// Owner of the conversation, charged by the budget oracle.
    pub user_id: UserId,
    pub personas: Vec<Persona>,
    /// Full log, oldest first.
    pub messages: Vec<Message>,
    pub mode: ConversationMode,
    pub conversation_type: ConversationType,
    /// `None` uses the engine's default strategy.
    pub strategy: Option<SelectionStrategy>,
    /// `None` uses the engine's default speed.
    pub speed: Option<PacingSpeed>,
    /// `false` once the host closed the conversation.
    pub is_active: bool,
}

impl ConversationSnapshot {
    /// An active, automatic discussion with default strategy and speed.
    pub fn new(user_id: impl Into<UserId>, personas: Vec<Persona>, messages: Vec<Message>) -> Self {
        Self {
            user_id: user_id.into(),
            personas,
            messages,
            mode: ConversationMode::Auto,
            conversation_type: ConversationType::default(),
            strategy: None,
            speed: None,
            is_active: true,
        }
    }
}

#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Load the current state of the conversation.
    async fn snapshot(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationSnapshot, SourceError>;
}

//! Response generator port
//!
//! The collaborator that actually produces (and persists) the chosen
//! persona's message. Its failures stop the auto-run loop and are never
//! retried.

use async_trait::async_trait;
use chorus_domain::{ConversationId, Message, PersonaId};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Persona not available: {0}")]
    PersonaUnavailable(PersonaId),

    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Persisting the message failed: {0}")]
    PersistFailed(String),
}

/// Incremental output forwarded to a caller-provided sink.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// A piece of the response text.
    Delta(String),
    /// Full text once generation finished.
    Completed(String),
    Error(String),
}

/// Produces the next message for a persona
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate, persist and return the persona's next message.
    ///
    /// When `sink` is given, implementations may stream chunks into it while
    /// generating; a dropped receiver must not fail the generation.
    async fn generate(
        &self,
        conversation_id: &ConversationId,
        persona_id: &PersonaId,
        sink: Option<mpsc::Sender<StreamChunk>>,
    ) -> Result<Message, GenerationError>;
}

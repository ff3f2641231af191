//! Reasoning backend port
//!
//! Defines the interface for delegating a turn decision to a language model.
//! The engine owns the prompt and the answer validation; the backend only
//! moves text.

use async_trait::async_trait;
use chorus_domain::ConversationId;
use thiserror::Error;

/// Errors that can occur while invoking a reasoning backend
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A fully rendered turn-decision request.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub conversation_id: ConversationId,
    pub system_prompt: String,
    pub user_prompt: String,
    /// JSON schema the answer must satisfy.
    pub response_schema: serde_json::Value,
}

/// Backend that answers turn-decision prompts
///
/// Implementations live outside the engine (LLM clients, rule engines,
/// test doubles). The caller enforces its own deadline, so implementations
/// need not time out on their own.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Send the request and return the raw answer text.
    async fn invoke(&self, request: &ReasoningRequest) -> Result<String, BackendError>;
}

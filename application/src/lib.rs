//! Application layer for chorus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AutoRunParams, EngineConfig, ReasoningParams};
pub use ports::{
    auto_run_observer::{AutoRunObserver, NoAutoRunObserver},
    budget_oracle::{BudgetError, BudgetOracle, BudgetVerdict, UnlimitedBudget},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_source::{ConversationSnapshot, ConversationSource, SourceError},
    reasoning_backend::{BackendError, ReasoningBackend, ReasoningRequest},
    response_generator::{GenerationError, ResponseGenerator, StreamChunk},
};
pub use use_cases::auto_run::{AutoRunHandle, AutoRunReport, AutoRunner};
pub use use_cases::determine_speaker::{OrchestrationError, OrchestrationService, TurnRequest};
pub use use_cases::orchestration_state::ConversationOrchestrationState;
pub use use_cases::reasoning_adapter::{DecisionContext, DelegationError, ReasoningAdapter};

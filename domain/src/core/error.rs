//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No active personas in the roster")]
    NoPersonas,

    #[error("Persona not in roster: {0}")]
    UnknownPersona(String),

    #[error("Invalid conversation mode: {0}")]
    InvalidMode(String),

    #[error("Invalid conversation type: {0}")]
    InvalidConversationType(String),

    #[error("Invalid selection strategy: {0}")]
    InvalidStrategy(String),

    #[error("Invalid experience level: {0}")]
    InvalidExperienceLevel(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl DomainError {
    /// Whether this error means no decision can be made at all.
    pub fn is_empty_roster(&self) -> bool {
        matches!(self, DomainError::NoPersonas)
    }
}

//! Conversation mode and conversation type.
//!
//! Two orthogonal axes:
//! - [`ConversationMode`] - who triggers the next AI message (user or engine)
//! - [`ConversationType`] - what kind of conversation it is, which shapes
//!   the reasoning policy and the fallback tie-break rule

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who decides the next speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    /// The user picks the responding persona; the engine makes no decision.
    #[default]
    Manual,
    /// The engine decides and triggers each subsequent AI message.
    Auto,
}

impl ConversationMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, ConversationMode::Auto)
    }
}

impl fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationMode::Manual => write!(f, "manual"),
            ConversationMode::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for ConversationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(ConversationMode::Manual),
            "auto" | "automatic" => Ok(ConversationMode::Auto),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

/// Kind of conversation being held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    Debate,
    Ideation,
    Refinement,
    Planning,
    #[default]
    Discussion,
}

impl ConversationType {
    pub const ALL: [ConversationType; 5] = [
        ConversationType::Debate,
        ConversationType::Ideation,
        ConversationType::Refinement,
        ConversationType::Planning,
        ConversationType::Discussion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::Debate => "debate",
            ConversationType::Ideation => "ideation",
            ConversationType::Refinement => "refinement",
            ConversationType::Planning => "planning",
            ConversationType::Discussion => "discussion",
        }
    }
}

impl fmt::Display for ConversationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConversationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| DomainError::InvalidConversationType(s.to_string()))
    }
}

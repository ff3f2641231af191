//! Conversation log entities

use crate::core::error::DomainError;
use crate::core::ids::PersonaId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// An append-only record in a conversation log (Entity)
///
/// The host keeps messages ordered by `created_at`; the engine relies on
/// slice order and never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Authoring persona, set for assistant messages.
    #[serde(default)]
    pub persona_id: Option<PersonaId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            persona_id: None,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            persona_id: None,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(persona_id: impl Into<PersonaId>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            persona_id: Some(persona_id.into()),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// The persona that authored this message, if it is an assistant turn.
    pub fn speaker(&self) -> Option<&PersonaId> {
        match self.role {
            Role::Assistant => self.persona_id.as_ref(),
            _ => None,
        }
    }
}

/// Persona of the newest assistant message in the log.
pub fn last_assistant_speaker(messages: &[Message]) -> Option<&PersonaId> {
    messages.iter().rev().find_map(Message::speaker)
}

/// The trailing `n` messages of a log (all of them when shorter).
pub fn recent_window(messages: &[Message], n: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_only_for_assistant() {
        assert_eq!(Message::user("hi").speaker(), None);
        let m = Message::assistant("p-1", "hello");
        assert_eq!(m.speaker().map(|p| p.as_str()), Some("p-1"));
    }

    #[test]
    fn test_last_assistant_speaker_skips_user_messages() {
        let log = vec![
            Message::assistant("p-1", "a"),
            Message::assistant("p-2", "b"),
            Message::user("c"),
        ];
        assert_eq!(
            last_assistant_speaker(&log).map(|p| p.as_str()),
            Some("p-2")
        );
        assert_eq!(last_assistant_speaker(&[]), None);
    }

    #[test]
    fn test_recent_window() {
        let log: Vec<Message> = (0..7).map(|i| Message::user(i.to_string())).collect();
        let window = recent_window(&log, 5);
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].content, "2");
        assert_eq!(recent_window(&log[..2], 5).len(), 2);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!("USER".parse::<Role>().ok(), Some(Role::User));
        assert!("bot".parse::<Role>().is_err());
    }
}

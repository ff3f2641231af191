//! Domain layer for chorus
//!
//! This crate contains the entities, value objects and pure turn-selection
//! logic. It has no dependencies on async runtimes, I/O or configuration
//! loading.
//!
//! # Core Concepts
//!
//! ## Personas and conversations
//!
//! A conversation is an ordered log of [`Message`]s exchanged between a user
//! and a roster of [`Persona`]s. The host owns the log; the engine only reads
//! it.
//!
//! ## Turn decisions
//!
//! Every persona is scored on four factors (relevance, expertise,
//! participation balance, conversation flow). A [`SelectionStrategy`] picks
//! the next speaker from those scores, and a [`TurnDecision`] records who was
//! chosen, why, and which path produced the answer.

pub mod config;
pub mod conversation;
pub mod core;
pub mod orchestration;
pub mod persona;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use conversation::{ConversationMode, ConversationType, Message, PacingSpeed, Role};
pub use core::{
    error::DomainError,
    ids::{ConversationId, PersonaId, UserId},
};
pub use orchestration::{
    DecisionSource, FactorWeights, ModePolicy, ParticipationStat, ParticipationStats,
    ScoringConfig, SelectionStrategy, StopReason, TurnDecision, TurnFactors,
};
pub use persona::{ExperienceLevel, Persona, PersonaProfile, PersonaUsage};
pub use prompt::{TurnPromptContext, TurnPromptTemplate};

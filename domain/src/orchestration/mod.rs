//! Turn orchestration domain
//!
//! Pure building blocks for deciding who speaks next: participation stats,
//! factor scoring, mode policies and the speaker selectors. Nothing in here
//! performs I/O; the application layer composes these with its ports.

pub mod config;
pub mod decision;
pub mod delegation;
pub mod participation;
pub mod policy;
pub mod roles;
pub mod scoring;
pub mod selection;
pub mod stop;
pub mod strategy;

pub use config::{FactorWeights, ScoringConfig};
pub use decision::{DecisionSource, TurnDecision, TurnFactors};
pub use delegation::{AnswerError, DelegatedAnswer, parse_delegated_answer};
pub use participation::{
    NEVER_SPOKEN, ParticipationStat, ParticipationStats, compute_stats, stat_for,
};
pub use policy::{FallbackRule, ModePolicy};
pub use roles::RoleCategory;
pub use selection::{
    ScoredPersona, score_roster, select_fallback, select_random, select_round_robin,
    select_weighted,
};
pub use stop::StopReason;
pub use strategy::SelectionStrategy;

//! Factor scoring.
//!
//! Each persona gets four independent scores in [0, 1]:
//!
//! | Factor | Question it answers |
//! |--------|---------------------|
//! | relevance | Is the last message about this persona or its topics? |
//! | expertise | How qualified is the persona for what was said? |
//! | participation balance | Has the persona been under- or over-heard? |
//! | conversation flow | Would this persona speaking now feel natural? |
//!
//! Every factor is a pure function of its inputs, so they can be tested in
//! isolation and computed in any order.

use crate::conversation::Message;
use crate::core::ids::PersonaId;
use crate::orchestration::config::ScoringConfig;
use crate::orchestration::decision::TurnFactors;
use crate::orchestration::participation::{ParticipationStats, stat_for};
use crate::orchestration::roles::{contains_term, role_matches_content};
use crate::persona::{ExperienceLevel, Persona};

const RELEVANCE_BASE: f64 = 0.5;
const NAME_MENTION_BONUS: f64 = 0.3;
const EXPERTISE_KEYWORD_BONUS: f64 = 0.2;
const ROLE_TOPIC_BONUS: f64 = 0.2;

const BALANCE_DOMINANT: f64 = 0.3;
const BALANCE_NEUTRAL: f64 = 0.6;
const BALANCE_QUIET: f64 = 0.9;

const FLOW_JUST_SPOKE: f64 = 0.1;
const FLOW_NEUTRAL: f64 = 0.5;
const FLOW_BREAKS_MONOPOLY: f64 = 0.9;

/// Score one persona on all four factors.
pub fn score(
    persona: &Persona,
    last_message: Option<&Message>,
    recent_messages: &[Message],
    stats: &ParticipationStats,
    all_personas: &[Persona],
    config: &ScoringConfig,
) -> TurnFactors {
    TurnFactors {
        relevance: relevance(persona, last_message),
        expertise: expertise(persona, last_message),
        participation_balance: participation_balance(persona, stats, all_personas, config),
        conversation_flow: conversation_flow(persona, recent_messages, config),
    }
}

/// Relevance of the persona to the last message.
///
/// Base 0.5; +0.3 when the persona is named, +0.2 when one of its declared
/// expertise keywords appears, +0.2 when its role category matches the topic.
pub fn relevance(persona: &Persona, last_message: Option<&Message>) -> f64 {
    let Some(message) = last_message else {
        return RELEVANCE_BASE;
    };
    let content = message.content.to_lowercase();
    let mut score = RELEVANCE_BASE;

    let name = persona.name.trim().to_lowercase();
    if contains_term(&content, &name) {
        score += NAME_MENTION_BONUS;
    }
    if persona
        .profile
        .expertise
        .iter()
        .any(|keyword| contains_term(&content, keyword))
    {
        score += EXPERTISE_KEYWORD_BONUS;
    }
    if role_matches_content(&persona.role, &content) {
        score += ROLE_TOPIC_BONUS;
    }

    score.min(1.0)
}

/// Expertise of the persona for the last message.
///
/// Base from the declared experience level, +0.2 when the role category
/// matches the topic.
pub fn expertise(persona: &Persona, last_message: Option<&Message>) -> f64 {
    let base = persona
        .profile
        .experience_level
        .map(|level| level.base_expertise())
        .unwrap_or(ExperienceLevel::UNKNOWN_BASE);

    let topical = last_message.is_some_and(|m| role_matches_content(&persona.role, &m.content));
    let bonus = if topical { ROLE_TOPIC_BONUS } else { 0.0 };

    (base + bonus).min(1.0)
}

/// How much the persona should be favoured to even out participation.
pub fn participation_balance(
    persona: &Persona,
    stats: &ParticipationStats,
    all_personas: &[Persona],
    config: &ScoringConfig,
) -> f64 {
    let active: Vec<&Persona> = all_personas.iter().filter(|p| p.is_active).collect();
    if active.is_empty() {
        return BALANCE_NEUTRAL;
    }
    let average = active
        .iter()
        .map(|p| stat_for(stats, &p.id).message_count as f64)
        .sum::<f64>()
        / active.len() as f64;

    let count = stat_for(stats, &persona.id).message_count as f64;
    if count > config.dominant_ratio * average {
        BALANCE_DOMINANT
    } else if count < config.quiet_ratio * average {
        BALANCE_QUIET
    } else {
        BALANCE_NEUTRAL
    }
}

/// Natural turn-taking score.
///
/// `recent_messages` is the trailing lookback window of the log. The persona
/// that spoke last is pushed down; anyone who can break a run of
/// `monopoly_run` identical speakers is pushed up.
pub fn conversation_flow(
    persona: &Persona,
    recent_messages: &[Message],
    config: &ScoringConfig,
) -> f64 {
    let speakers: Vec<&PersonaId> = recent_messages.iter().filter_map(Message::speaker).collect();

    if speakers.last() == Some(&&persona.id) {
        return FLOW_JUST_SPOKE;
    }
    if recent_messages.len() < 2 {
        return FLOW_NEUTRAL;
    }

    let run = config.monopoly_run;
    if run > 0 && speakers.len() >= run {
        let tail = &speakers[speakers.len() - run..];
        let monopolist = tail[0];
        if tail.iter().all(|s| *s == monopolist) && *monopolist != persona.id {
            return FLOW_BREAKS_MONOPOLY;
        }
    }

    FLOW_NEUTRAL
}

//! Speaker selectors.
//!
//! - [`select_round_robin`] / [`select_random`] - deterministic strategies
//! - [`select_weighted`] - local intelligent path over [`score_roster`]
//! - [`select_fallback`] - participation-aware choice used when a
//!   delegated decision is unavailable or invalid
//!
//! All selectors are pure and never fail on a non-empty roster. With more
//! than one candidate, the current speaker is never chosen by the round-robin,
//! random and fallback selectors.

use crate::conversation::{Message, recent_window};
use crate::core::ids::PersonaId;
use crate::orchestration::config::ScoringConfig;
use crate::orchestration::decision::TurnFactors;
use crate::orchestration::participation::{ParticipationStats, stat_for};
use crate::orchestration::policy::{FallbackRule, ModePolicy};
use crate::orchestration::scoring;
use crate::persona::Persona;
use rand::Rng;
use rand::seq::SliceRandom;

/// Next persona in roster order after the current speaker.
///
/// Starts from the head of the roster when there is no current speaker or
/// the current speaker is no longer in the roster.
pub fn select_round_robin<'a>(
    personas: &'a [Persona],
    current: Option<&PersonaId>,
) -> Option<&'a Persona> {
    let position = current.and_then(|id| personas.iter().position(|p| &p.id == id));
    match position {
        Some(index) => personas.get((index + 1) % personas.len()),
        None => personas.first(),
    }
}

/// Uniformly random persona, excluding the current speaker when possible.
pub fn select_random<'a, R: Rng + ?Sized>(
    personas: &'a [Persona],
    current: Option<&PersonaId>,
    rng: &mut R,
) -> Option<&'a Persona> {
    let candidates: Vec<&Persona> = personas
        .iter()
        .filter(|p| personas.len() == 1 || Some(&p.id) != current)
        .collect();
    if candidates.is_empty() {
        return personas.first();
    }
    candidates.choose(rng).copied()
}

/// A persona with its factors and weighted score.
#[derive(Debug, Clone)]
pub struct ScoredPersona<'a> {
    pub persona: &'a Persona,
    pub factors: TurnFactors,
    pub score: f64,
}

/// Score every persona in roster order.
pub fn score_roster<'a>(
    personas: &'a [Persona],
    messages: &[Message],
    stats: &ParticipationStats,
    config: &ScoringConfig,
) -> Vec<ScoredPersona<'a>> {
    let last_message = messages.last();
    let recent = recent_window(messages, config.flow_lookback);

    personas
        .iter()
        .map(|persona| {
            let factors = scoring::score(persona, last_message, recent, stats, personas, config);
            ScoredPersona {
                persona,
                score: factors.weighted(&config.weights),
                factors,
            }
        })
        .collect()
}

/// Highest weighted score; the first persona in roster order wins ties.
pub fn select_weighted<'s, 'a>(scored: &'s [ScoredPersona<'a>]) -> Option<&'s ScoredPersona<'a>> {
    let mut best: Option<&ScoredPersona<'a>> = None;
    for candidate in scored {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

/// Deterministic, participation-aware fallback.
///
/// Excludes the current speaker unless it is the only candidate, then
/// applies the policy's [`FallbackRule`]. Ties go to the earliest entry of
/// `available`. Returns `None` only when `available` is empty.
pub fn select_fallback<'a>(
    stats: &ParticipationStats,
    current: Option<&PersonaId>,
    available: &'a [PersonaId],
    policy: &ModePolicy,
) -> Option<&'a PersonaId> {
    let mut candidates: Vec<&PersonaId> = available
        .iter()
        .filter(|id| available.len() == 1 || Some(*id) != current)
        .collect();
    if candidates.is_empty() {
        candidates = available.iter().collect();
    }

    if let FallbackRule::ParticipationGapThenRecency { min_gap } = policy.fallback_rule {
        let quietest = candidates
            .iter()
            .map(|id| stat_for(stats, id).participation_rate)
            .fold(f64::INFINITY, f64::min);
        // The quietest candidate always qualifies, even with a zero gap.
        candidates.retain(|id| {
            let gap = stat_for(stats, id).participation_rate - quietest;
            gap <= 0.0 || gap < min_gap
        });
    }

    let mut best: Option<(&PersonaId, usize)> = None;
    for id in candidates {
        let offset = stat_for(stats, id).last_spoken_offset;
        if best.is_none_or(|(_, best_offset)| offset > best_offset) {
            best = Some((id, offset));
        }
    }
    best.map(|(id, _)| id)
}

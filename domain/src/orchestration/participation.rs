//! Participation bookkeeping.
//!
//! Stats are derived from the full message log on every decision and are
//! never patched incrementally, so they cannot drift from the log.

use crate::conversation::Message;
use crate::core::ids::PersonaId;
use crate::persona::Persona;
use serde::Serialize;
use std::collections::HashMap;

/// `last_spoken_offset` of a persona that has never spoken.
pub const NEVER_SPOKEN: usize = usize::MAX;

/// How much and how recently one persona has spoken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticipationStat {
    /// Assistant messages authored by the persona over the whole log.
    pub message_count: usize,
    /// Messages appended since the persona last spoke (0 = it spoke last).
    pub last_spoken_offset: usize,
    /// Share of all roster-authored assistant messages, in percent (0–100).
    pub participation_rate: f64,
}

impl ParticipationStat {
    /// Stat of a persona with no messages in the log.
    pub fn silent() -> Self {
        Self {
            message_count: 0,
            last_spoken_offset: NEVER_SPOKEN,
            participation_rate: 0.0,
        }
    }

    pub fn has_spoken(&self) -> bool {
        self.last_spoken_offset != NEVER_SPOKEN
    }
}

pub type ParticipationStats = HashMap<PersonaId, ParticipationStat>;

/// Compute participation stats for every active persona in `personas`.
///
/// Messages authored by personas outside the active roster still count
/// towards offsets (they are part of the log) but not towards any count.
pub fn compute_stats(messages: &[Message], personas: &[Persona]) -> ParticipationStats {
    let mut counts: HashMap<&PersonaId, (usize, Option<usize>)> = personas
        .iter()
        .filter(|p| p.is_active)
        .map(|p| (&p.id, (0, None)))
        .collect();

    for (index, message) in messages.iter().enumerate() {
        if let Some(speaker) = message.speaker()
            && let Some((count, last_index)) = counts.get_mut(speaker)
        {
            *count += 1;
            *last_index = Some(index);
        }
    }

    let total: usize = counts.values().map(|(count, _)| count).sum();

    counts
        .into_iter()
        .map(|(id, (count, last_index))| {
            let last_spoken_offset = match last_index {
                Some(index) => messages.len() - 1 - index,
                None => NEVER_SPOKEN,
            };
            let participation_rate = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            (
                id.clone(),
                ParticipationStat {
                    message_count: count,
                    last_spoken_offset,
                    participation_rate,
                },
            )
        })
        .collect()
}

/// Stat for `id`, treating a missing entry as a persona that never spoke.
pub fn stat_for(stats: &ParticipationStats, id: &PersonaId) -> ParticipationStat {
    stats.get(id).copied().unwrap_or_else(ParticipationStat::silent)
}

/// Mean `message_count` across all tracked personas (0.0 for an empty map).
pub fn average_message_count(stats: &ParticipationStats) -> f64 {
    if stats.is_empty() {
        return 0.0;
    }
    stats.values().map(|s| s.message_count as f64).sum::<f64>() / stats.len() as f64
}

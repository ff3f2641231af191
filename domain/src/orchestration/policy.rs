//! Mode policy: how each conversation type shapes speaker selection.
//!
//! | Type | Reasoning focus | Fallback rule |
//! |------|-----------------|---------------|
//! | debate | opposing viewpoints, rebuttals | participation gap, then recency |
//! | ideation | many voices, building on ideas | participation gap, then recency |
//! | refinement | depth from the most qualified | recency |
//! | planning | sequencing, ownership | recency |
//! | discussion | natural turn-taking | recency |

use crate::conversation::ConversationType;

/// How the fallback selector orders candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackRule {
    /// Prefer personas whose participation rate is within `min_gap`
    /// percentage points of the quietest persona; recency decides inside
    /// that group.
    ParticipationGapThenRecency { min_gap: f64 },
    /// Longest-silent persona first.
    Recency,
}

/// Policy for one conversation type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePolicy {
    pub conversation_type: ConversationType,
    /// Guidance handed to the reasoning backend.
    pub guidance: &'static str,
    pub fallback_rule: FallbackRule,
}

impl ModePolicy {
    /// Policy for `conversation_type` with the given participation gap.
    pub fn for_type(conversation_type: ConversationType, participation_gap: f64) -> Self {
        let fallback_rule = match conversation_type {
            ConversationType::Debate | ConversationType::Ideation => {
                FallbackRule::ParticipationGapThenRecency {
                    min_gap: participation_gap,
                }
            }
            ConversationType::Refinement
            | ConversationType::Planning
            | ConversationType::Discussion => FallbackRule::Recency,
        };

        Self {
            conversation_type,
            guidance: guidance(conversation_type),
            fallback_rule,
        }
    }
}

fn guidance(conversation_type: ConversationType) -> &'static str {
    match conversation_type {
        ConversationType::Debate => {
            "This is a debate. Prefer a participant who holds a different position from the last \
speaker and can rebut or challenge it directly. Keep both sides heard roughly equally; \
a participant whose share of the debate lags behind should be favoured."
        }
        ConversationType::Ideation => {
            "This is an ideation session. Favour breadth: pick a participant who has contributed \
fewer ideas so far or who brings a perspective not yet represented. Building on the \
previous idea is welcome, repeating it is not."
        }
        ConversationType::Refinement => {
            "This is a refinement session. Depth matters more than breadth: pick the participant \
best qualified to improve the current proposal, as long as they did not just speak."
        }
        ConversationType::Planning => {
            "This is a planning session. Pick the participant who owns the next open question \
(scope, sequencing, cost, risk) and who has not spoken for the longest time among those \
able to answer it."
        }
        ConversationType::Discussion => {
            "This is an open discussion. Aim for natural turn-taking: respond to whoever was \
addressed, otherwise pick the participant with the most relevant expertise who has been \
quiet for a while."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_and_ideation_weight_participation_gap() {
        for t in [ConversationType::Debate, ConversationType::Ideation] {
            assert_eq!(
                ModePolicy::for_type(t, 5.0).fallback_rule,
                FallbackRule::ParticipationGapThenRecency { min_gap: 5.0 }
            );
        }
    }

    #[test]
    fn test_other_types_use_recency() {
        for t in [
            ConversationType::Refinement,
            ConversationType::Planning,
            ConversationType::Discussion,
        ] {
            assert_eq!(ModePolicy::for_type(t, 5.0).fallback_rule, FallbackRule::Recency);
        }
    }

    #[test]
    fn test_every_type_has_guidance() {
        for t in ConversationType::ALL {
            let policy = ModePolicy::for_type(t, 5.0);
            assert!(policy.guidance.contains(t.as_str()));
        }
    }
}

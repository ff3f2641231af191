//! Turn decision value objects

use crate::core::ids::PersonaId;
use crate::orchestration::config::FactorWeights;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four scoring factors of one persona, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TurnFactors {
    pub relevance: f64,
    pub expertise: f64,
    pub participation_balance: f64,
    pub conversation_flow: f64,
}

impl TurnFactors {
    /// Weighted combination, clamped to [0, 1].
    pub fn weighted(&self, weights: &FactorWeights) -> f64 {
        let score = self.relevance * weights.relevance
            + self.expertise * weights.expertise
            + self.participation_balance * weights.participation_balance
            + self.conversation_flow * weights.conversation_flow;
        score.clamp(0.0, 1.0)
    }

    pub fn is_in_unit_range(&self) -> bool {
        [
            self.relevance,
            self.expertise,
            self.participation_balance,
            self.conversation_flow,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }
}

/// Which path produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    RoundRobin,
    Random,
    /// Local weighted scoring (no reasoning backend configured).
    Weighted,
    /// Accepted answer from the reasoning backend.
    Delegated,
    /// Deterministic fallback after the reasoning backend failed.
    Fallback,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::RoundRobin => "round_robin",
            DecisionSource::Random => "random",
            DecisionSource::Weighted => "weighted",
            DecisionSource::Delegated => "delegated",
            DecisionSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who speaks next, and why (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnDecision {
    pub persona_id: PersonaId,
    pub reasoning: String,
    /// Urgency of the turn in [0, 1].
    pub priority_score: f64,
    pub factors: TurnFactors,
    pub source: DecisionSource,
}

impl TurnDecision {
    pub fn new(
        persona_id: PersonaId,
        reasoning: impl Into<String>,
        priority_score: f64,
        factors: TurnFactors,
        source: DecisionSource,
    ) -> Self {
        Self {
            persona_id,
            reasoning: reasoning.into(),
            priority_score: priority_score.clamp(0.0, 1.0),
            factors,
            source,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DecisionSource::Fallback)
    }

    /// Weighted score of the decision's factors.
    pub fn combined_score(&self, weights: &FactorWeights) -> f64 {
        self.factors.weighted(weights)
    }
}

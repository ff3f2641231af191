//! Scoring configuration: weights and thresholds of the turn-selection model.
//!
//! All values default to the documented constants; hosts may tune them
//! through the `[scoring]` section of the config file.

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Weights used to combine the four turn factors into one score.
///
/// Must sum to 1.0 so that the combined score stays within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub relevance: f64,
    pub expertise: f64,
    pub participation_balance: f64,
    pub conversation_flow: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            relevance: 0.4,
            expertise: 0.3,
            participation_balance: 0.2,
            conversation_flow: 0.1,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.relevance + self.expertise + self.participation_balance + self.conversation_flow
    }
}

/// Tunable parameters of the factor scorer and fallback selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    /// A persona above `dominant_ratio × average` message count is dominating.
    pub dominant_ratio: f64,
    /// A persona below `quiet_ratio × average` message count is under-heard.
    pub quiet_ratio: f64,
    /// Number of trailing messages inspected for conversation flow.
    pub flow_lookback: usize,
    /// Consecutive assistant turns by one persona that count as a monopoly.
    pub monopoly_run: usize,
    /// Participation-rate gap (percentage points) the fallback treats as significant.
    pub fallback_participation_gap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            dominant_ratio: 1.5,
            quiet_ratio: 0.5,
            flow_lookback: 5,
            monopoly_run: 3,
            fallback_participation_gap: 5.0,
        }
    }
}

impl ScoringConfig {
    const WEIGHT_TOLERANCE: f64 = 1e-6;

    // ==================== Builder Methods ====================

    pub fn with_weights(mut self, weights: FactorWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_flow_lookback(mut self, lookback: usize) -> Self {
        self.flow_lookback = lookback;
        self
    }

    pub fn with_fallback_participation_gap(mut self, gap: f64) -> Self {
        self.fallback_participation_gap = gap;
        self
    }

    // ==================== Validation ====================

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let w = &self.weights;

        for (field, value) in [
            ("scoring.weights.relevance", w.relevance),
            ("scoring.weights.expertise", w.expertise),
            ("scoring.weights.participation_balance", w.participation_balance),
            ("scoring.weights.conversation_flow", w.conversation_flow),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(out_of_range(field, value, "must be within [0, 1]"));
            }
        }

        let sum = w.sum();
        if (sum - 1.0).abs() > Self::WEIGHT_TOLERANCE {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::WeightsDoNotSumToOne { sum },
                format!("scoring.weights: weights sum to {:.3}, expected 1.0", sum),
            ));
        }

        if self.quiet_ratio < 0.0 || self.quiet_ratio >= self.dominant_ratio {
            issues.push(out_of_range(
                "scoring.quiet_ratio",
                self.quiet_ratio,
                "must be non-negative and below scoring.dominant_ratio",
            ));
        }

        if self.monopoly_run < 2 {
            issues.push(out_of_range(
                "scoring.monopoly_run",
                self.monopoly_run as f64,
                "must be at least 2",
            ));
        }

        if self.flow_lookback < self.monopoly_run {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "scoring.flow_lookback".to_string(),
                    value: self.flow_lookback.to_string(),
                },
                "scoring.flow_lookback is shorter than scoring.monopoly_run; monopolies are only detected when no user message interleaves",
            ));
        }

        if self.fallback_participation_gap < 0.0 {
            issues.push(out_of_range(
                "scoring.fallback_participation_gap",
                self.fallback_participation_gap,
                "must be non-negative",
            ));
        }

        issues
    }
}

fn out_of_range(field: &str, value: f64, reason: &str) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!("{}: {} {}", field, value, reason),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::Severity;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((FactorWeights::default().sum() - 1.0).abs() < 1e-9);
        assert!(ScoringConfig::default().validate().is_empty());
    }

    #[test]
    fn test_unbalanced_weights_are_an_error() {
        let config = ScoringConfig::default().with_weights(FactorWeights {
            relevance: 0.5,
            expertise: 0.5,
            participation_balance: 0.5,
            conversation_flow: 0.0,
        });
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::WeightsDoNotSumToOne { .. }
        ));
    }

    #[test]
    fn test_inverted_ratios_are_rejected() {
        let config = ScoringConfig {
            quiet_ratio: 2.0,
            ..Default::default()
        };
        let issues = config.validate();
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::OutOfRange { field, .. } if field == "scoring.quiet_ratio"
        )));
    }

    #[test]
    fn test_short_lookback_only_warns() {
        let issues = ScoringConfig::default().with_flow_lookback(2).validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_partial_toml_style_deserialize_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"weights":{"relevance":0.5,"expertise":0.2}}"#).unwrap();
        assert_eq!(config.weights.relevance, 0.5);
        assert_eq!(config.weights.participation_balance, 0.2);
        assert_eq!(config.dominant_ratio, 1.5);
    }
}

//! Engine configuration container.
//!
//! [`EngineConfig`] groups the three configuration slices. Use cases receive
//! only the slice they need; hosts build the container once (usually from a
//! config file) and hand slices to the use cases.
//!
//! | Slice | OrchestrationService | AutoRunner |
//! |-------|----------------------|------------|
//! | `ScoringConfig` | Yes | No |
//! | `ReasoningParams` | Yes | No |
//! | `AutoRunParams` | No | Yes |

use crate::config::{AutoRunParams, ReasoningParams};
use chorus_domain::ScoringConfig;
use chorus_domain::config::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    scoring: ScoringConfig,
    reasoning: ReasoningParams,
    auto_run: AutoRunParams,
}

impl EngineConfig {
    pub fn new(scoring: ScoringConfig, reasoning: ReasoningParams, auto_run: AutoRunParams) -> Self {
        Self {
            scoring,
            reasoning,
            auto_run,
        }
    }

    // ==================== Accessors ====================

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn reasoning(&self) -> &ReasoningParams {
        &self.reasoning
    }

    pub fn auto_run(&self) -> &AutoRunParams {
        &self.auto_run
    }

    // ==================== Builder Methods ====================

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_reasoning(mut self, reasoning: ReasoningParams) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn with_auto_run(mut self, auto_run: AutoRunParams) -> Self {
        self.auto_run = auto_run;
        self
    }

    // ==================== Validation ====================

    /// Validate every slice.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.scoring.validate();

        if self.reasoning.timeout.is_zero() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "reasoning.timeout_ms".to_string(),
                    value: "0".to_string(),
                },
                "reasoning.timeout_ms must be greater than zero",
            ));
        }
        if self.reasoning.context_messages == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "reasoning.context_messages".to_string(),
                    value: "0".to_string(),
                },
                "reasoning.context_messages is 0; the backend will see no history",
            ));
        }
        if self.auto_run.message_ceiling == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "auto_run.message_ceiling".to_string(),
                    value: "0".to_string(),
                },
                "auto_run.message_ceiling must be greater than zero",
            ));
        }
        if self.auto_run.estimated_turn_cost < 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "auto_run.estimated_turn_cost".to_string(),
                    value: self.auto_run.estimated_turn_cost.to_string(),
                },
                "auto_run.estimated_turn_cost must be non-negative",
            ));
        }

        issues
    }
}

//! Auto-run parameters: automatic loop control.

use chorus_domain::{PacingSpeed, SelectionStrategy};
use serde::{Deserialize, Serialize};

/// Automatic conversation loop parameters.
///
/// `default_speed` and `default_strategy` apply when the conversation
/// snapshot does not carry its own setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoRunParams {
    /// Hard cap on the number of messages in an automatic conversation.
    pub message_ceiling: usize,
    pub default_speed: PacingSpeed,
    pub default_strategy: SelectionStrategy,
    /// Cost of one turn as reported to the budget oracle.
    pub estimated_turn_cost: f64,
}

impl Default for AutoRunParams {
    fn default() -> Self {
        Self {
            message_ceiling: 100,
            default_speed: PacingSpeed::default(),
            default_strategy: SelectionStrategy::default(),
            estimated_turn_cost: 1.0,
        }
    }
}

impl AutoRunParams {
    // ==================== Builder Methods ====================

    pub fn with_message_ceiling(mut self, ceiling: usize) -> Self {
        self.message_ceiling = ceiling;
        self
    }

    pub fn with_default_speed(mut self, speed: PacingSpeed) -> Self {
        self.default_speed = speed;
        self
    }

    pub fn with_default_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_estimated_turn_cost(mut self, cost: f64) -> Self {
        self.estimated_turn_cost = cost;
        self
    }
}

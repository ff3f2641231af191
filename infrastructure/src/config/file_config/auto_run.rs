//! Automatic conversation settings from TOML (`[auto_run]` section)

use chorus_application::AutoRunParams;
use chorus_domain::{ConfigIssue, ConfigIssueCode, PacingSpeed, SelectionStrategy};
use serde::{Deserialize, Serialize};

/// Raw auto-run configuration
///
/// # Example
///
/// ```toml
/// [auto_run]
/// message_ceiling = 100
/// default_speed = 5              # 1 (slow) ..= 10 (fast)
/// default_strategy = "intelligent"   # "round-robin", "random", "intelligent"
/// estimated_turn_cost = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAutoRunConfig {
    pub message_ceiling: usize,
    pub default_speed: u8,
    pub default_strategy: String,
    pub estimated_turn_cost: f64,
}

impl Default for FileAutoRunConfig {
    fn default() -> Self {
        let params = AutoRunParams::default();
        Self {
            message_ceiling: params.message_ceiling,
            default_speed: params.default_speed.value(),
            default_strategy: params.default_strategy.as_str().to_string(),
            estimated_turn_cost: params.estimated_turn_cost,
        }
    }
}

impl FileAutoRunConfig {
    /// Parse `default_strategy`, falling back to the default with a warning.
    pub fn parse_strategy(&self) -> (SelectionStrategy, Vec<ConfigIssue>) {
        match self.default_strategy.parse::<SelectionStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let fallback = SelectionStrategy::default();
                let issue = ConfigIssue::invalid_enum(
                    "auto_run.default_strategy",
                    &self.default_strategy,
                    &SelectionStrategy::VALID_VALUES,
                    fallback.as_str(),
                );
                (fallback, vec![issue])
            }
        }
    }

    /// Parse `default_speed`; out-of-range values are clamped with a warning.
    pub fn parse_speed(&self) -> (PacingSpeed, Vec<ConfigIssue>) {
        let speed = PacingSpeed::new(self.default_speed);
        if speed.value() == self.default_speed {
            return (speed, vec![]);
        }
        let issue = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "auto_run.default_speed".to_string(),
                value: self.default_speed.to_string(),
            },
            format!(
                "auto_run.default_speed: {} is outside {}..={}, using {}",
                self.default_speed,
                PacingSpeed::MIN,
                PacingSpeed::MAX,
                speed.value()
            ),
        );
        (speed, vec![issue])
    }

    pub fn to_auto_run_params(&self) -> (AutoRunParams, Vec<ConfigIssue>) {
        let (strategy, mut issues) = self.parse_strategy();
        let (speed, speed_issues) = self.parse_speed();
        issues.extend(speed_issues);

        let params = AutoRunParams::default()
            .with_message_ceiling(self.message_ceiling)
            .with_default_speed(speed)
            .with_default_strategy(strategy)
            .with_estimated_turn_cost(self.estimated_turn_cost);
        (params, issues)
    }
}

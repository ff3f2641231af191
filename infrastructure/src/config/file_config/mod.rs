//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod auto_run;
mod logging;
mod reasoning;

pub use auto_run::FileAutoRunConfig;
pub use logging::FileLoggingConfig;
pub use reasoning::FileReasoningConfig;

use chorus_application::EngineConfig;
use chorus_domain::{ConfigIssue, ScoringConfig};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Factor weights and thresholds (domain type, deserialized as-is)
    pub scoring: ScoringConfig,
    /// Reasoning backend delegation
    pub reasoning: FileReasoningConfig,
    /// Automatic conversation loop
    pub auto_run: FileAutoRunConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Convert into the engine configuration.
    ///
    /// Unparseable strings fall back to defaults; every issue found along
    /// the way, plus the engine's own validation, is returned.
    pub fn to_engine_config(&self) -> (EngineConfig, Vec<ConfigIssue>) {
        let (auto_run, mut issues) = self.auto_run.to_auto_run_params();
        let config = EngineConfig::new(
            self.scoring.clone(),
            self.reasoning.to_reasoning_params(),
            auto_run,
        );
        issues.extend(config.validate());
        (config, issues)
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_engine_config().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::SelectionStrategy;
    use chorus_domain::config::has_errors;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[scoring]
dominant_ratio = 2.0
flow_lookback = 6

[scoring.weights]
relevance = 0.25
expertise = 0.25
participation_balance = 0.25
conversation_flow = 0.25

[reasoning]
timeout_ms = 800

[auto_run]
message_ceiling = 40
default_speed = 8
default_strategy = "round-robin"

[logging]
verbosity = 2
decision_log = "/tmp/decisions.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring.dominant_ratio, 2.0);
        assert_eq!(config.scoring.flow_lookback, 6);
        assert_eq!(config.scoring.weights.relevance, 0.25);
        assert_eq!(config.logging.verbosity, 2);

        let (engine, issues) = config.to_engine_config();
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
        assert_eq!(engine.reasoning().timeout, Duration::from_millis(800));
        assert_eq!(engine.reasoning().context_messages, 10);
        assert_eq!(engine.auto_run().message_ceiling, 40);
        assert_eq!(engine.auto_run().default_speed.value(), 8);
        assert_eq!(
            engine.auto_run().default_strategy,
            SelectionStrategy::RoundRobin
        );
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[auto_run]
default_speed = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.auto_run.default_speed, 3);
        // Defaults should apply
        assert_eq!(config.auto_run.message_ceiling, 100);
        assert_eq!(config.scoring, ScoringConfig::default());
        assert!(config.logging.decision_log.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_bad_weights_are_errors() {
        let toml_str = r#"
[scoring.weights]
relevance = 0.9
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(has_errors(&config.validate()));
    }

    #[test]
    fn test_unknown_strategy_is_a_warning() {
        let toml_str = r#"
[auto_run]
default_strategy = "loudest"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (engine, issues) = config.to_engine_config();
        assert_eq!(issues.len(), 1);
        assert!(!has_errors(&issues));
        assert_eq!(
            engine.auto_run().default_strategy,
            SelectionStrategy::Intelligent
        );
    }
}

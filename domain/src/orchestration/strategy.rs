//! Speaker selection strategy.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the next speaker is chosen in automatic mode.
///
/// `RoundRobin` and `Random` are pure; `Intelligent` scores every persona
/// and may delegate the decision to a reasoning backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    RoundRobin,
    Random,
    #[default]
    Intelligent,
}

impl SelectionStrategy {
    pub const VALID_VALUES: [&'static str; 3] = ["round-robin", "random", "intelligent"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::RoundRobin => "round-robin",
            SelectionStrategy::Random => "random",
            SelectionStrategy::Intelligent => "intelligent",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SelectionStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "round-robin" | "roundrobin" | "rr" => Ok(SelectionStrategy::RoundRobin),
            "random" => Ok(SelectionStrategy::Random),
            "intelligent" | "smart" => Ok(SelectionStrategy::Intelligent),
            _ => Err(DomainError::InvalidStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_intelligent() {
        assert_eq!(SelectionStrategy::default(), SelectionStrategy::Intelligent);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(
            "round_robin".parse::<SelectionStrategy>().ok(),
            Some(SelectionStrategy::RoundRobin)
        );
        assert_eq!(
            "RR".parse::<SelectionStrategy>().ok(),
            Some(SelectionStrategy::RoundRobin)
        );
        assert_eq!(
            "random".parse::<SelectionStrategy>().ok(),
            Some(SelectionStrategy::Random)
        );
        assert!("loudest".parse::<SelectionStrategy>().is_err());
    }

    #[test]
    fn test_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SelectionStrategy::RoundRobin).unwrap(),
            "\"round-robin\""
        );
    }
}

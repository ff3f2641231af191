//! Why an automatic conversation loop stopped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of an auto-run loop.
///
/// Only the `*Failed` variants describe a collaborator failure; everything
/// else is an expected end of the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    /// The conversation was closed by the host.
    ConversationEnded,
    /// The conversation is not (or no longer) in automatic mode.
    NotAutoMode,
    Cancelled,
    /// The message ceiling was reached.
    CeilingReached,
    /// The budget oracle refused the next turn.
    BudgetDenied(Option<String>),
    BudgetCheckFailed(String),
    GenerationFailed(String),
    SourceFailed(String),
    DecisionFailed(String),
    /// Manual mode answered a decision request with no speaker.
    NoDecision,
    /// The loop task ended abnormally.
    Aborted,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::ConversationEnded => "conversation_ended",
            StopReason::NotAutoMode => "not_auto_mode",
            StopReason::Cancelled => "cancelled",
            StopReason::CeilingReached => "ceiling_reached",
            StopReason::BudgetDenied(_) => "budget_denied",
            StopReason::BudgetCheckFailed(_) => "budget_check_failed",
            StopReason::GenerationFailed(_) => "generation_failed",
            StopReason::SourceFailed(_) => "source_failed",
            StopReason::DecisionFailed(_) => "decision_failed",
            StopReason::NoDecision => "no_decision",
            StopReason::Aborted => "aborted",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::BudgetCheckFailed(_)
                | StopReason::GenerationFailed(_)
                | StopReason::SourceFailed(_)
                | StopReason::DecisionFailed(_)
                | StopReason::Aborted
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BudgetDenied(Some(reason)) => write!(f, "budget denied: {}", reason),
            StopReason::BudgetCheckFailed(e) => write!(f, "budget check failed: {}", e),
            StopReason::GenerationFailed(e) => write!(f, "generation failed: {}", e),
            StopReason::SourceFailed(e) => write!(f, "conversation source failed: {}", e),
            StopReason::DecisionFailed(e) => write!(f, "turn decision failed: {}", e),
            other => write!(f, "{}", other.as_str().replace('_', " ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_classification() {
        assert!(StopReason::GenerationFailed("boom".into()).is_failure());
        assert!(!StopReason::BudgetDenied(None).is_failure());
        assert!(!StopReason::CeilingReached.is_failure());
        assert!(!StopReason::Cancelled.is_failure());
    }

    #[test]
    fn test_display() {
        assert_eq!(StopReason::CeilingReached.to_string(), "ceiling reached");
        assert_eq!(
            StopReason::BudgetDenied(Some("monthly cap".into())).to_string(),
            "budget denied: monthly cap"
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(StopReason::GenerationFailed("x".into())).unwrap();
        assert_eq!(json["kind"], "generation_failed");
        assert_eq!(json["detail"], "x");
    }
}

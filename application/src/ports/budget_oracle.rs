//! Budget oracle port.
//!
//! Cost accounting lives outside the engine. Before every automatic turn the
//! loop asks the oracle whether the conversation owner can afford one more
//! turn; a refusal stops the loop, it is not an error.
//!
//! # Built-in Implementations
//!
//! - [`UnlimitedBudget`] - always allows the turn

use async_trait::async_trait;
use chorus_domain::UserId;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BudgetError {
    #[error("Budget service unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown user: {0}")]
    UnknownUser(UserId),
}

/// Answer of a budget check.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetVerdict {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl BudgetVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Port for per-turn budget checks.
#[async_trait]
pub trait BudgetOracle: Send + Sync {
    /// Whether `user_id` may spend `estimated_cost` on the next turn.
    async fn check_budget(
        &self,
        user_id: &UserId,
        estimated_cost: f64,
    ) -> Result<BudgetVerdict, BudgetError>;
}

/// Oracle for hosts without cost accounting.
pub struct UnlimitedBudget;

#[async_trait]
impl BudgetOracle for UnlimitedBudget {
    async fn check_budget(
        &self,
        _user_id: &UserId,
        _estimated_cost: f64,
    ) -> Result<BudgetVerdict, BudgetError> {
        Ok(BudgetVerdict::allow())
    }
}

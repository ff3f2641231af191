//! Reasoning parameters: delegated decision control.
//!
//! [`ReasoningParams`] bounds how the delegated intelligent path talks to
//! the reasoning backend. These are application-layer concerns, not domain
//! policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delegated decision parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningParams {
    /// Hard deadline for one backend call. On breach the fallback decides.
    pub timeout: Duration,
    /// Number of trailing messages included in the prompt.
    pub context_messages: usize,
}

impl Default for ReasoningParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            context_messages: 10,
        }
    }
}

impl ReasoningParams {
    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_context_messages(mut self, count: usize) -> Self {
        self.context_messages = count;
        self
    }
}

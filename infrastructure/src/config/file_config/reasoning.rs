//! Reasoning backend settings from TOML (`[reasoning]` section)

use chorus_application::ReasoningParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw delegation settings
///
/// # Example
///
/// ```toml
/// [reasoning]
/// timeout_ms = 500         # hard deadline for one backend call
/// context_messages = 10    # recent messages shown to the backend
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    pub timeout_ms: u64,
    pub context_messages: usize,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        let params = ReasoningParams::default();
        Self {
            timeout_ms: params.timeout.as_millis() as u64,
            context_messages: params.context_messages,
        }
    }
}

impl FileReasoningConfig {
    pub fn to_reasoning_params(&self) -> ReasoningParams {
        ReasoningParams::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_context_messages(self.context_messages)
    }
}

//! Logging settings from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration
///
/// # Example
///
/// ```toml
/// [logging]
/// verbosity = 1                                  # 0 warn, 1 info, 2 debug, 3 trace
/// decision_log = "~/.local/state/chorus/decisions.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub verbosity: u8,
    /// JSONL file receiving every turn decision. Disabled when unset.
    pub decision_log: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// `decision_log` with a leading `~` expanded to the home directory.
    pub fn decision_log_path(&self) -> Option<PathBuf> {
        let path = self.decision_log.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}

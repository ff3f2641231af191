//! Configuration file loading for chorus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CHORUS_*` environment variables
//! 2. Explicitly passed config file
//! 3. Project root: `./chorus.toml` or `./.chorus.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chorus/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileAutoRunConfig, FileConfig, FileLoggingConfig, FileReasoningConfig};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX};

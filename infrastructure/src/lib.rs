//! Infrastructure layer for chorus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileAutoRunConfig, FileConfig, FileLoggingConfig,
    FileReasoningConfig,
};
pub use logging::{JsonlDecisionLog, decision_logger, init_tracing};

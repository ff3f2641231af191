//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ReasoningParams`] - delegated decision deadline and context window
//! - [`AutoRunParams`] - automatic loop ceiling, defaults and turn cost
//! - [`EngineConfig`] - container for all slices, including the domain's `ScoringConfig`

pub mod auto_run_params;
pub mod engine_config;
pub mod reasoning_params;

pub use auto_run_params::AutoRunParams;
pub use engine_config::EngineConfig;
pub use reasoning_params::ReasoningParams;

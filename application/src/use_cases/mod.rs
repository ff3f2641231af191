//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod auto_run;
pub mod determine_speaker;
pub mod orchestration_state;
pub mod reasoning_adapter;

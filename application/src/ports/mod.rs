//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that the host and infrastructure adapters
//! must implement.

pub mod auto_run_observer;
pub mod budget_oracle;
pub mod conversation_logger;
pub mod conversation_source;
pub mod reasoning_backend;
pub mod response_generator;

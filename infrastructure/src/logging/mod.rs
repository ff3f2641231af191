//! Logging infrastructure
//!
//! - [`init_tracing`] installs the operational `tracing` subscriber
//! - [`JsonlDecisionLog`] implements the
//!   [`ConversationLogger`](chorus_application::ConversationLogger) port
//!   as an append-only JSONL audit trail

mod decision_log;
mod subscriber;

pub use decision_log::{JsonlDecisionLog, decision_logger};
pub use subscriber::{init_tracing, verbosity_filter};

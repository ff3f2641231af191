//! Configuration value objects for the domain layer
//!
//! Validation types shared by every layer that checks configuration.

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity, has_errors};

//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] - persona, conversation and user identifiers
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod ids;

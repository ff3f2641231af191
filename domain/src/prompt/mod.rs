//! Prompt domain
//!
//! Templates for asking a reasoning backend to pick the next speaker.

mod turn;

pub use turn::{TurnPromptContext, TurnPromptTemplate};

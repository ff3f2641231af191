//! Conversation domain
//!
//! Messages, conversation mode/type and pacing speed. Persistence of the
//! log belongs to the host; the engine only reads it.

pub mod entities;
pub mod mode;
pub mod pacing;

pub use entities::{Message, Role, last_assistant_speaker, recent_window};
pub use mode::{ConversationMode, ConversationType};
pub use pacing::PacingSpeed;

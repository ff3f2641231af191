//! Persona domain
//!
//! A persona is an independently configured AI participant with a stable id,
//! a role label and a free-text profile.

pub mod entities;
pub mod experience;

pub use entities::{Persona, PersonaProfile, PersonaUsage, active_personas};
pub use experience::ExperienceLevel;

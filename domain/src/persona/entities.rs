//! Persona entities

use crate::core::ids::PersonaId;
use crate::persona::experience::ExperienceLevel;
use serde::{Deserialize, Serialize};

/// Free-text profile of a persona.
///
/// Only `experience_level` and `expertise` feed the scorer directly; the
/// remaining fields are passed to the reasoning backend as description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaProfile {
    pub background: Option<String>,
    pub personality: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub attitude: Option<String>,
    /// Declared expertise keywords (e.g. "kubernetes", "pricing").
    pub expertise: Vec<String>,
}

/// Read-only usage counters maintained by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaUsage {
    pub messages: u64,
    pub tokens: u64,
}

/// A configured AI participant (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    /// Role label, e.g. "Backend Engineer" or "Product Manager".
    pub role: String,
    #[serde(default)]
    pub profile: PersonaProfile,
    /// Opaque provider identifier; never inspected by the engine.
    #[serde(default)]
    pub provider: String,
    /// Opaque model identifier; never inspected by the engine.
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: PersonaUsage,
    /// Soft-deactivated personas keep their history but are never selected.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Persona {
    pub fn new(id: impl Into<PersonaId>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            profile: PersonaProfile::default(),
            provider: String::new(),
            model: String::new(),
            usage: PersonaUsage::default(),
            is_active: true,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_profile(mut self, profile: PersonaProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_experience(mut self, level: ExperienceLevel) -> Self {
        self.profile.experience_level = Some(level);
        self
    }

    pub fn with_expertise<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.expertise = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backend(mut self, provider: impl Into<String>, model: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.model = model.into();
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// One-paragraph description used when asking the reasoning backend.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("{} ({})", self.name, self.role)];
        if let Some(level) = self.profile.experience_level {
            parts.push(format!("experience: {}", level));
        }
        if !self.profile.expertise.is_empty() {
            parts.push(format!("expertise: {}", self.profile.expertise.join(", ")));
        }
        if let Some(background) = &self.profile.background {
            parts.push(format!("background: {}", background));
        }
        if let Some(personality) = &self.profile.personality {
            parts.push(format!("personality: {}", personality));
        }
        if let Some(attitude) = &self.profile.attitude {
            parts.push(format!("attitude: {}", attitude));
        }
        parts.join("; ")
    }
}

/// Filter a roster down to the personas eligible for selection.
pub fn active_personas(personas: &[Persona]) -> Vec<Persona> {
    personas.iter().filter(|p| p.is_active).cloned().collect()
}

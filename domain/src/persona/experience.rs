//! Experience level declared in a persona profile.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How experienced a persona claims to be in its role.
///
/// Each level maps to a base expertise score used by the factor scorer.
/// Personas with no declared level score as [`ExperienceLevel::UNKNOWN_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Mastery,
    Senior,
    Entry,
    Limited,
    #[serde(rename = "none")]
    NoExperience,
}

impl ExperienceLevel {
    /// Base expertise for a persona whose level is absent or unrecognised.
    pub const UNKNOWN_BASE: f64 = 0.5;

    /// Base expertise score for this level.
    pub fn base_expertise(&self) -> f64 {
        match self {
            ExperienceLevel::Mastery => 1.0,
            ExperienceLevel::Senior => 0.8,
            ExperienceLevel::Entry => 0.5,
            ExperienceLevel::Limited => 0.3,
            ExperienceLevel::NoExperience => 0.1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Mastery => "mastery",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Limited => "limited",
            ExperienceLevel::NoExperience => "none",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mastery" | "master" | "expert" => Ok(ExperienceLevel::Mastery),
            "senior" => Ok(ExperienceLevel::Senior),
            "entry" | "junior" => Ok(ExperienceLevel::Entry),
            "limited" => Ok(ExperienceLevel::Limited),
            "none" => Ok(ExperienceLevel::NoExperience),
            _ => Err(DomainError::InvalidExperienceLevel(s.to_string())),
        }
    }
}

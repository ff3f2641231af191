//! Role categories and their keyword tables.
//!
//! A persona's free-text role label maps to zero or more categories; message
//! content maps to categories through a second keyword table. A persona is
//! "on topic" when the two sets intersect.

use serde::{Deserialize, Serialize};

/// Broad area of responsibility a role label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Technical,
    Design,
    Business,
    Security,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 4] = [
        RoleCategory::Technical,
        RoleCategory::Design,
        RoleCategory::Business,
        RoleCategory::Security,
    ];

    /// Keywords that place a role label in this category.
    fn role_keywords(&self) -> &'static [&'static str] {
        match self {
            RoleCategory::Technical => &[
                "engineer",
                "developer",
                "programmer",
                "architect",
                "devops",
                "cto",
                "technical",
            ],
            RoleCategory::Design => &["designer", "design", "ux", "ui", "researcher"],
            RoleCategory::Business => &[
                "manager",
                "product",
                "business",
                "executive",
                "founder",
                "marketing",
                "sales",
            ],
            RoleCategory::Security => &[
                "security", "compliance", "legal", "auditor", "privacy", "risk",
            ],
        }
    }

    /// Keywords that place message content in this category.
    fn content_keywords(&self) -> &'static [&'static str] {
        match self {
            RoleCategory::Technical => &[
                "code",
                "architecture",
                "api",
                "bug",
                "database",
                "implementation",
                "infrastructure",
                "performance",
                "deploy",
                "technical",
                "backend",
                "frontend",
                "algorithm",
                "scalability",
                "system",
            ],
            RoleCategory::Design => &[
                "design",
                "ux",
                "ui",
                "user experience",
                "interface",
                "layout",
                "usability",
                "accessibility",
                "prototype",
                "wireframe",
                "visual",
            ],
            RoleCategory::Business => &[
                "business",
                "revenue",
                "market",
                "budget",
                "strategy",
                "customer",
                "roadmap",
                "stakeholder",
                "pricing",
                "cost",
                "growth",
                "sales",
            ],
            RoleCategory::Security => &[
                "security",
                "compliance",
                "privacy",
                "vulnerability",
                "risk",
                "audit",
                "regulation",
                "encryption",
                "gdpr",
                "threat",
                "authentication",
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Technical => "technical",
            RoleCategory::Design => "design",
            RoleCategory::Business => "business",
            RoleCategory::Security => "security",
        }
    }

    /// Categories a role label belongs to (may be several, e.g. "Security Engineer").
    pub fn for_role(role: &str) -> Vec<RoleCategory> {
        let role = role.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|c| c.role_keywords().iter().any(|k| contains_term(&role, k)))
            .collect()
    }

    /// Whether message content touches this category.
    pub fn matches_content(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        self.content_keywords()
            .iter()
            .any(|k| contains_term(&content, k))
    }
}

/// Whether `haystack` (already lowercased) contains `term` as a word.
///
/// Multi-word terms match as substrings. Single words match whole tokens,
/// or token prefixes for terms of four letters or more ("deploy" matches
/// "deployment").
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    if term.contains(' ') {
        return haystack.contains(&term);
    }
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == term || (term.len() >= 4 && token.starts_with(&term)))
}

/// Whether any of the role's categories matches the content.
pub fn role_matches_content(role: &str, content: &str) -> bool {
    RoleCategory::for_role(role)
        .iter()
        .any(|c| c.matches_content(content))
}

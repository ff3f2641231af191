//! Parsing of delegated turn decisions.
//!
//! Reasoning backends tend to wrap their JSON in prose or code fences, so
//! the outermost `{ ... }` span is extracted before deserializing. Roster
//! membership is not checked here; the caller owns the roster.

use crate::core::ids::PersonaId;
use crate::orchestration::decision::TurnFactors;
use serde::Deserialize;
use thiserror::Error;

/// Answer shape expected from a reasoning backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DelegatedAnswer {
    pub next_persona_id: PersonaId,
    #[serde(default)]
    pub reasoning: String,
    pub priority_score: f64,
    pub factors: TurnFactors,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnswerError {
    #[error("no JSON object in response")]
    NoJson,

    #[error("malformed answer: {0}")]
    Malformed(String),

    #[error("{field} = {value} is outside [0, 1]")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Extract and validate a [`DelegatedAnswer`] from raw backend output.
///
/// ```
/// use chorus_domain::orchestration::delegation::parse_delegated_answer;
///
/// let raw = r#"Sure: {"next_persona_id": "bob", "reasoning": "expert",
///   "priority_score": 0.8, "factors": {"relevance": 0.9, "expertise": 1.0,
///   "participation_balance": 0.6, "conversation_flow": 0.5}}"#;
/// assert_eq!(parse_delegated_answer(raw).unwrap().next_persona_id.as_str(), "bob");
/// ```
pub fn parse_delegated_answer(response: &str) -> Result<DelegatedAnswer, AnswerError> {
    let start = response.find('{').ok_or(AnswerError::NoJson)?;
    let end = response[start..].rfind('}').ok_or(AnswerError::NoJson)?;
    let json_str = &response[start..start + end + 1];

    let answer: DelegatedAnswer =
        serde_json::from_str(json_str).map_err(|e| AnswerError::Malformed(e.to_string()))?;

    if answer.next_persona_id.as_str().trim().is_empty() {
        return Err(AnswerError::Malformed("empty next_persona_id".to_string()));
    }

    let checks = [
        ("priority_score", answer.priority_score),
        ("relevance", answer.factors.relevance),
        ("expertise", answer.factors.expertise),
        ("participation_balance", answer.factors.participation_balance),
        ("conversation_flow", answer.factors.conversation_flow),
    ];
    for (field, value) in checks {
        if !(0.0..=1.0).contains(&value) {
            return Err(AnswerError::OutOfRange { field, value });
        }
    }

    Ok(answer)
}

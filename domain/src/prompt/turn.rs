//! Prompt templates for delegated turn decisions

use crate::conversation::{Message, Role};
use crate::core::ids::PersonaId;
use crate::orchestration::participation::{ParticipationStats, stat_for};
use crate::orchestration::policy::ModePolicy;
use crate::persona::Persona;
use serde_json::json;

/// Everything the reasoning backend sees for one decision.
#[derive(Debug, Clone, Copy)]
pub struct TurnPromptContext<'a> {
    pub personas: &'a [Persona],
    pub stats: &'a ParticipationStats,
    /// Trailing window of the log, oldest first.
    pub recent_messages: &'a [Message],
    pub current_speaker: Option<&'a PersonaId>,
    pub policy: &'a ModePolicy,
}

/// Templates for asking a reasoning backend who should speak next
pub struct TurnPromptTemplate;

impl TurnPromptTemplate {
    /// System prompt for the turn decision
    pub fn system() -> &'static str {
        r#"You are the moderator of a conversation between several AI personas.
Your only task is to decide which persona should speak next.
Judge relevance to the latest message, expertise, balance of participation and natural flow.
Never pick a persona that is not listed. Avoid picking the persona that just spoke unless it is the only one.
Answer with a single JSON object and nothing else."#
    }

    /// User prompt describing the roster, stats, recent log and mode guidance
    pub fn decision_prompt(ctx: &TurnPromptContext<'_>) -> String {
        let mut prompt = format!(
            "Conversation type: {}\n{}\n\nParticipants:\n",
            ctx.policy.conversation_type, ctx.policy.guidance
        );

        for persona in ctx.personas {
            let stat = stat_for(ctx.stats, &persona.id);
            let recency = if stat.has_spoken() {
                format!("last spoke {} message(s) ago", stat.last_spoken_offset)
            } else {
                "has not spoken yet".to_string()
            };
            prompt.push_str(&format!(
                "- id: {} | {} | messages: {}, participation: {:.1}%, {}\n",
                persona.id,
                persona.describe(),
                stat.message_count,
                stat.participation_rate,
                recency
            ));
        }

        match ctx.current_speaker {
            Some(id) => prompt.push_str(&format!("\nCurrent speaker: {}\n", id)),
            None => prompt.push_str("\nNo persona has spoken yet.\n"),
        }

        prompt.push_str("\nRecent messages (oldest first):\n");
        if ctx.recent_messages.is_empty() {
            prompt.push_str("(none)\n");
        }
        for message in ctx.recent_messages {
            prompt.push_str(&format!(
                "[{}] {}\n",
                speaker_label(message, ctx.personas),
                message.content
            ));
        }

        prompt.push_str(&format!(
            "\nRespond with JSON matching this schema:\n{}\n",
            Self::response_schema()
        ));

        prompt
    }

    /// JSON schema of the expected answer
    pub fn response_schema() -> serde_json::Value {
        let unit = json!({ "type": "number", "minimum": 0.0, "maximum": 1.0 });
        json!({
            "type": "object",
            "required": ["next_persona_id", "reasoning", "priority_score", "factors"],
            "properties": {
                "next_persona_id": { "type": "string" },
                "reasoning": { "type": "string" },
                "priority_score": unit,
                "factors": {
                    "type": "object",
                    "required": ["relevance", "expertise", "participation_balance", "conversation_flow"],
                    "properties": {
                        "relevance": unit,
                        "expertise": unit,
                        "participation_balance": unit,
                        "conversation_flow": unit
                    }
                }
            }
        })
    }
}

fn speaker_label(message: &Message, personas: &[Persona]) -> String {
    match message.role {
        Role::System => "system".to_string(),
        Role::User => "user".to_string(),
        Role::Assistant => match &message.persona_id {
            Some(id) => personas
                .iter()
                .find(|p| &p.id == id)
                .map(|p| format!("{} ({})", p.name, id))
                .unwrap_or_else(|| id.to_string()),
            None => "assistant".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationType;
    use crate::orchestration::participation::compute_stats;

    fn roster() -> Vec<Persona> {
        vec![
            Persona::new("alice", "Alice", "Designer").with_expertise(["figma"]),
            Persona::new("bob", "Bob", "Engineer"),
        ]
    }

    #[test]
    fn test_decision_prompt_lists_roster_and_log() {
        let personas = roster();
        let messages = vec![
            Message::user("What should the onboarding look like?"),
            Message::assistant("alice", "Start with a checklist."),
        ];
        let stats = compute_stats(&messages, &personas);
        let policy = ModePolicy::for_type(ConversationType::Debate, 5.0);
        let current = PersonaId::new("alice");
        let ctx = TurnPromptContext {
            personas: &personas,
            stats: &stats,
            recent_messages: &messages,
            current_speaker: Some(&current),
            policy: &policy,
        };

        let prompt = TurnPromptTemplate::decision_prompt(&ctx);
        assert!(prompt.contains("Conversation type: debate"));
        assert!(prompt.contains("id: alice"));
        assert!(prompt.contains("expertise: figma"));
        assert!(prompt.contains("id: bob"));
        assert!(prompt.contains("has not spoken yet"));
        assert!(prompt.contains("[Alice (alice)] Start with a checklist."));
        assert!(prompt.contains("[user] What should the onboarding look like?"));
        assert!(prompt.contains("Current speaker: alice"));
        assert!(prompt.contains("next_persona_id"));
    }

    #[test]
    fn test_decision_prompt_without_history() {
        let personas = roster();
        let stats = compute_stats(&[], &personas);
        let policy = ModePolicy::for_type(ConversationType::Discussion, 5.0);
        let ctx = TurnPromptContext {
            personas: &personas,
            stats: &stats,
            recent_messages: &[],
            current_speaker: None,
            policy: &policy,
        };
        let prompt = TurnPromptTemplate::decision_prompt(&ctx);
        assert!(prompt.contains("No persona has spoken yet."));
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = TurnPromptTemplate::response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["properties"]["factors"]["required"].as_array().unwrap().len(), 4);
    }
}

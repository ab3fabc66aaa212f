//! Expert persona descriptor and system prompt synthesis.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// The persona the user is consulting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertContext {
    pub name: String,
    pub specialty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ExpertContext {
    pub fn new(name: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Build the system prompt that puts the model in character.
    pub fn system_prompt(&self) -> String {
        format!(
            "Você é {}, {}.\n\
             Responda como um consultor especializado, de forma prática e objetiva.\n\
             Foque em soluções aplicáveis para micro e pequenas empresas brasileiras.",
            self.name, self.specialty
        )
    }

    /// Prepend the persona system prompt to a conversation.
    pub fn augment(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(messages.len() + 1);
        out.push(ChatMessage::system(self.system_prompt()));
        out.extend(messages.iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;

    #[test]
    fn test_system_prompt_embeds_persona() {
        let expert = ExpertContext::new("André", "Especialista em prospecção B2B");
        let prompt = expert.system_prompt();
        assert!(prompt.starts_with("Você é André, Especialista em prospecção B2B."));
        assert!(prompt.contains("micro e pequenas empresas"));
    }

    #[test]
    fn test_augment_prepends_system_message() {
        let expert = ExpertContext::new("Carla", "Roteiros");
        let history = vec![ChatMessage::user("oi"), ChatMessage::assistant("olá")];

        let augmented = expert.augment(&history);

        assert_eq!(augmented.len(), 3);
        assert_eq!(augmented[0].role, ChatRole::System);
        assert_eq!(augmented[1..], history[..]);
    }

    #[test]
    fn test_category_is_optional_on_the_wire() {
        let ctx: ExpertContext =
            serde_json::from_str(r#"{"name":"João","specialty":"CRM"}"#).unwrap();
        assert_eq!(ctx.category, None);
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("category").is_none());
    }
}

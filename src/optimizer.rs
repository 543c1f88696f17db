//! Prompt optimization assistant
//!
//! Drives a plain chat-completion round trip that rewrites a rough idea
//! into a generation-ready English prompt, with a Chinese gloss and a
//! short scene description. The assistant is asked for strict JSON, but
//! models drift: a reply that fails to parse is used as the optimized
//! prompt verbatim.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::GenError;
use crate::relay::{self, BodyKind, Relay};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = r#"You are a professional image prompt optimizer. Return strict JSON only:
{
  "optimizedPrompt": "optimized English prompt",
  "chineseTranslation": "Chinese meaning",
  "description": "1-2 sentence visual description"
}"#;

/// The assistant's structured answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizedPrompt {
    pub optimized_prompt: String,
    pub chinese_translation: String,
    pub description: String,
}

/// Chat-backed prompt rewriter. Independent of the generation profiles:
/// callers may point it at a cheaper text model.
pub struct PromptOptimizer {
    relay: Arc<dyn Relay>,
    endpoint: String,
    api_key: SecretString,
    model: String,
}

impl PromptOptimizer {
    pub fn new(
        relay: Arc<dyn Relay>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            relay,
            endpoint: endpoint.into(),
            api_key: SecretString::from(api_key.into()),
            model: model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Rewrite `input` into a generation-ready prompt.
    pub async fn optimize(&self, input: &str) -> Result<OptimizedPrompt, GenError> {
        if self.endpoint.is_empty() || self.api_key.expose_secret().is_empty() {
            return Err(GenError::ConfigurationError(
                "configure the assistant API endpoint and key first".to_string(),
            ));
        }

        let payload = json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": input },
            ],
        });

        let response = self
            .relay
            .post(&self.endpoint, self.api_key.expose_secret(), BodyKind::Chat, &payload)
            .await?;
        let body = relay::classify(&response)?;

        let raw = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .unwrap_or("{}");

        Ok(parse_reply(raw))
    }
}

fn parse_reply(raw: &str) -> OptimizedPrompt {
    serde_json::from_str(raw).unwrap_or_else(|_| OptimizedPrompt {
        optimized_prompt: raw.to_string(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_reply_parses() {
        let parsed = parse_reply(
            r#"{"optimizedPrompt":"rainy street, cinematic","chineseTranslation":"雨后街道","description":"A moody street scene."}"#,
        );
        assert_eq!(parsed.optimized_prompt, "rainy street, cinematic");
        assert_eq!(parsed.chinese_translation, "雨后街道");
    }

    #[test]
    fn prose_reply_becomes_the_prompt() {
        let parsed = parse_reply("rainy street, cinematic lighting");
        assert_eq!(parsed.optimized_prompt, "rainy street, cinematic lighting");
        assert!(parsed.description.is_empty());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let parsed = parse_reply(r#"{"optimizedPrompt":"a fox"}"#);
        assert_eq!(parsed.optimized_prompt, "a fox");
        assert!(parsed.chinese_translation.is_empty());
    }
}

//! Image-generation payloads: the flat OpenAI-style request.

use serde::Serialize;

use crate::types::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagesPayload {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub response_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

pub(super) fn build(
    model: &str,
    request: &GenerationRequest,
    enhanced: &str,
    width: u32,
    height: u32,
) -> ImagesPayload {
    ImagesPayload {
        model: model.to_string(),
        prompt: enhanced.to_string(),
        n: 1,
        size: format!("{width}x{height}"),
        response_format: "url",
        negative_prompt: request
            .negative_prompt
            .clone()
            .filter(|negative| !negative.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_prompt_is_omitted_when_unset() {
        let request = GenerationRequest::new("a cat");
        let payload = build("m", &request, "a cat (enhanced)", 1024, 1024);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("negative_prompt").is_none());
        assert_eq!(json["n"], 1);
        assert_eq!(json["response_format"], "url");
        assert_eq!(json["size"], "1024x1024");
    }

    #[test]
    fn prompt_is_the_enhanced_one() {
        let request = GenerationRequest::new("a cat").with_negative_prompt("blurry");
        let payload = build("m", &request, "a cat\n\n[画面要求]", 512, 768);
        assert_eq!(payload.prompt, "a cat\n\n[画面要求]");
        assert_eq!(payload.negative_prompt.as_deref(), Some("blurry"));
    }
}

//! Web UI payloads: width/height/steps/cfg plus a numeric model index.

use serde::Serialize;

use crate::types::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebUiPayload {
    pub prompt: String,
    /// Always present; this backend wants an empty string, not an omitted
    /// field.
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg: f32,
    /// -1 asks the backend for a random seed.
    pub seed: i64,
    pub model_index: u32,
}

pub(super) fn build(
    model: &str,
    request: &GenerationRequest,
    enhanced: &str,
    width: u32,
    height: u32,
) -> WebUiPayload {
    WebUiPayload {
        prompt: enhanced.to_string(),
        negative_prompt: request.negative_prompt.clone().unwrap_or_default(),
        width,
        height,
        steps: request.steps,
        cfg: request.guidance,
        seed: request.seed.unwrap_or(-1),
        model_index: model.parse().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_seed_becomes_the_random_sentinel() {
        let request = GenerationRequest::new("a cat");
        let payload = build("0", &request, "a cat", 512, 512);
        assert_eq!(payload.seed, -1);
    }

    #[test]
    fn explicit_seed_is_kept() {
        let request = GenerationRequest::new("a cat").with_seed(42);
        let payload = build("0", &request, "a cat", 512, 512);
        assert_eq!(payload.seed, 42);
    }

    #[test]
    fn model_index_parses_or_defaults() {
        let request = GenerationRequest::new("a cat");
        assert_eq!(build("3", &request, "a cat", 512, 512).model_index, 3);
        assert_eq!(build("stable-v2", &request, "a cat", 512, 512).model_index, 0);
    }

    #[test]
    fn negative_prompt_is_an_empty_string_when_unset() {
        let request = GenerationRequest::new("a cat");
        let json = serde_json::to_value(build("0", &request, "a cat", 512, 512)).unwrap();
        assert_eq!(json["negative_prompt"], "");
    }
}

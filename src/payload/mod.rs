//! Outbound payload construction
//!
//! Pure functions from (shape, model, request, planned dimensions) to the
//! typed payload each upstream family expects. Nothing here performs I/O;
//! shape/mode incompatibilities surface as validation errors so direct
//! callers get the same guarantees the orchestrator enforces.

mod chat;
mod images;
mod webui;

pub use chat::{
    ChatContentBlock, ChatMessage, ChatPayload, ChatVideoPayload, ImageUrlRef, SafetySetting,
    permissive_safety_settings,
};
pub use images::ImagesPayload;
pub use webui::WebUiPayload;

use serde::Serialize;

use crate::error::GenError;
use crate::prompt;
use crate::relay::BodyKind;
use crate::types::{ApiShape, GenerationRequest};

/// A fully built upstream payload, tagged with the shape that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundPayload {
    Chat(ChatPayload),
    ChatVideo(ChatVideoPayload),
    Images(ImagesPayload),
    WebUi(WebUiPayload),
}

impl OutboundPayload {
    /// The relay path family this payload belongs to.
    pub fn body_kind(&self) -> BodyKind {
        match self {
            OutboundPayload::Chat(_) => BodyKind::Chat,
            OutboundPayload::ChatVideo(_) => BodyKind::ChatVideo,
            OutboundPayload::Images(_) => BodyKind::Images,
            OutboundPayload::WebUi(_) => BodyKind::WebUi,
        }
    }

    /// Serialize to the JSON value handed to the relay.
    pub fn to_value(&self) -> Result<serde_json::Value, GenError> {
        fn serialize<T: Serialize>(payload: &T) -> Result<serde_json::Value, GenError> {
            serde_json::to_value(payload)
                .map_err(|e| GenError::Internal(format!("payload serialization failed: {e}")))
        }
        match self {
            OutboundPayload::Chat(p) => serialize(p),
            OutboundPayload::ChatVideo(p) => serialize(p),
            OutboundPayload::Images(p) => serialize(p),
            OutboundPayload::WebUi(p) => serialize(p),
        }
    }
}

/// Build the outbound payload for one generation attempt.
///
/// `width`/`height` come from the resolution planner; `model` has already
/// been resolved through override → profile → shape default.
pub fn build(
    shape: ApiShape,
    model: &str,
    request: &GenerationRequest,
    width: u32,
    height: u32,
) -> Result<OutboundPayload, GenError> {
    if !shape.supports_mode(request.mode) {
        return Err(GenError::ModeValidation(format!(
            "the {shape} API does not support {} mode",
            request.mode
        )));
    }

    let enhanced = prompt::enhance(
        &request.prompt,
        request.aspect_ratio,
        (width, height),
        shape,
        request.base_size,
    );

    Ok(match shape {
        ApiShape::ChatCompletion => {
            OutboundPayload::Chat(chat::build_chat(model, request, &enhanced, width, height))
        }
        ApiShape::ChatVideo => {
            OutboundPayload::ChatVideo(chat::build_chat_video(model, request, &enhanced))
        }
        ApiShape::ImageGeneration => {
            OutboundPayload::Images(images::build(model, request, &enhanced, width, height))
        }
        ApiShape::WebUiGenerate => {
            OutboundPayload::WebUi(webui::build(model, request, &enhanced, width, height))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreativeMode;

    #[test]
    fn images_shape_rejects_edit_mode() {
        let request = GenerationRequest::new("a cat")
            .with_mode(CreativeMode::Edit)
            .with_reference_images(["data:image/png;base64,AAAA"]);
        let err = build(ApiShape::ImageGeneration, "m", &request, 1024, 1024).unwrap_err();
        assert!(matches!(err, GenError::ModeValidation(_)));
    }

    #[test]
    fn webui_shape_rejects_video_mode() {
        let request = GenerationRequest::new("a cat").with_mode(CreativeMode::Video);
        let err = build(ApiShape::WebUiGenerate, "0", &request, 1024, 1024).unwrap_err();
        assert!(matches!(err, GenError::ModeValidation(_)));
    }

    #[test]
    fn body_kinds_match_shapes() {
        let request = GenerationRequest::new("a cat");
        let chat = build(ApiShape::ChatCompletion, "m", &request, 1024, 1024).unwrap();
        assert_eq!(chat.body_kind(), BodyKind::Chat);
        let images = build(ApiShape::ImageGeneration, "m", &request, 1024, 1024).unwrap();
        assert_eq!(images.body_kind(), BodyKind::Images);
        let webui = build(ApiShape::WebUiGenerate, "0", &request, 1024, 1024).unwrap();
        assert_eq!(webui.body_kind(), BodyKind::WebUi);
        let video = build(ApiShape::ChatVideo, "m", &request, 1024, 1024).unwrap();
        assert_eq!(video.body_kind(), BodyKind::ChatVideo);
    }
}

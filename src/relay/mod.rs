//! The outbound-HTTP boundary
//!
//! The relay is the only component that carries the user's credentials to
//! an upstream endpoint. The core talks to it through the [`Relay`] trait
//! and treats whatever comes back as untrusted: status, content type, and
//! raw text are passed through unmodified, and [`classify`] turns them
//! into a parsed body or a classified error.

mod classify;
mod http;

pub use classify::{classify, ensure_success_flag, gateway_hint, preview};
pub use http::HttpRelay;

use async_trait::async_trait;

use crate::error::GenError;

/// Which upstream path a payload is destined for.
///
/// Only chat-completion bodies select the chat path; image-generation,
/// web UI, and chat-video bodies all post to the image-generation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Chat,
    Images,
    WebUi,
    ChatVideo,
}

impl BodyKind {
    /// Upstream path suffix for this body kind.
    pub fn path(&self) -> &'static str {
        match self {
            BodyKind::Chat => "/v1/chat/completions",
            BodyKind::Images | BodyKind::WebUi | BodyKind::ChatVideo => "/v1/images/generations",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Chat => "chat",
            BodyKind::Images => "images",
            BodyKind::WebUi => "webui",
            BodyKind::ChatVideo => "chat-video",
        }
    }
}

/// What an upstream call produced, before any interpretation.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: u16,
    pub content_type: String,
    pub raw_text: String,
}

impl RelayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The boundary component performing outbound HTTP with the caller's
/// credentials. Implementations must bound every call with a timeout and
/// surface timeouts as [`GenError::Timeout`], pass upstream status codes
/// and bodies through unmodified, and authenticate with a bearer token.
#[async_trait]
pub trait Relay: Send + Sync {
    /// POST a generation payload to the path selected by `kind`.
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        kind: BodyKind,
        payload: &serde_json::Value,
    ) -> Result<RelayResponse, GenError>;

    /// GET the model listing (lightweight metadata call, shorter bound).
    async fn get_models(&self, endpoint: &str, api_key: &str)
    -> Result<RelayResponse, GenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_chat_uses_the_chat_path() {
        assert_eq!(BodyKind::Chat.path(), "/v1/chat/completions");
        assert_eq!(BodyKind::Images.path(), "/v1/images/generations");
        assert_eq!(BodyKind::WebUi.path(), "/v1/images/generations");
        assert_eq!(BodyKind::ChatVideo.path(), "/v1/images/generations");
    }
}

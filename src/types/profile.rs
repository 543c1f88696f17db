//! Upstream API profiles
//!
//! A profile binds credentials and a default model to one upstream API
//! *shape*. Shapes determine payload schema, the relay path, and which
//! creative modes are allowed. Credentials are stored per shape
//! (`ProfileSet`), so switching shapes never loses configuration.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::GenError;
use crate::types::request::CreativeMode;

/// Fixed endpoint for the web UI backend. Not user-configurable.
pub const WEBUI_ENDPOINT: &str = "https://sd.exacg.cc";

/// Which upstream API family a profile targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiShape {
    /// OpenAI-style `/v1/chat/completions` with multimodal content blocks.
    ChatCompletion,
    /// OpenAI-style `/v1/images/generations` flat payload.
    ImageGeneration,
    /// Fixed web UI backend with a width/height/steps/cfg payload.
    WebUiGenerate,
    /// Chat-message payload against a video-capable backend; reduced
    /// payload without size/safety fields.
    ChatVideo,
}

impl ApiShape {
    /// All shapes, in configuration-surface order.
    pub const ALL: [ApiShape; 4] = [
        ApiShape::ChatCompletion,
        ApiShape::ImageGeneration,
        ApiShape::WebUiGenerate,
        ApiShape::ChatVideo,
    ];

    /// Stable identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiShape::ChatCompletion => "chat-completion",
            ApiShape::ImageGeneration => "image-generation",
            ApiShape::WebUiGenerate => "webui-generate",
            ApiShape::ChatVideo => "chat-video",
        }
    }

    /// Whether this shape accepts the given creative mode.
    ///
    /// Image-generation and web UI backends are text-to-image only; the
    /// chat-video backend adds video; full chat-completion backends accept
    /// every mode.
    pub fn supports_mode(&self, mode: CreativeMode) -> bool {
        match self {
            ApiShape::ChatCompletion => true,
            ApiShape::ImageGeneration | ApiShape::WebUiGenerate => {
                mode == CreativeMode::Generate
            }
            ApiShape::ChatVideo => {
                matches!(mode, CreativeMode::Generate | CreativeMode::Video)
            }
        }
    }

    /// Shape-level default model, when one exists.
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            ApiShape::WebUiGenerate => Some("0"),
            ApiShape::ChatVideo => Some("grok-imagine-0.9"),
            ApiShape::ChatCompletion | ApiShape::ImageGeneration => None,
        }
    }

    /// Whether the endpoint is fixed rather than user-supplied.
    pub fn has_fixed_endpoint(&self) -> bool {
        matches!(self, ApiShape::WebUiGenerate)
    }
}

impl std::fmt::Display for ApiShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn serialize_secret<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

/// Credentials and default model for one shape, without the shape itself.
/// Stored inside a [`ProfileSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "empty_secret", serialize_with = "serialize_secret")]
    pub api_key: SecretString,
    #[serde(default)]
    pub model: String,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: empty_secret(),
            model: String::new(),
        }
    }
}

impl ProfileConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
        }
    }
}

/// A fully materialized profile: one shape plus its stored configuration.
/// Read-only to the core during a generation call.
#[derive(Debug, Clone)]
pub struct ApiProfile {
    pub endpoint: String,
    pub api_key: SecretString,
    pub model: String,
    pub shape: ApiShape,
}

impl ApiProfile {
    /// The endpoint generation calls actually use. The web UI shape always
    /// targets its fixed endpoint regardless of stored configuration.
    pub fn effective_endpoint(&self) -> &str {
        if self.shape.has_fixed_endpoint() {
            WEBUI_ENDPOINT
        } else {
            &self.endpoint
        }
    }

    /// Check the credential invariant: endpoint+key non-empty, except that
    /// fixed-endpoint shapes only need a key.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(GenError::ConfigurationError(
                "API key is not configured for the active profile".to_string(),
            ));
        }
        if !self.shape.has_fixed_endpoint() && self.endpoint.is_empty() {
            return Err(GenError::ConfigurationError(
                "API endpoint is not configured for the active profile".to_string(),
            ));
        }
        Ok(())
    }
}

/// One stored credential set per shape, plus the shape currently in use.
///
/// Modeled as an explicit map keyed by [`ApiShape`] so switching the active
/// shape never overwrites another shape's credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSet {
    active: ApiShape,
    profiles: HashMap<ApiShape, ProfileConfig>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        for shape in ApiShape::ALL {
            let mut config = ProfileConfig::default();
            if shape.has_fixed_endpoint() {
                config.endpoint = WEBUI_ENDPOINT.to_string();
            }
            if let Some(model) = shape.default_model() {
                config.model = model.to_string();
            }
            profiles.insert(shape, config);
        }
        Self {
            active: ApiShape::ChatCompletion,
            profiles,
        }
    }
}

impl ProfileSet {
    pub fn active_shape(&self) -> ApiShape {
        self.active
    }

    pub fn set_active(&mut self, shape: ApiShape) {
        self.active = shape;
    }

    /// Materialize the profile for a shape. Missing entries fall back to
    /// the shape's defaults; fixed endpoints are always enforced.
    pub fn profile(&self, shape: ApiShape) -> ApiProfile {
        let config = self.profiles.get(&shape).cloned().unwrap_or_default();
        let endpoint = if shape.has_fixed_endpoint() {
            WEBUI_ENDPOINT.to_string()
        } else {
            config.endpoint
        };
        let model = if config.model.is_empty() {
            shape.default_model().unwrap_or_default().to_string()
        } else {
            config.model
        };
        ApiProfile {
            endpoint,
            api_key: config.api_key,
            model,
            shape,
        }
    }

    pub fn active_profile(&self) -> ApiProfile {
        self.profile(self.active)
    }

    /// Store configuration for a shape. The fixed web UI endpoint cannot be
    /// overridden.
    pub fn upsert(&mut self, shape: ApiShape, mut config: ProfileConfig) {
        if shape.has_fixed_endpoint() {
            config.endpoint = WEBUI_ENDPOINT.to_string();
        }
        self.profiles.insert(shape, config);
    }
}

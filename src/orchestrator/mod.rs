//! Generation orchestration
//!
//! [`GenerationSession`] drives one generation at a time through a fixed
//! state sequence: validate the active profile and request, plan the
//! resolution, resolve the model, build the payload, make the single relay
//! call, normalize the response, and record the result. Exactly one
//! [`GeneratedRecord`] or one classified error comes out of every
//! invocation; nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::error::GenError;
use crate::extract::MediaExtractor;
use crate::history::{HistoryStore, MemoryHistoryStore, NewHistoryEntry};
use crate::payload;
use crate::progress::{ProgressHandle, ProgressSimulator};
use crate::relay::{self, Relay};
use crate::resolution;
use crate::types::{
    ApiProfile, ApiShape, CreativeMode, GeneratedRecord, GenerationRequest, MediaResult,
    ProfileSet,
};

/// Where a generation attempt currently is. Driven strictly forward; the
/// relay call is the only suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Validating,
    Building,
    AwaitingUpstream,
    Extracting,
    Persisting,
}

/// One user session: profiles, collaborators, and the records generated so
/// far (newest first). Methods take `&mut self`; overlapping generations
/// are prevented by construction, not by a lock.
pub struct GenerationSession {
    profiles: ProfileSet,
    relay: Arc<dyn Relay>,
    history: Arc<dyn HistoryStore>,
    extractor: MediaExtractor,
    progress: ProgressSimulator,
    records: Vec<GeneratedRecord>,
    state: GenerationState,
}

impl GenerationSession {
    pub fn new(profiles: ProfileSet, relay: Arc<dyn Relay>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            profiles,
            relay,
            history,
            extractor: MediaExtractor::new(),
            progress: ProgressSimulator::new(),
            records: Vec::new(),
            state: GenerationState::Idle,
        }
    }

    /// A session with an in-memory history store.
    pub fn with_relay(profiles: ProfileSet, relay: Arc<dyn Relay>) -> Self {
        Self::new(profiles, relay, Arc::new(MemoryHistoryStore::new()))
    }

    /// Replace the extractor (e.g. to register custom shape matchers).
    pub fn with_extractor(mut self, extractor: MediaExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut ProfileSet {
        &mut self.profiles
    }

    /// Records generated this session, newest first. Authoritative for the
    /// session regardless of history-store persistence.
    pub fn records(&self) -> &[GeneratedRecord] {
        &self.records
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Simulated progress of the in-flight (or just-finished) attempt.
    pub fn progress(&self) -> f32 {
        self.progress.percent()
    }

    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.handle()
    }

    /// Run one generation attempt end to end.
    pub async fn generate(
        &mut self,
        request: GenerationRequest,
    ) -> Result<GeneratedRecord, GenError> {
        self.state = GenerationState::Validating;
        let profile = self.profiles.active_profile();

        let validated = match self.validate(&profile, request) {
            Ok(validated) => validated,
            Err(e) => {
                self.state = GenerationState::Idle;
                return Err(e);
            }
        };

        self.progress.start();
        let outcome = self.run(&profile, &validated).await;
        self.progress.finish();

        match outcome {
            Ok(media) => {
                let record = GeneratedRecord {
                    media,
                    source_image_count: consumed_reference_count(&validated),
                    created_at: Utc::now(),
                    request: validated,
                };

                self.state = GenerationState::Persisting;
                if let Err(e) = self.history.save(NewHistoryEntry::from_record(&record)).await {
                    // Persistence is best-effort; the session list is the
                    // record of truth.
                    tracing::warn!(error = %e, "history persistence failed");
                }

                self.records.insert(0, record.clone());
                self.state = GenerationState::Idle;
                Ok(record)
            }
            Err(e) => {
                self.state = GenerationState::Idle;
                tracing::debug!(error = %e, "generation attempt failed");
                Err(e)
            }
        }
    }

    /// List model ids offered by the active profile's endpoint. The web UI
    /// backend has no model listing (its model field is a numeric index).
    pub async fn list_models(&self) -> Result<Vec<String>, GenError> {
        let profile = self.profiles.active_profile();
        if profile.shape == ApiShape::WebUiGenerate {
            return Ok(Vec::new());
        }
        profile.validate()?;

        let response = self
            .relay
            .get_models(profile.effective_endpoint(), expose_key(&profile))
            .await?;
        let body = relay::classify(&response)?;

        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// All pre-flight guards. Returns the request that will actually run
    /// (video mode truncates references to one here, at generation time).
    fn validate(
        &self,
        profile: &ApiProfile,
        mut request: GenerationRequest,
    ) -> Result<GenerationRequest, GenError> {
        profile.validate()?;

        if request.prompt.trim().is_empty() {
            return Err(GenError::ModeValidation("prompt must not be empty".to_string()));
        }

        match request.mode {
            CreativeMode::Edit if request.reference_images.is_empty() => {
                return Err(GenError::ModeValidation(
                    "edit mode requires one reference image".to_string(),
                ));
            }
            CreativeMode::Compose if request.reference_images.len() < 2 => {
                return Err(GenError::ModeValidation(
                    "compose mode requires at least two reference images".to_string(),
                ));
            }
            CreativeMode::Video if request.reference_images.len() > 1 => {
                request.reference_images.truncate(1);
            }
            _ => {}
        }

        if !profile.shape.supports_mode(request.mode) {
            return Err(GenError::ModeValidation(format!(
                "the {} API does not support {} mode",
                profile.shape, request.mode
            )));
        }

        Ok(request)
    }

    /// Build → await upstream → extract. Returns the normalized media.
    async fn run(
        &mut self,
        profile: &ApiProfile,
        request: &GenerationRequest,
    ) -> Result<MediaResult, GenError> {
        self.state = GenerationState::Building;
        let (width, height) = resolution::plan(request.aspect_ratio, request.base_size, profile.shape);
        // Late guard: the model is resolved only after planning, right
        // before the payload is built.
        let model = resolve_model(profile, request)?;
        let outbound = payload::build(profile.shape, &model, request, width, height)?;
        let body = outbound.to_value()?;

        self.state = GenerationState::AwaitingUpstream;
        tracing::debug!(
            shape = profile.shape.as_str(),
            mode = request.mode.as_str(),
            %model,
            width,
            height,
            "dispatching generation"
        );
        let response = self
            .relay
            .post(
                profile.effective_endpoint(),
                expose_key(profile),
                outbound.body_kind(),
                &body,
            )
            .await?;

        self.state = GenerationState::Extracting;
        let parsed = relay::classify(&response)?;

        let target = if profile.shape == ApiShape::WebUiGenerate {
            relay::ensure_success_flag(&parsed)?;
            parsed.get("data").unwrap_or(&parsed)
        } else {
            &parsed
        };

        self.extractor
            .extract(target)
            .ok_or_else(|| no_media_error(profile.shape, &parsed))
    }
}

fn expose_key(profile: &ApiProfile) -> &str {
    use secrecy::ExposeSecret;
    profile.api_key.expose_secret()
}

/// Override → profile default → shape default; anything else is a
/// configuration error.
fn resolve_model(profile: &ApiProfile, request: &GenerationRequest) -> Result<String, GenError> {
    request
        .model_override
        .clone()
        .filter(|m| !m.is_empty())
        .or_else(|| Some(profile.model.clone()).filter(|m| !m.is_empty()))
        .or_else(|| profile.shape.default_model().map(str::to_string))
        .ok_or_else(|| {
            GenError::ConfigurationError("select or enter a model name first".to_string())
        })
}

fn consumed_reference_count(request: &GenerationRequest) -> u32 {
    match request.mode {
        CreativeMode::Generate => 0,
        CreativeMode::Edit => 1,
        CreativeMode::Compose | CreativeMode::Video => {
            request.reference_images.len().min(4) as u32
        }
    }
}

fn no_media_error(shape: ApiShape, parsed: &Value) -> GenError {
    match shape {
        ApiShape::ChatCompletion | ApiShape::ChatVideo => {
            let text = parsed
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .and_then(|m| m.get("content"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            GenError::NoMediaFound(format!(
                "no media returned by model. Partial response: {}...",
                relay::preview(text, 120)
            ))
        }
        ApiShape::ImageGeneration => {
            GenError::NoMediaFound("no image found in response data".to_string())
        }
        ApiShape::WebUiGenerate => {
            GenError::NoMediaFound("backend did not return a usable media URL".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProfileConfig;

    fn profile(shape: ApiShape, model: &str) -> ApiProfile {
        let mut set = ProfileSet::default();
        set.upsert(shape, ProfileConfig::new("https://api.example.com", "sk", model));
        set.profile(shape)
    }

    #[test]
    fn model_resolution_prefers_the_override() {
        let request = GenerationRequest::new("x").with_model("override-model");
        let resolved = resolve_model(&profile(ApiShape::ChatCompletion, "profile-model"), &request);
        assert_eq!(resolved.unwrap(), "override-model");
    }

    #[test]
    fn model_resolution_falls_back_to_profile_then_shape() {
        let request = GenerationRequest::new("x");
        let resolved = resolve_model(&profile(ApiShape::ChatCompletion, "profile-model"), &request);
        assert_eq!(resolved.unwrap(), "profile-model");

        let resolved = resolve_model(&profile(ApiShape::ChatVideo, ""), &request);
        assert_eq!(resolved.unwrap(), "grok-imagine-0.9");
    }

    #[test]
    fn no_model_anywhere_is_a_configuration_error() {
        let request = GenerationRequest::new("x");
        let err = resolve_model(&profile(ApiShape::ChatCompletion, ""), &request).unwrap_err();
        assert!(matches!(err, GenError::ConfigurationError(_)));
    }

    #[test]
    fn consumed_counts_per_mode() {
        let generate = GenerationRequest::new("x");
        assert_eq!(consumed_reference_count(&generate), 0);

        let edit = GenerationRequest::new("x")
            .with_mode(CreativeMode::Edit)
            .with_reference_images(["a"]);
        assert_eq!(consumed_reference_count(&edit), 1);

        let compose = GenerationRequest::new("x")
            .with_mode(CreativeMode::Compose)
            .with_reference_images(["a", "b", "c", "d", "e"]);
        assert_eq!(consumed_reference_count(&compose), 4);
    }

    #[test]
    fn chat_no_media_error_carries_a_text_preview() {
        let body: Value = serde_json::json!({
            "choices": [{ "message": { "content": "I am unable to draw that." } }]
        });
        let err = no_media_error(ApiShape::ChatCompletion, &body);
        let GenError::NoMediaFound(message) = err else {
            panic!("wrong variant");
        };
        assert!(message.contains("I am unable to draw that."));
    }
}

//! # Mediagen - Generation Orchestration for Generative-Media APIs
//!
//! Mediagen submits prompts and reference images to heterogeneous
//! generative-media backends and normalizes whatever comes back into a
//! single media result. It exists because upstream providers agree on
//! almost nothing: some speak chat completions with multimodal content
//! blocks, some speak flat image-generation payloads, some are web UI
//! backends with their own field names, and their responses hide the
//! generated media in a dozen different places.
//!
#![deny(unsafe_code)]
//!
//! ## What it does
//!
//! - **Per-shape profiles**: one credential set per upstream API family,
//!   switchable without losing configuration.
//! - **Creative modes**: generate, edit (one reference image), compose
//!   (2-4 references), and video, validated against what each backend
//!   actually supports.
//! - **Resolution planning**: aspect ratio + base size → backend-aligned
//!   pixel dimensions.
//! - **Defensive extraction**: an ordered-matcher search that finds the
//!   media URL (or base64 payload) in arbitrarily shaped JSON, including
//!   markdown links buried in assistant prose.
//! - **Classified failures**: gateway HTML pages, unparsable bodies,
//!   structured API errors, and timeouts each surface distinctly, with
//!   actionable messages.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mediagen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut profiles = ProfileSet::default();
//!     profiles.upsert(
//!         ApiShape::ChatCompletion,
//!         ProfileConfig::new("https://api.example.com", "sk-...", "gemini-2.5-flash-image"),
//!     );
//!
//!     let mut session = GenerationSession::with_relay(profiles, Arc::new(HttpRelay::new()));
//!     let record = session
//!         .generate(GenerationRequest::new("a lighthouse at dusk").with_aspect_ratio(AspectRatio::SixteenNine))
//!         .await?;
//!     println!("{} ({})", record.media.url, record.media.media_type.as_str());
//!     Ok(())
//! }
//! ```
//!
//! The relay and history store are traits, so tests (and embedders with
//! their own HTTP stack) can substitute both.

pub mod error;
pub mod extract;
pub mod history;
pub mod optimizer;
pub mod orchestrator;
pub mod payload;
pub mod progress;
pub mod prompt;
pub mod relay;
pub mod resolution;
pub mod types;

pub use error::{ErrorCategory, GenError};

/// Common imports for working with the crate.
pub mod prelude {
    pub use crate::error::{ErrorCategory, GenError};
    pub use crate::extract::MediaExtractor;
    pub use crate::history::{HistoryStore, JsonFileHistoryStore, MemoryHistoryStore};
    pub use crate::optimizer::{OptimizedPrompt, PromptOptimizer};
    pub use crate::orchestrator::{GenerationSession, GenerationState};
    pub use crate::relay::{BodyKind, HttpRelay, Relay, RelayResponse};
    pub use crate::types::{
        ApiProfile, ApiShape, AspectRatio, CreativeMode, GeneratedRecord, GenerationRequest,
        MediaResult, MediaType, ProfileConfig, ProfileSet, WEBUI_ENDPOINT,
    };
}

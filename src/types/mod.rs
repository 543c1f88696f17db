//! Core data model: API shapes and profiles, generation requests, and
//! normalized media results.

pub mod media;
pub mod profile;
pub mod request;

pub use media::{GeneratedRecord, MediaResult, MediaType};
pub use profile::{ApiProfile, ApiShape, ProfileConfig, ProfileSet, WEBUI_ENDPOINT};
pub use request::{AspectRatio, CreativeMode, GenerationRequest};

//! Normalized media results and generated records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::request::GenerationRequest;

/// Image or video, decided from the media reference itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::Video)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// A single media reference pulled out of an upstream response. Produced
/// exclusively by the extractor; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResult {
    /// An http(s) URL or a base64 data URI.
    pub url: String,
    pub media_type: MediaType,
}

impl MediaResult {
    /// Classify a discovered URL. Video extensions and `data:video/` URIs
    /// are video; everything else is an image.
    pub fn classify(url: impl Into<String>) -> Self {
        let url = url.into();
        let lower = url.to_lowercase();
        let media_type = if lower.contains(".mp4")
            || lower.contains(".webm")
            || lower.contains(".mov")
            || lower.starts_with("data:video/")
        {
            MediaType::Video
        } else {
            MediaType::Image
        };
        Self { url, media_type }
    }

    /// A reference already known to be video (e.g. a `video_url` field).
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type: MediaType::Video,
        }
    }

    /// A reference already known to be an image.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type: MediaType::Image,
        }
    }
}

/// One successful generation: the media plus a snapshot of the request
/// that produced it. Appended newest-first to the session list; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecord {
    pub media: MediaResult,
    pub request: GenerationRequest,
    pub created_at: DateTime<Utc>,
    /// How many reference images the upstream call actually consumed.
    pub source_image_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(
            MediaResult::classify("https://x/y.mp4").media_type,
            MediaType::Video
        );
        assert_eq!(
            MediaResult::classify("https://x/clip.WebM?sig=1").media_type,
            MediaType::Video
        );
        assert_eq!(
            MediaResult::classify("https://x/y.png").media_type,
            MediaType::Image
        );
    }

    #[test]
    fn classify_data_uris() {
        assert_eq!(
            MediaResult::classify("data:video/mp4;base64,AAAA").media_type,
            MediaType::Video
        );
        assert_eq!(
            MediaResult::classify("data:image/png;base64,AAAA").media_type,
            MediaType::Image
        );
    }

    #[test]
    fn extension_match_is_substring_based() {
        // Signed URLs keep the extension mid-path.
        assert_eq!(
            MediaResult::classify("https://cdn.example/v/y.mov?expires=9").media_type,
            MediaType::Video
        );
    }
}

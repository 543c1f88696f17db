//! The built-in shape matchers, one per known upstream response quirk.

use serde_json::{Map, Value};

use crate::extract::{MediaExtractor, content};
use crate::types::MediaResult;

/// One recognizable response shape. Matchers are consulted in priority
/// order; the first `Some` wins.
pub trait ShapeMatcher: Send + Sync {
    /// Stable name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Attempt to pull a media reference out of `object`. Matchers that
    /// recurse (arrays, fallback) go back through `extractor` so custom
    /// matchers apply at every depth.
    fn try_extract(
        &self,
        object: &Map<String, Value>,
        extractor: &MediaExtractor,
    ) -> Option<MediaResult>;
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// `image_url` as an object with a `url`, or directly as a string.
pub struct ImageUrlField;

impl ShapeMatcher for ImageUrlField {
    fn name(&self) -> &'static str {
        "image_url-field"
    }

    fn try_extract(&self, object: &Map<String, Value>, _: &MediaExtractor) -> Option<MediaResult> {
        let field = object.get("image_url")?;
        if let Some(inner) = field.as_object() {
            let url = inner.get("url").and_then(non_empty_str)?;
            return Some(MediaResult::classify(url));
        }
        non_empty_str(field).map(MediaResult::classify)
    }
}

/// `video_url` string, classified video unconditionally.
pub struct VideoUrlField;

impl ShapeMatcher for VideoUrlField {
    fn name(&self) -> &'static str {
        "video_url-field"
    }

    fn try_extract(&self, object: &Map<String, Value>, _: &MediaExtractor) -> Option<MediaResult> {
        object
            .get("video_url")
            .and_then(non_empty_str)
            .map(MediaResult::video)
    }
}

/// Bare `url` string, accepted only with a recognizable scheme so ids and
/// relative paths don't slip through.
pub struct DirectUrlField;

impl ShapeMatcher for DirectUrlField {
    fn name(&self) -> &'static str {
        "url-field"
    }

    fn try_extract(&self, object: &Map<String, Value>, _: &MediaExtractor) -> Option<MediaResult> {
        let url = object.get("url").and_then(non_empty_str)?;
        if url.starts_with("data:image/") || url.starts_with("data:video/") || url.starts_with("http")
        {
            Some(MediaResult::classify(url))
        } else {
            None
        }
    }
}

/// `images` array: recurse into the first element.
pub struct ImagesArray;

impl ShapeMatcher for ImagesArray {
    fn name(&self) -> &'static str {
        "images-array"
    }

    fn try_extract(
        &self,
        object: &Map<String, Value>,
        extractor: &MediaExtractor,
    ) -> Option<MediaResult> {
        let first = object.get("images")?.as_array()?.first()?;
        extractor.extract(first)
    }
}

/// Assistant `content` text: markdown links, bare URLs, base64 data URIs.
pub struct ContentScan;

impl ShapeMatcher for ContentScan {
    fn name(&self) -> &'static str {
        "content-scan"
    }

    fn try_extract(&self, object: &Map<String, Value>, _: &MediaExtractor) -> Option<MediaResult> {
        object
            .get("content")
            .and_then(Value::as_str)
            .and_then(content::scan_text)
    }
}

/// `data` array (OpenAI images style): recurse into the first element.
pub struct DataArray;

impl ShapeMatcher for DataArray {
    fn name(&self) -> &'static str {
        "data-array"
    }

    fn try_extract(
        &self,
        object: &Map<String, Value>,
        extractor: &MediaExtractor,
    ) -> Option<MediaResult> {
        let first = object.get("data")?.as_array()?.first()?;
        extractor.extract(first)
    }
}

/// Raw `b64_json` payload, synthesized into a PNG data URI.
pub struct B64JsonField;

impl ShapeMatcher for B64JsonField {
    fn name(&self) -> &'static str {
        "b64_json-field"
    }

    fn try_extract(&self, object: &Map<String, Value>, _: &MediaExtractor) -> Option<MediaResult> {
        object
            .get("b64_json")
            .and_then(non_empty_str)
            .map(|b64| MediaResult::image(format!("data:image/png;base64,{b64}")))
    }
}

/// Last resort: walk every remaining key in document order, skipping the
/// deny-list, and return the first nested match. A heuristic — deeply
/// nested unrelated JSON can still produce false positives, which is why
/// everything above runs first.
pub struct RecursiveFallback;

impl ShapeMatcher for RecursiveFallback {
    fn name(&self) -> &'static str {
        "recursive-fallback"
    }

    fn try_extract(
        &self,
        object: &Map<String, Value>,
        extractor: &MediaExtractor,
    ) -> Option<MediaResult> {
        object
            .iter()
            .filter(|(key, _)| !MediaExtractor::is_denied_key(key))
            .find_map(|(_, value)| extractor.extract(value))
    }
}

//! Media extraction
//!
//! Upstream providers disagree wildly about where the generated media
//! lives in a response: `image_url` objects, bare `url` strings, `images`
//! and `data` arrays, markdown inside assistant text, raw `b64_json`
//! payloads. The extractor runs an ordered sequence of shape-matchers over
//! a parsed body and returns the first match, falling back to a
//! deny-listed recursive walk. It is total: malformed input yields `None`,
//! never a panic.
//!
//! The matcher order encodes upstream shape popularity and must be
//! preserved; several providers are only handled correctly because a more
//! specific matcher runs before the generic ones. New upstream shapes get
//! a new matcher registered ahead of the recursive fallback rather than
//! edits to the traversal itself.

mod content;
mod matchers;

pub use content::scan_text;
pub use matchers::ShapeMatcher;

use serde_json::Value;

use crate::types::MediaResult;

/// Keys whose values echo the request back (prompt text and friends);
/// recursing into them produces false positives on URLs the user typed.
const DENY_KEYS: [&str; 5] = ["prompt", "negative_prompt", "text", "role", "type"];

/// Ordered-matcher media extractor over arbitrary JSON.
pub struct MediaExtractor {
    matchers: Vec<Box<dyn ShapeMatcher>>,
}

impl Default for MediaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaExtractor {
    /// The standard matcher stack, in priority order.
    pub fn new() -> Self {
        Self {
            matchers: vec![
                Box::new(matchers::ImageUrlField),
                Box::new(matchers::VideoUrlField),
                Box::new(matchers::DirectUrlField),
                Box::new(matchers::ImagesArray),
                Box::new(matchers::ContentScan),
                Box::new(matchers::DataArray),
                Box::new(matchers::B64JsonField),
                Box::new(matchers::RecursiveFallback),
            ],
        }
    }

    /// Register a custom matcher ahead of the recursive fallback, after
    /// all built-in field matchers.
    pub fn register(mut self, matcher: Box<dyn ShapeMatcher>) -> Self {
        let at = self.matchers.len().saturating_sub(1);
        self.matchers.insert(at, matcher);
        self
    }

    /// Locate the most plausible media reference in `value`.
    pub fn extract(&self, value: &Value) -> Option<MediaResult> {
        match value {
            Value::Object(map) => self
                .matchers
                .iter()
                .find_map(|matcher| matcher.try_extract(map, self)),
            // A bare array has no fields to match; only the recursive walk
            // applies, element by element in order.
            Value::Array(items) => items.iter().find_map(|item| self.extract(item)),
            _ => None,
        }
    }

    pub(crate) fn is_denied_key(key: &str) -> bool {
        DENY_KEYS.contains(&key)
    }
}

//! Text scanning for media references inside assistant replies.
//!
//! Chat backends often return the media as a markdown link or a bare URL
//! in prose. Scan order is significant: video-specific patterns run before
//! the generic ones so a `.mp4` link is never misclassified by the generic
//! URL pattern, and markdown forms run before their bare-text equivalents.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::MediaResult;

lazy_static! {
    static ref MD_VIDEO_LINK: Regex =
        Regex::new(r"(?i)!\[.*?\]\((https?://[^\s)]+\.(?:mp4|webm|mov)[^\s)]*)\)").unwrap();
    static ref MD_IMAGE_LINK: Regex = Regex::new(r"!\[.*?\]\((https?://[^\s)]+)\)").unwrap();
    static ref BARE_VIDEO_URL: Regex =
        Regex::new(r#"(?i)(https?://[^\s)"']+\.(?:mp4|webm|mov)[^\s)"']*)"#).unwrap();
    static ref BARE_URL: Regex = Regex::new(r#"(https?://[^\s)"']+)"#).unwrap();
    static ref MD_BASE64_IMAGE: Regex =
        Regex::new(r"!\[.*?\]\((data:image/[\w+]+;base64,[^\s)]+)\)").unwrap();
    static ref BARE_BASE64_IMAGE: Regex =
        Regex::new(r"(data:image/[\w+]+;base64,[A-Za-z0-9+/=]+)").unwrap();
}

/// Scan assistant text for a media reference, in fixed priority order.
pub fn scan_text(content: &str) -> Option<MediaResult> {
    if let Some(url) = first_capture(&MD_VIDEO_LINK, content) {
        return Some(MediaResult::video(url));
    }
    if let Some(url) = first_capture(&MD_IMAGE_LINK, content) {
        return Some(MediaResult::classify(url));
    }
    if let Some(url) = first_capture(&BARE_VIDEO_URL, content) {
        return Some(MediaResult::video(url));
    }
    if let Some(url) = first_capture(&BARE_URL, content) {
        return Some(MediaResult::classify(url));
    }
    if let Some(uri) = first_capture(&MD_BASE64_IMAGE, content) {
        return Some(MediaResult::image(uri));
    }
    if let Some(uri) = first_capture(&BARE_BASE64_IMAGE, content) {
        return Some(MediaResult::image(uri));
    }
    None
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

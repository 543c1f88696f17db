//! Prompt enhancement
//!
//! Upstream models receive the user prompt plus a structured `[画面要求]`
//! footer naming the resolution tag, ratio, and target pixel size. The
//! footer text is a protocol constant: providers parse it literally, so
//! the exact wording and line structure must not change.

use crate::resolution;
use crate::types::{ApiShape, AspectRatio};

/// Append the picture-requirements footer to a prompt.
pub fn enhance(
    prompt: &str,
    ratio: AspectRatio,
    (width, height): (u32, u32),
    shape: ApiShape,
    base_size: u32,
) -> String {
    let tag = tag_line(shape, base_size);
    format!(
        "{prompt}\n\n[画面要求]\n- {tag}\n- 比例 {ratio}\n- 目标尺寸约 {width}x{height}px",
        ratio = ratio.as_tag(),
    )
}

fn tag_line(shape: ApiShape, base_size: u32) -> String {
    let tag = resolution::resolution_tag(base_size, shape);
    if shape == ApiShape::WebUiGenerate {
        "SD 分辨率".to_string()
    } else {
        format!("{tag}分辨率")
    }
}

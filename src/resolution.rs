//! Resolution planning
//!
//! Converts an aspect ratio plus a base pixel dimension into concrete
//! width/height. Diffusion backends reject unaligned dimensions, so the
//! rounding rules here are load-bearing: every axis is rounded to the
//! nearest 8; the web UI backend additionally requires 64-alignment with a
//! 256-pixel floor per axis.

use crate::types::{ApiShape, AspectRatio};

/// Plan concrete pixel dimensions for a generation call.
///
/// The total pixel budget is `base_size²`, distributed across the ratio:
/// `scale = sqrt(base_size² / (w·h))`, then each axis is rounded to the
/// nearest multiple of 8. The web UI shape gets the stricter second stage.
pub fn plan(ratio: AspectRatio, base_size: u32, shape: ApiShape) -> (u32, u32) {
    let (width, height) = plan_eight_aligned(ratio, base_size);
    if shape == ApiShape::WebUiGenerate {
        (normalize_64(width), normalize_64(height))
    } else {
        (width, height)
    }
}

fn plan_eight_aligned(ratio: AspectRatio, base_size: u32) -> (u32, u32) {
    let (w, h) = ratio.ratio();
    let total_pixels = f64::from(base_size) * f64::from(base_size);
    let scale = (total_pixels / f64::from(w * h)).sqrt();
    (round_to_eight(f64::from(w) * scale), round_to_eight(f64::from(h) * scale))
}

fn round_to_eight(value: f64) -> u32 {
    ((value / 8.0).round() as u32) * 8
}

fn normalize_64(value: u32) -> u32 {
    let rounded = ((f64::from(value) / 64.0).round() as u32) * 64;
    rounded.max(256)
}

/// The resolution tag used in the enhanced-prompt footer: "4K" at 4096,
/// "2K" at 2048, otherwise "1K" — but always "SD" for the web UI shape,
/// whose backend works at SD scale regardless of the requested base size.
pub fn resolution_tag(base_size: u32, shape: ApiShape) -> &'static str {
    if shape == ApiShape::WebUiGenerate {
        return "SD";
    }
    match base_size {
        4096 => "4K",
        2048 => "2K",
        _ => "1K",
    }
}

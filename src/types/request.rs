//! Generation request types: creative modes, aspect ratios, and the
//! request itself.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// What kind of creative operation a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreativeMode {
    /// Text-to-media.
    Generate,
    /// Single reference image plus instructions.
    Edit,
    /// Blend 2-4 reference images.
    Compose,
    /// Text- or image-to-video.
    Video,
}

impl CreativeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreativeMode::Generate => "generate",
            CreativeMode::Edit => "edit",
            CreativeMode::Compose => "compose",
            CreativeMode::Video => "video",
        }
    }
}

impl std::fmt::Display for CreativeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine supported aspect ratios.
///
/// Parsing is total: an unrecognized tag falls back to square, matching the
/// resolution planner's never-errors contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    FourThree,
    ThreeFour,
    SixteenNine,
    NineSixteen,
    TwoThree,
    ThreeTwo,
    TwentyOneNine,
    NineTwentyOne,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 9] = [
        AspectRatio::Square,
        AspectRatio::FourThree,
        AspectRatio::ThreeFour,
        AspectRatio::SixteenNine,
        AspectRatio::NineSixteen,
        AspectRatio::TwoThree,
        AspectRatio::ThreeTwo,
        AspectRatio::TwentyOneNine,
        AspectRatio::NineTwentyOne,
    ];

    /// The width:height pair this tag stands for.
    pub fn ratio(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1, 1),
            AspectRatio::FourThree => (4, 3),
            AspectRatio::ThreeFour => (3, 4),
            AspectRatio::SixteenNine => (16, 9),
            AspectRatio::NineSixteen => (9, 16),
            AspectRatio::TwoThree => (2, 3),
            AspectRatio::ThreeTwo => (3, 2),
            AspectRatio::TwentyOneNine => (21, 9),
            AspectRatio::NineTwentyOne => (9, 21),
        }
    }

    /// The user-facing "w:h" tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::FourThree => "4:3",
            AspectRatio::ThreeFour => "3:4",
            AspectRatio::SixteenNine => "16:9",
            AspectRatio::NineSixteen => "9:16",
            AspectRatio::TwoThree => "2:3",
            AspectRatio::ThreeTwo => "3:2",
            AspectRatio::TwentyOneNine => "21:9",
            AspectRatio::NineTwentyOne => "9:21",
        }
    }

    /// Parse a "w:h" tag; unknown tags map to square.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.as_tag() == tag)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One generation attempt's full input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt. Must be non-empty after trimming.
    pub prompt: String,
    /// What to avoid; carried through to backends that accept it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Target aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Base pixel dimension; the planner derives width/height from it.
    pub base_size: u32,
    /// Inference steps (web UI shape only).
    pub steps: u32,
    /// Guidance scale (web UI shape only).
    pub guidance: f32,
    /// Random seed; `None` lets the backend choose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Creative mode.
    pub mode: CreativeMode,
    /// Reference images, each a URL or base64 data URI, in upload order.
    #[serde(default)]
    pub reference_images: Vec<String>,
    /// Per-request model override; wins over the profile default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_override: Option<String>,
}

impl GenerationRequest {
    /// A text-to-image request with the standard defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            aspect_ratio: AspectRatio::Square,
            base_size: 1024,
            steps: 30,
            guidance: 7.5,
            seed: None,
            mode: CreativeMode::Generate,
            reference_images: Vec::new(),
            model_override: None,
        }
    }

    pub fn with_mode(mut self, mode: CreativeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_base_size(mut self, base_size: u32) -> Self {
        self.base_size = base_size;
        self
    }

    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }

    pub fn with_reference_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_override = Some(model.into());
        self
    }
}

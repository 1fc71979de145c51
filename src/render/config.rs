use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::color::Palette;

/// Tag that overlays every histogram on one canvas.
pub const TOGETHER_TAG: &str = "together";
/// Tag that draws each histogram on its own canvas.
pub const SEPARATE_TAG: &str = "separate";

/// Which histograms go on which image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw nothing
    Skip,
    /// One image per histogram, `c_<category>_<variable>`
    Separate,
    /// Every histogram on one image, `c_JOIN`
    Together,
    /// Histograms whose category label contains the tag on one image, `c_<tag>`
    Tagged(String),
}

impl RenderMode {
    /// Mode named by a tag; the empty tag draws nothing.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "" => RenderMode::Skip,
            SEPARATE_TAG => RenderMode::Separate,
            TOGETHER_TAG => RenderMode::Together,
            other => RenderMode::Tagged(other.to_string()),
        }
    }

    /// Tag naming this mode.
    pub fn tag(&self) -> &str {
        match self {
            RenderMode::Skip => "",
            RenderMode::Separate => SEPARATE_TAG,
            RenderMode::Together => TOGETHER_TAG,
            RenderMode::Tagged(tag) => tag,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Image file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Rasterized PNG (requires the `png` feature)
    #[default]
    Png,
    /// The SVG scene itself
    Svg,
}

impl ImageFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory receiving the images, created if missing
    pub output_dir: PathBuf,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Image format
    pub format: ImageFormat,
    /// Overlay colors and markers
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Plots"),
            width: 1000,
            height: 1000,
            format: ImageFormat::Png,
            palette: Palette::default(),
        }
    }
}

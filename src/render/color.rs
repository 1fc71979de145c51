use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Black, the marker color of single-histogram plots.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s)))
    }
}

/// Marker shapes, numbered like the ROOT marker styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Full circle (20)
    FullCircle,
    /// Full triangle pointing up (22)
    FullTriangleUp,
    /// Full triangle pointing down (23)
    FullTriangleDown,
    /// Open circle (24)
    OpenCircle,
    /// Open square (25)
    OpenSquare,
    /// Open triangle pointing up (26)
    OpenTriangleUp,
    /// Open diamond (27)
    OpenDiamond,
    /// Open cross (28)
    OpenCross,
}

impl MarkerShape {
    /// Shape of a ROOT marker style; unknown styles draw as a full circle.
    pub fn from_root_style(style: u8) -> Self {
        match style {
            22 => MarkerShape::FullTriangleUp,
            23 => MarkerShape::FullTriangleDown,
            24 => MarkerShape::OpenCircle,
            25 => MarkerShape::OpenSquare,
            26 => MarkerShape::OpenTriangleUp,
            27 => MarkerShape::OpenDiamond,
            28 => MarkerShape::OpenCross,
            _ => MarkerShape::FullCircle,
        }
    }

    /// Whether the shape is drawn filled.
    pub fn is_filled(&self) -> bool {
        matches!(
            self,
            MarkerShape::FullCircle | MarkerShape::FullTriangleUp | MarkerShape::FullTriangleDown
        )
    }
}

/// Colors and marker styles cycled by drawing order in overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Marker colors
    pub colors: Vec<Color>,
    /// ROOT marker styles
    pub markers: Vec<u8>,
}

impl Default for Palette {
    /// kRed, kGreen+2, kBlue+2, kOrange+2, kViolet+2, kMagenta+2, kBlack with
    /// marker styles 22 to 28.
    fn default() -> Self {
        Self {
            colors: vec![
                Color::rgb(255, 0, 0),
                Color::rgb(0, 153, 0),
                Color::rgb(0, 0, 153),
                Color::rgb(204, 102, 0),
                Color::rgb(102, 0, 204),
                Color::rgb(153, 0, 153),
                Color::BLACK,
            ],
            markers: vec![22, 23, 24, 25, 26, 27, 28],
        }
    }
}

impl Palette {
    /// Style of the `index`-th drawn histogram. Wraps around.
    pub fn style(&self, index: usize) -> (Color, MarkerShape) {
        let color = if self.colors.is_empty() {
            Color::BLACK
        } else {
            self.colors[index % self.colors.len()]
        };
        let marker = if self.markers.is_empty() {
            MarkerShape::FullCircle
        } else {
            MarkerShape::from_root_style(self.markers[index % self.markers.len()])
        };
        (color, marker)
    }
}

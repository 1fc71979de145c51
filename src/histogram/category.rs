use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Beam configuration of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Beam {
    /// Both proton-lead beam directions combined
    #[serde(rename = "PA")]
    PA,
    /// Proton-lead, proton beam going clockwise
    #[serde(rename = "pPb")]
    PPb,
    /// Lead-proton, lead beam going clockwise
    #[serde(rename = "Pbp")]
    Pbp,
    /// Proton-proton reference
    #[serde(rename = "PP")]
    PP,
}

impl Beam {
    /// Every beam configuration.
    pub const ALL: [Beam; 4] = [Beam::PA, Beam::PPb, Beam::Pbp, Beam::PP];

    /// Name used in category labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Beam::PA => "PA",
            Beam::PPb => "pPb",
            Beam::Pbp => "Pbp",
            Beam::PP => "PP",
        }
    }

    /// Beam named inside a label, looking for the direction-specific names first.
    pub fn detect(label: &str) -> Option<Beam> {
        [Beam::PPb, Beam::Pbp, Beam::PA, Beam::PP]
            .into_iter()
            .find(|beam| label.contains(beam.as_str()))
    }
}

impl fmt::Display for Beam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Beam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Beam::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("unknown beam '{}'", s))
    }
}

/// Histogram category: a sample type in one beam configuration.
///
/// Categories order by their label as a byte string, so `DATA_PA` comes
/// before `DATA_PP`, `DATA_Pbp` and `DATA_pPb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Sample type, e.g. `DATA` or `MC`
    pub sample: String,
    /// Beam configuration
    pub beam: Beam,
}

impl Category {
    /// Create a category.
    pub fn new(sample: impl Into<String>, beam: Beam) -> Self {
        Self {
            sample: sample.into(),
            beam,
        }
    }

    /// Label `<sample>_<beam>`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.sample, self.beam)
    }

    /// Bytes of [`Category::label`] without allocating it.
    fn label_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.sample
            .bytes()
            .chain(std::iter::once(b'_'))
            .chain(self.beam.as_str().bytes())
    }

    /// Whether the category label contains `text`.
    ///
    /// Used both to pick the categories filled from a sample label and to pick
    /// the histograms of a tagged overlay.
    pub fn matches(&self, text: &str) -> bool {
        self.label().contains(text)
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label_bytes()
            .cmp(other.label_bytes())
            .then_with(|| self.sample.cmp(&other.sample))
            .then_with(|| self.beam.cmp(&other.beam))
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.sample, self.beam)
    }
}

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binning and axis label of a histogram variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarInfo {
    /// X-axis title
    pub label: String,
    /// Number of bins
    #[serde(rename = "bins")]
    pub n_bins: usize,
    /// Lower edge of the first bin
    pub low: f64,
    /// Upper edge of the last bin
    pub high: f64,
}

impl VarInfo {
    /// Create a variable description.
    pub fn new(label: impl Into<String>, n_bins: usize, low: f64, high: f64) -> Self {
        Self {
            label: label.into(),
            n_bins,
            low,
            high,
        }
    }

    /// At least one bin over a finite, non-empty range.
    pub fn is_valid(&self) -> bool {
        self.n_bins > 0 && self.low.is_finite() && self.high.is_finite() && self.high > self.low
    }
}

/// Histogram variables of the chi analysis.
///
/// Variables order by name, so `ChiB_M` comes before `ChiC_M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    /// Chi_c candidate mass
    #[serde(rename = "ChiC_M")]
    ChicMass,
    /// Chi_b candidate mass
    #[serde(rename = "ChiB_M")]
    ChibMass,
}

impl Variable {
    /// Every variable, in booking order.
    pub const ALL: [Variable; 2] = [Variable::ChibMass, Variable::ChicMass];

    /// Name used in histogram and image file names.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::ChicMass => "ChiC_M",
            Variable::ChibMass => "ChiB_M",
        }
    }

    /// Default binning.
    pub fn default_info(&self) -> VarInfo {
        match self {
            Variable::ChicMass => VarInfo::new("X_{C} Mass (GeV/c^{2})", 100, 3.0, 4.0),
            Variable::ChibMass => VarInfo::new("X_{B} Mass (GeV/c^{2})", 100, 9.0, 12.0),
        }
    }

    /// Variable filled by candidates of a chi type (1 = chi_c, 2 = chi_b).
    pub fn for_chi_type(chi_type: u8) -> Option<Variable> {
        match chi_type {
            1 => Some(Variable::ChicMass),
            2 => Some(Variable::ChibMass),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Variable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("unknown variable '{}'", s))
    }
}

//! TOML configuration of the chi analysis.
//!
//! Every section is optional; an empty file gives the settings of the
//! reference pA run with no samples.
//!
//! ```toml
//! # chiforest.toml
//! sample_types = ["DATA"]
//! beams = ["PA"]
//! progress_interval = 1000000
//!
//! [samples]
//! DATA = "HiChiForest.zip"
//!
//! [variables.ChiC_M]
//! label = "X_{C} Mass (GeV/c^{2})"
//! bins = 100
//! low = 3.0
//! high = 4.0
//!
//! [cuts]
//! eta_boundary = 1.6
//!
//! [render]
//! mode = "separate"
//! output_dir = "Plots"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::histogram::{Beam, VarInfo, Variable};
use crate::render::{RenderConfig, RenderMode, SEPARATE_TAG};

/// Sample type whose label does not carry a beam suffix.
pub const DATA_SAMPLE: &str = "DATA";

/// Errors loading or validating an analysis configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for the configuration schema
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `[variables.<name>]` section names an unknown variable
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// A variable has no bins or an empty range
    #[error("Invalid binning for variable '{0}'")]
    InvalidBinning(String),

    /// Any other out-of-range setting
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Setting name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Muon acceptance cuts.
///
/// A muon passes with `|eta| < eta_boundary && pt > pt_min_central` or
/// `|eta| > eta_boundary && pt > pt_min_forward`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    /// Pseudorapidity splitting the central and forward regions
    pub eta_boundary: f64,
    /// Minimum transverse momentum in the central region (GeV/c)
    pub pt_min_central: f64,
    /// Minimum transverse momentum in the forward region (GeV/c)
    pub pt_min_forward: f64,
    /// Require at least one of the two muons to be a global muon
    pub require_global: bool,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            eta_boundary: 1.6,
            pt_min_central: 3.0,
            pt_min_forward: 3.0,
            require_global: false,
        }
    }
}

/// Reference dimuon masses of the candidate mass cross-check (GeV/c^2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    /// J/psi mass, checked for chi_c candidates
    pub chic_reference: f64,
    /// Upsilon(1S) mass, checked for chi_b candidates
    pub chib_reference: f64,
    /// Largest allowed deviation
    pub tolerance: f64,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            chic_reference: 3.096916,
            chib_reference: 9.46030,
            tolerance: 0.001,
        }
    }
}

impl SanityConfig {
    /// Reference mass of a chi type, `None` for types without a check.
    pub fn reference(&self, chi_type: u8) -> Option<f64> {
        match chi_type {
            1 => Some(self.chic_reference),
            2 => Some(self.chib_reference),
            _ => None,
        }
    }
}

/// Inclusive run number range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    /// First accepted run
    pub first: u32,
    /// Last accepted run
    pub last: u32,
}

impl RunRange {
    /// Whether `run` lies in the range.
    pub fn contains(&self, run: u32) -> bool {
        (self.first..=self.last).contains(&run)
    }
}

/// Run gates of the beam-direction subsets of DATA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Runs taken with the pPb orientation
    #[serde(rename = "pPb")]
    pub ppb: RunRange,
    /// Runs taken with the Pbp orientation
    #[serde(rename = "Pbp")]
    pub pbp: RunRange,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ppb: RunRange {
                first: 285952,
                last: 286504,
            },
            pbp: RunRange {
                first: 285410,
                last: 285951,
            },
        }
    }
}

impl GateConfig {
    /// Run range of a beam, `None` when every run is kept.
    pub fn range(&self, beam: Beam) -> Option<RunRange> {
        match beam {
            Beam::PPb => Some(self.ppb),
            Beam::Pbp => Some(self.pbp),
            Beam::PA | Beam::PP => None,
        }
    }
}

/// `[render]` section: the mode plus the image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Render tag: `separate`, `together`, any category tag, or empty to skip
    pub mode: String,
    /// Image settings
    #[serde(flatten)]
    pub image: RenderConfig,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: SEPARATE_TAG.to_string(),
            image: RenderConfig::default(),
        }
    }
}

impl RenderSettings {
    /// Render mode named by `mode`.
    pub fn mode(&self) -> RenderMode {
        RenderMode::from_tag(&self.mode)
    }
}

/// Root configuration of the chi analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Forest path per sample label (`DATA`, `MC_pPb`, ...)
    pub samples: BTreeMap<String, PathBuf>,
    /// Sample types combined with `beams` into labels
    pub sample_types: Vec<String>,
    /// Beam configurations
    pub beams: Vec<Beam>,
    /// Histogram binning per variable name
    pub variables: BTreeMap<String, VarInfo>,
    /// Muon acceptance
    pub cuts: CutConfig,
    /// Candidate mass cross-check
    pub sanity: SanityConfig,
    /// DATA run gates
    pub gates: GateConfig,
    /// Rendering
    pub render: RenderSettings,
    /// Rows between two progress lines
    pub progress_interval: u64,
    /// Rows decoded per batch
    pub batch_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            samples: BTreeMap::new(),
            sample_types: vec![DATA_SAMPLE.to_string()],
            beams: vec![Beam::PA],
            variables: Variable::ALL
                .into_iter()
                .map(|v| (v.name().to_string(), v.default_info()))
                .collect(),
            cuts: CutConfig::default(),
            sanity: SanityConfig::default(),
            gates: GateConfig::default(),
            render: RenderSettings::default(),
            progress_interval: 1_000_000,
            batch_size: crate::reader::ReaderConfig::default().batch_size,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// Relative sample paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            for sample_path in config.samples.values_mut() {
                if sample_path.is_relative() && !sample_path.to_string_lossy().contains("://") {
                    *sample_path = base.join(&*sample_path);
                }
            }
        }
        Ok(config)
    }

    /// Parsed variable binnings.
    pub fn variables(&self) -> Result<BTreeMap<Variable, VarInfo>, ConfigError> {
        self.variables
            .iter()
            .map(|(name, info)| {
                let variable = Variable::from_str(name)
                    .map_err(|_| ConfigError::UnknownVariable(name.clone()))?;
                if !info.is_valid() {
                    return Err(ConfigError::InvalidBinning(name.clone()));
                }
                Ok((variable, info.clone()))
            })
            .collect()
    }

    /// Check every setting that parsing alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.variables()?;
        if self.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.sanity.tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "sanity.tolerance",
                reason: format!("{} is not a non-negative number", self.sanity.tolerance),
            });
        }
        Ok(())
    }
}

impl FromStr for AnalysisConfig {
    type Err = ConfigError;

    /// Parse and validate configuration from a TOML string.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

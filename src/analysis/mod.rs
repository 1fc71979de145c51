//! # Chi Candidate Selection
//!
//! Walks the muon and conversion directories of each sample forest in
//! lockstep, cross-checks their event identifiers, and fills the chi_c and
//! chi_b mass histograms with the candidates whose muons pass the acceptance
//! cuts.
//!
//! Fatal conditions abort the whole run: a forest that cannot be opened,
//! directories with different row counts or event identifiers, and a
//! candidate whose recovered dimuon mass is off the J/psi or Upsilon(1S)
//! mass by more than the tolerance.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::str::FromStr;
//! use chiforest::analysis::{run, AnalysisConfig};
//!
//! let config = AnalysisConfig::from_str(r#"
//!     [samples]
//!     DATA = "HiChiForest.zip"
//! "#)?;
//! let outcome = run(config)?;
//! println!("{} candidates accepted", outcome.stats.candidates_accepted);
//! # Ok::<(), chiforest::analysis::AnalysisError>(())
//! ```

mod config;
mod driver;
mod error;
mod selection;

#[cfg(test)]
mod tests;

pub use config::{
    AnalysisConfig, ConfigError, CutConfig, GateConfig, RenderSettings, RunRange, SanityConfig,
    DATA_SAMPLE,
};
pub use driver::{AnalysisOutcome, AnalysisStats, ChiAnalysis};
pub use error::AnalysisError;
pub use selection::{dimuon_accepted, muon_accepted, Candidate, ConversionRow, MuonRow};

/// Run the complete analysis described by `config`.
pub fn run(config: AnalysisConfig) -> Result<AnalysisOutcome, AnalysisError> {
    ChiAnalysis::new(config)?.run()
}

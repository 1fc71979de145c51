use crate::reader::ReaderError;
use crate::render::RenderError;

use super::config::ConfigError;

/// Errors that abort an analysis run
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Opening, activating or advancing a forest failed
    #[error("Reader error: {0}")]
    Reader(#[from] ReaderError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing the plots failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A sample label has no configured forest
    #[error("No forest configured for sample '{0}'")]
    UnknownSample(String),

    /// The muon and conversion directories have different row counts
    #[error("Inconsistent number of entries in sample '{sample}': {muon} muon rows, {conversion} conversion rows")]
    EntryCountMismatch {
        /// Sample label
        sample: String,
        /// Rows of the muon directory
        muon: usize,
        /// Rows of the conversion directory
        conversion: usize,
    },

    /// The two directories disagree on the run number of a row
    #[error("Inconsistent run number in sample '{sample}' at row {row}: muon {muon}, conversion {conversion}")]
    RunMismatch {
        /// Sample label
        sample: String,
        /// Row offset
        row: usize,
        /// Run number of the muon directory
        muon: u32,
        /// Run number of the conversion directory
        conversion: u32,
    },

    /// The two directories disagree on the event number of a row
    #[error("Inconsistent event number in sample '{sample}' at row {row}: muon {muon}, conversion {conversion}")]
    EventMismatch {
        /// Sample label
        sample: String,
        /// Row offset
        row: usize,
        /// Event number of the muon directory
        muon: u64,
        /// Event number of the conversion directory
        conversion: u64,
    },

    /// A candidate's reconstructed dimuon mass is off its reference
    #[error("Candidate {candidate} of type {chi_type} in sample '{sample}' at row {row} has dimuon mass {mass}, expected {expected}")]
    MassSanity {
        /// Sample label
        sample: String,
        /// Row offset
        row: usize,
        /// Candidate index within the row
        candidate: usize,
        /// Chi type of the candidate
        chi_type: u8,
        /// Reconstructed mass
        mass: f32,
        /// Reference mass
        expected: f64,
    },
}

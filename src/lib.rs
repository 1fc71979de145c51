//! # chiforest - chi_c / chi_b candidate selection over columnar forests
//!
//! `chiforest` reads the muon and photon-conversion directories of a
//! heavy-ion analysis forest stored as Parquet tables, pairs dimuons with
//! conversions into chi_c / chi_b candidates, and fills and draws their mass
//! histograms.
//!
//! ## Key Features
//!
//! - **Linked Row Groups**: the Event and Reco tables of a directory advance in
//!   lockstep, one row offset per event.
//!
//! - **Two-Phase Column Activation**: analyses declare the columns they read up
//!   front; only those are decoded, with a Parquet projection.
//!
//! - **Typed Column Schema**: every column is an enum variant with a fixed Arrow
//!   type, so a misspelled column is a compile error rather than a silent zero.
//!
//! - **Single-File Containers**: forests are ZIP containers of stored Parquet
//!   entries, or plain directory bundles.
//!
//! - **Histogram Rendering**: separate or overlaid plots written as PNG or SVG.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::str::FromStr;
//! use chiforest::analysis::{run, AnalysisConfig};
//!
//! let config = AnalysisConfig::from_str(r#"
//!     sample_types = ["DATA"]
//!     beams = ["pPb", "Pbp"]
//!
//!     [samples]
//!     DATA = "HiChiForest.zip"
//! "#)?;
//!
//! let outcome = run(config)?;
//! println!(
//!     "Number of DiMuons: {} and number of conversions: {}",
//!     outcome.stats.dimuons_used, outcome.stats.conversions_used
//! );
//! # Ok::<(), chiforest::analysis::AnalysisError>(())
//! ```
//!
//! ## Forest Layout
//!
//! ```text
//! HiChiForest.zip
//! ├── convAna/Conversion_Event.parquet   # run, lumi, event number, vertex
//! ├── convAna/Conversion_Reco.parquet    # dimuon + conversion candidates
//! ├── muonAna/Muon_Event.parquet
//! └── muonAna/Muon_Reco.parquet          # muons and dimuons
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: enumerated column schema and Arrow schema builders
//! - [`reader`]: [`reader::RowSource`] and the typed directory readers
//! - [`writer`]: [`writer::ForestWriter`] for building forests
//! - [`kinematics`]: four-vectors
//! - [`histogram`]: histogram booking and filling
//! - [`render`]: plot drawing
//! - [`analysis`]: the chi candidate selection

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod analysis;
pub mod histogram;
pub mod kinematics;
pub mod reader;
pub mod render;
pub mod schema;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::analysis::{
        run, AnalysisConfig, AnalysisError, AnalysisOutcome, AnalysisStats, ChiAnalysis,
    };
    pub use crate::histogram::{Beam, Category, Hist1D, HistogramStore, VarInfo, Variable};
    pub use crate::kinematics::{LorentzVector, Vector3};
    pub use crate::reader::{ConversionTree, MuonTree, ReaderConfig, ReaderError, RowSource};
    pub use crate::render::{ImageFormat, RenderConfig, RenderError, RenderMode};
    pub use crate::schema::{ColumnSet, ConversionColumn, MuonColumn, RowGroupKind};
    pub use crate::writer::{
        ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco, WriterConfig,
        WriterError,
    };
}

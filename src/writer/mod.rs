//! # Forest Writer Module
//!
//! This module writes forests: the Parquet tables of the conversion and muon
//! directories, either into a ZIP container or a directory bundle.
//!
//! ## Design Principles
//!
//! 1. **Same Layout as the Reader**: table paths and schemas come from
//!    [`crate::schema`], so a written forest always opens with
//!    [`crate::reader::RowSource`].
//!
//! 2. **Self-Contained Files**: the format version and row group name are
//!    embedded in each Parquet footer.
//!
//! 3. **Stored ZIP Entries**: Parquet handles its own compression (ZSTD by
//!    default), so container entries are not deflated again.

mod config;
mod error;
mod records;
mod stats;
mod writer_impl;

#[cfg(test)]
mod tests;

pub use config::WriterConfig;
pub use error::WriterError;
pub use records::{ConversionReco, EventRecord, MuonReco};
pub use stats::WriterStats;
pub use writer_impl::{ForestLayout, ForestWriter};

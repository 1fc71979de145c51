//! # Forest Reader Module
//!
//! This module provides [`RowSource`], a synchronized reader over the row group
//! tables of one analysis directory, and the typed facades [`ConversionTree`]
//! and [`MuonTree`] built on top of it.
//!
//! ## Features
//!
//! - **Linked Row Groups**: the Event and Reco tables advance together, row offset
//!   by row offset; the first table found is the primary
//! - **Two-Phase Activation**: required columns are declared with
//!   [`RowSource::activate`]; only those are decoded from storage
//! - **Lazy Composites**: Lorentz-vector collections are decoded on first access
//!   per row and cached until the next advance
//! - **Container Support**: read both ZIP containers and directory bundles
//!
//! ## Example
//!
//! ```rust,no_run
//! use chiforest::reader::ConversionTree;
//! use chiforest::schema::ConversionColumn;
//!
//! let mut tree = ConversionTree::open("HiChiForest.zip")?;
//! tree.activate(&[ConversionColumn::EventRun, ConversionColumn::RecoChiMass])?;
//! for row in 0..tree.row_count() {
//!     tree.advance(row)?;
//!     println!("run {}: {} candidates", tree.event_run(), tree.reco_chi_mass().len());
//! }
//! # Ok::<(), chiforest::reader::ReaderError>(())
//! ```

mod activation;
mod config;
mod error;
mod open;
mod row;
mod trees;
mod utils;
mod value;

#[cfg(test)]
mod tests;

use std::cell::{Cell, OnceCell};
use std::marker::PhantomData;
use std::path::PathBuf;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::kinematics::LorentzVector;
pub use crate::schema::RowGroupKind;
use crate::schema::ColumnSet;

pub use config::ReaderConfig;
pub use error::ReaderError;
pub use trees::{ConversionTree, MuonTree};
pub use value::ColumnValue;

use config::TableSource;

/// Activation state of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStatus {
    /// The column does not exist in the forest
    Missing,
    /// The column exists but is not decoded
    Inactive,
    /// The column is decoded and loaded on every advance
    Active,
}

/// Synchronized row reader over the linked row groups of one analysis directory.
///
/// `C` is the enumerated column schema of the directory, e.g.
/// [`crate::schema::ConversionColumn`].
pub struct RowSource<C: ColumnSet> {
    path: PathBuf,
    config: ReaderConfig,
    /// Linked tables, primary first
    groups: Vec<LinkedGroup>,
    /// Per column, indexed by `ColumnSet::index`
    status: Vec<ColumnStatus>,
    bindings: Vec<Option<Binding>>,
    row: Option<usize>,
    scratch: Vec<ColumnValue>,
    /// Decoded Lorentz lists of the current row, or the decoder message
    composites: Vec<OnceCell<Result<Vec<LorentzVector>, String>>>,
    composite_reads: Cell<u64>,
    _columns: PhantomData<C>,
}

/// One row group table linked to the primary.
struct LinkedGroup {
    kind: RowGroupKind,
    table: TableSource,
    schema: SchemaRef,
    num_rows: usize,
    /// Root column indices currently decoded, ascending
    projected: Vec<usize>,
    batches: Vec<RecordBatch>,
    /// First row of each batch
    batch_starts: Vec<usize>,
}

/// Where an active column lives in the decoded batches.
#[derive(Debug, Clone, Copy)]
struct Binding {
    group: usize,
    column: usize,
}

impl LinkedGroup {
    /// Batch holding `row` and the offset of the row inside it.
    fn locate(&self, row: usize) -> Option<(&RecordBatch, usize)> {
        let idx = self.batch_starts.partition_point(|&start| start <= row);
        let idx = idx.checked_sub(1)?;
        let batch = self.batches.get(idx)?;
        let offset = row - self.batch_starts[idx];
        (offset < batch.num_rows()).then_some((batch, offset))
    }
}

impl<C: ColumnSet> RowSource<C> {
    /// Path the source was opened from
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Total rows in the primary group.
    pub fn row_count(&self) -> usize {
        self.groups.first().map(|g| g.num_rows).unwrap_or(0)
    }

    /// Row groups that were found, primary first.
    pub fn row_groups(&self) -> Vec<RowGroupKind> {
        self.groups.iter().map(|g| g.kind).collect()
    }

    /// Row currently loaded, if any.
    pub fn current_row(&self) -> Option<usize> {
        self.row
    }

    /// Activation state of a column.
    pub fn column_status(&self, column: C) -> ColumnStatus {
        self.status[column.index()]
    }

    /// Number of composite-column decodes since the source was opened.
    pub fn composite_reads(&self) -> u64 {
        self.composite_reads.get()
    }
}

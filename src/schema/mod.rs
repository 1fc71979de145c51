//! # Forest Schema Definition
//!
//! A forest stores each analysis directory as a set of Parquet tables, one per
//! row group. Rows of the tables of one directory describe the same event at
//! the same row offset.
//!
//! ## Layout
//!
//! ```text
//! HiChiForest.zip (or a directory)
//! ├── convAna/Conversion_Event.parquet   # one row per event
//! ├── convAna/Conversion_Reco.parquet    # one row per event, list columns
//! ├── muonAna/Muon_Event.parquet
//! └── muonAna/Muon_Reco.parquet
//! ```
//!
//! ## Column Kinds
//!
//! | Kind | Arrow type |
//! |------|------------|
//! | scalar | UInt8 / UInt16 / UInt32 / UInt64 / Float32 |
//! | 3-vector | Struct{x, y, z: Float64} |
//! | list | List<UInt8 / UInt16 / Float32 / Boolean> |
//! | Lorentz collection | List<Struct{px, py, pz, e: Float64}> |
//!
//! Columns are addressed through the [`ColumnSet`] enums
//! ([`ConversionColumn`], [`MuonColumn`]) rather than by name.

mod builders;
/// Column kinds, row groups and the [`ColumnSet`] trait.
pub mod columns;
mod constants;
/// Photon-conversion directory column names and enum.
pub mod conversion_columns;
/// Event-level column names shared by every directory.
pub mod event_columns;
/// Muon directory column names and enum.
pub mod muon_columns;


pub use builders::{create_table_schema, create_table_schema_arc, lorentz_fields, vector3_fields};
pub use columns::{ColumnDef, ColumnKind, ColumnSet, RowGroupKind};
pub use constants::*;
pub use conversion_columns::ConversionColumn;
pub use muon_columns::MuonColumn;

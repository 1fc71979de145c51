use std::fmt::Debug;
use std::hash::Hash;

use arrow::datatypes::{DataType, Fields};

use super::constants::{
    LORENTZ_E, LORENTZ_PX, LORENTZ_PY, LORENTZ_PZ, TABLE_EXTENSION, VECTOR3_X, VECTOR3_Y,
    VECTOR3_Z,
};
use super::{lorentz_fields, vector3_fields};

/// Row groups of an analysis directory, in link order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowGroupKind {
    /// One row per event with event-level information
    Event,
    /// One row per event with the reconstructed object collections
    Reco,
}

impl RowGroupKind {
    /// All row groups in link order. The first one present becomes the primary.
    pub const ALL: [RowGroupKind; 2] = [RowGroupKind::Event, RowGroupKind::Reco];

    /// Short name, also the column-name prefix of the group.
    pub fn as_str(&self) -> &'static str {
        match self {
            RowGroupKind::Event => "Event",
            RowGroupKind::Reco => "Reco",
        }
    }
}

impl std::fmt::Display for RowGroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// `u8` scalar
    UInt8,
    /// `u16` scalar
    UInt16,
    /// `u32` scalar
    UInt32,
    /// `u64` scalar
    UInt64,
    /// `f32` scalar
    Float32,
    /// Cartesian 3-vector
    Vector3,
    /// List of `u8`
    UInt8List,
    /// List of `u16`
    UInt16List,
    /// List of `f32`
    Float32List,
    /// List of `bool`
    BoolList,
    /// List of Lorentz vectors, materialized lazily
    LorentzList,
}

impl ColumnKind {
    /// Arrow type written for this kind.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnKind::UInt8 => DataType::UInt8,
            ColumnKind::UInt16 => DataType::UInt16,
            ColumnKind::UInt32 => DataType::UInt32,
            ColumnKind::UInt64 => DataType::UInt64,
            ColumnKind::Float32 => DataType::Float32,
            ColumnKind::Vector3 => DataType::Struct(vector3_fields()),
            ColumnKind::UInt8List => DataType::new_list(DataType::UInt8, false),
            ColumnKind::UInt16List => DataType::new_list(DataType::UInt16, false),
            ColumnKind::Float32List => DataType::new_list(DataType::Float32, false),
            ColumnKind::BoolList => DataType::new_list(DataType::Boolean, false),
            ColumnKind::LorentzList => {
                DataType::new_list(DataType::Struct(lorentz_fields()), false)
            }
        }
    }

    /// Whether a stored Arrow type can be read as this kind.
    ///
    /// Field names and nullability of list items are not compared.
    pub fn matches(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (ColumnKind::UInt8, DataType::UInt8)
            | (ColumnKind::UInt16, DataType::UInt16)
            | (ColumnKind::UInt32, DataType::UInt32)
            | (ColumnKind::UInt64, DataType::UInt64)
            | (ColumnKind::Float32, DataType::Float32) => true,
            (ColumnKind::Vector3, DataType::Struct(fields)) => {
                has_f64_fields(fields, &[VECTOR3_X, VECTOR3_Y, VECTOR3_Z])
            }
            (ColumnKind::UInt8List, DataType::List(item)) => item.data_type() == &DataType::UInt8,
            (ColumnKind::UInt16List, DataType::List(item)) => {
                item.data_type() == &DataType::UInt16
            }
            (ColumnKind::Float32List, DataType::List(item)) => {
                item.data_type() == &DataType::Float32
            }
            (ColumnKind::BoolList, DataType::List(item)) => {
                item.data_type() == &DataType::Boolean
            }
            (ColumnKind::LorentzList, DataType::List(item)) => match item.data_type() {
                DataType::Struct(fields) => {
                    has_f64_fields(fields, &[LORENTZ_PX, LORENTZ_PY, LORENTZ_PZ, LORENTZ_E])
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Composite kinds are decoded on first access per row instead of on advance.
    pub fn is_composite(&self) -> bool {
        matches!(self, ColumnKind::LorentzList)
    }
}

fn has_f64_fields(fields: &Fields, names: &[&str]) -> bool {
    names.iter().all(|name| {
        fields
            .find(name)
            .map(|(_, f)| f.data_type() == &DataType::Float64)
            .unwrap_or(false)
    })
}

/// Static description of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name in the Parquet table
    pub name: &'static str,
    /// Row group (table) holding the column
    pub group: RowGroupKind,
    /// Storage kind
    pub kind: ColumnKind,
}

impl ColumnDef {
    /// Create a column definition.
    pub const fn new(name: &'static str, group: RowGroupKind, kind: ColumnKind) -> Self {
        Self { name, group, kind }
    }
}

/// An enumerated column schema for one analysis directory.
///
/// Implementors are fieldless enums whose discriminants follow the order of
/// [`ColumnSet::ALL`].
pub trait ColumnSet: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Directory inside the forest holding the tables
    const DIRECTORY: &'static str;

    /// Every column of the directory, in discriminant order
    const ALL: &'static [Self];

    /// Definition of a column.
    fn def(self) -> ColumnDef;

    /// Position of the column in [`ColumnSet::ALL`].
    fn index(self) -> usize;

    /// Table name of a row group, without extension.
    fn table_name(group: RowGroupKind) -> &'static str;

    /// Entry path of a row group table inside the forest.
    fn table_path(group: RowGroupKind) -> String {
        format!(
            "{}/{}.{}",
            Self::DIRECTORY,
            Self::table_name(group),
            TABLE_EXTENSION
        )
    }

    /// Columns of one row group, in schema order.
    fn columns_of(group: RowGroupKind) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|c| c.def().group == group)
            .collect()
    }
}

use crate::kinematics::Vector3;
use crate::schema::ColumnKind;

/// Per-row value of a loaded column.
///
/// Composite (Lorentz-vector) columns are not stored here; they are decoded on
/// demand by the row source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColumnValue {
    /// Nothing loaded for the current row
    #[default]
    Empty,
    /// `u8` scalar
    UInt8(u8),
    /// `u16` scalar
    UInt16(u16),
    /// `u32` scalar
    UInt32(u32),
    /// `u64` scalar
    UInt64(u64),
    /// `f32` scalar
    Float32(f32),
    /// 3-vector
    Vector3(Vector3),
    /// List of `u8`
    UInt8List(Vec<u8>),
    /// List of `u16`
    UInt16List(Vec<u16>),
    /// List of `f32`
    Float32List(Vec<f32>),
    /// List of `bool`
    BoolList(Vec<bool>),
}

impl ColumnValue {
    /// Zero value of a column kind.
    pub fn zero(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::UInt8 => ColumnValue::UInt8(0),
            ColumnKind::UInt16 => ColumnValue::UInt16(0),
            ColumnKind::UInt32 => ColumnValue::UInt32(0),
            ColumnKind::UInt64 => ColumnValue::UInt64(0),
            ColumnKind::Float32 => ColumnValue::Float32(0.0),
            ColumnKind::Vector3 => ColumnValue::Vector3(Vector3::default()),
            ColumnKind::UInt8List => ColumnValue::UInt8List(Vec::new()),
            ColumnKind::UInt16List => ColumnValue::UInt16List(Vec::new()),
            ColumnKind::Float32List => ColumnValue::Float32List(Vec::new()),
            ColumnKind::BoolList => ColumnValue::BoolList(Vec::new()),
            ColumnKind::LorentzList => ColumnValue::Empty,
        }
    }
}

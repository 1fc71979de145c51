use std::cell::OnceCell;

use crate::kinematics::{LorentzVector, Vector3};
use crate::schema::ColumnSet;

use super::utils::{read_lorentz_list, read_value};
use super::{ColumnStatus, ColumnValue, ReaderError, RowSource};

impl<C: ColumnSet> RowSource<C> {
    /// Position every linked group on `row` and load the active columns.
    ///
    /// All per-row state of the previous row is cleared first, so values never
    /// leak from one row to the next.
    pub fn advance(&mut self, row: usize) -> Result<(), ReaderError> {
        let rows = self.row_count();
        if row >= rows {
            return Err(ReaderError::RowOutOfRange { row, rows });
        }
        self.load_row(row)
    }

    pub(super) fn load_row(&mut self, row: usize) -> Result<(), ReaderError> {
        self.clear();

        for &column in C::ALL {
            let idx = column.index();
            let Some(binding) = self.bindings[idx] else {
                continue;
            };
            let def = column.def();
            if def.kind.is_composite() {
                continue;
            }
            let group = &self.groups[binding.group];
            let (batch, offset) = group.locate(row).ok_or_else(|| {
                ReaderError::InvalidFormat(format!("{} table has no row {}", group.kind, row))
            })?;
            self.scratch[idx] = read_value(batch.column(binding.column), def.kind, offset)?;
        }

        self.row = Some(row);
        Ok(())
    }

    /// Reset every per-row value to its zero state.
    fn clear(&mut self) {
        for &column in C::ALL {
            self.scratch[column.index()] = ColumnValue::zero(column.def().kind);
        }
        for cell in self.composites.iter_mut() {
            *cell = OnceCell::new();
        }
        self.row = None;
    }

    /// Loaded value of a column for the current row.
    pub fn value(&self, column: C) -> &ColumnValue {
        &self.scratch[column.index()]
    }

    /// `u8` scalar, zero when inactive or missing.
    pub fn u8(&self, column: C) -> u8 {
        match self.value(column) {
            ColumnValue::UInt8(v) => *v,
            _ => 0,
        }
    }

    /// `u16` scalar, zero when inactive or missing.
    pub fn u16(&self, column: C) -> u16 {
        match self.value(column) {
            ColumnValue::UInt16(v) => *v,
            _ => 0,
        }
    }

    /// `u32` scalar, zero when inactive or missing.
    pub fn u32(&self, column: C) -> u32 {
        match self.value(column) {
            ColumnValue::UInt32(v) => *v,
            _ => 0,
        }
    }

    /// `u64` scalar, zero when inactive or missing.
    pub fn u64(&self, column: C) -> u64 {
        match self.value(column) {
            ColumnValue::UInt64(v) => *v,
            _ => 0,
        }
    }

    /// `f32` scalar, zero when inactive or missing.
    pub fn f32(&self, column: C) -> f32 {
        match self.value(column) {
            ColumnValue::Float32(v) => *v,
            _ => 0.0,
        }
    }

    /// 3-vector, zero vector when inactive or missing.
    pub fn vector3(&self, column: C) -> Vector3 {
        match self.value(column) {
            ColumnValue::Vector3(v) => *v,
            _ => Vector3::default(),
        }
    }

    /// `u8` list, empty when inactive or missing.
    pub fn u8_list(&self, column: C) -> &[u8] {
        match self.value(column) {
            ColumnValue::UInt8List(v) => v,
            _ => &[],
        }
    }

    /// `u16` list, empty when inactive or missing.
    pub fn u16_list(&self, column: C) -> &[u16] {
        match self.value(column) {
            ColumnValue::UInt16List(v) => v,
            _ => &[],
        }
    }

    /// `f32` list, empty when inactive or missing.
    pub fn f32_list(&self, column: C) -> &[f32] {
        match self.value(column) {
            ColumnValue::Float32List(v) => v,
            _ => &[],
        }
    }

    /// `bool` list, empty when inactive or missing.
    pub fn bool_list(&self, column: C) -> &[bool] {
        match self.value(column) {
            ColumnValue::BoolList(v) => v,
            _ => &[],
        }
    }

    /// Lorentz-vector collection of the current row.
    ///
    /// Decoded on first access and cached until the next advance; empty when
    /// inactive, missing, no row is loaded, or the decode failed. Use
    /// [`RowSource::try_lorentz_list`] or [`RowSource::decode_composites`] to
    /// see decode failures.
    pub fn lorentz_list(&self, column: C) -> &[LorentzVector] {
        self.try_lorentz_list(column).unwrap_or(&[])
    }

    /// Lorentz-vector collection of the current row, with decode failures
    /// reported as [`ReaderError::CompositeDecode`].
    pub fn try_lorentz_list(&self, column: C) -> Result<&[LorentzVector], ReaderError> {
        let idx = column.index();
        if self.status[idx] != ColumnStatus::Active {
            return Ok(&[]);
        }
        let (Some(binding), Some(row)) = (self.bindings[idx], self.row) else {
            return Ok(&[]);
        };

        let decoded = self.composites[idx].get_or_init(|| {
            self.composite_reads.set(self.composite_reads.get() + 1);
            let group = &self.groups[binding.group];
            group
                .locate(row)
                .ok_or_else(|| {
                    ReaderError::InvalidFormat(format!("{} table has no row {}", group.kind, row))
                })
                .and_then(|(batch, offset)| read_lorentz_list(batch.column(binding.column), offset))
                .map_err(|e| e.to_string())
        });
        match decoded {
            Ok(vectors) => Ok(vectors),
            Err(reason) => Err(ReaderError::CompositeDecode {
                column: column.def().name,
                row,
                reason: reason.clone(),
            }),
        }
    }

    /// Decode every active Lorentz-vector column of the current row.
    ///
    /// Columns already decoded for this row are not read again.
    pub fn decode_composites(&self) -> Result<(), ReaderError> {
        for &column in C::ALL {
            if column.def().kind.is_composite() {
                self.try_lorentz_list(column)?;
            }
        }
        Ok(())
    }
}

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, ListArray, StructArray,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};

use crate::kinematics::{LorentzVector, Vector3};
use crate::schema::{
    ColumnKind, LORENTZ_E, LORENTZ_PX, LORENTZ_PY, LORENTZ_PZ, VECTOR3_X, VECTOR3_Y, VECTOR3_Z,
};

use super::{ColumnValue, ReaderError};

/// Downcast an array to its concrete type.
fn downcast<'a, T: Array + 'static>(array: &'a dyn Array, what: &str) -> Result<&'a T, ReaderError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ReaderError::InvalidFormat(format!("{} has type {}", what, array.data_type())))
}

/// Get a required Float64 child of a struct array by name.
fn get_float64_field<'a>(
    array: &'a StructArray,
    name: &str,
) -> Result<&'a Float64Array, ReaderError> {
    let child = array
        .column_by_name(name)
        .ok_or_else(|| ReaderError::InvalidFormat(format!("struct field {} missing", name)))?;
    downcast::<Float64Array>(child.as_ref(), name)
}

/// Values of one list cell.
fn list_values(array: &ArrayRef, row: usize) -> Result<Option<ArrayRef>, ReaderError> {
    let list = downcast::<ListArray>(array.as_ref(), "list column")?;
    if list.is_null(row) {
        return Ok(None);
    }
    Ok(Some(list.value(row)))
}

/// Read one row of a non-composite column. Nulls read as the zero value.
pub(super) fn read_value(
    array: &ArrayRef,
    kind: ColumnKind,
    row: usize,
) -> Result<ColumnValue, ReaderError> {
    if array.is_null(row) {
        return Ok(ColumnValue::zero(kind));
    }

    let value = match kind {
        ColumnKind::UInt8 => ColumnValue::UInt8(downcast::<UInt8Array>(array.as_ref(), "UInt8")?.value(row)),
        ColumnKind::UInt16 => {
            ColumnValue::UInt16(downcast::<UInt16Array>(array.as_ref(), "UInt16")?.value(row))
        }
        ColumnKind::UInt32 => {
            ColumnValue::UInt32(downcast::<UInt32Array>(array.as_ref(), "UInt32")?.value(row))
        }
        ColumnKind::UInt64 => {
            ColumnValue::UInt64(downcast::<UInt64Array>(array.as_ref(), "UInt64")?.value(row))
        }
        ColumnKind::Float32 => {
            ColumnValue::Float32(downcast::<Float32Array>(array.as_ref(), "Float32")?.value(row))
        }
        ColumnKind::Vector3 => {
            let vectors = downcast::<StructArray>(array.as_ref(), "Vector3")?;
            ColumnValue::Vector3(Vector3::new(
                get_float64_field(vectors, VECTOR3_X)?.value(row),
                get_float64_field(vectors, VECTOR3_Y)?.value(row),
                get_float64_field(vectors, VECTOR3_Z)?.value(row),
            ))
        }
        ColumnKind::UInt8List => match list_values(array, row)? {
            Some(values) => ColumnValue::UInt8List(
                downcast::<UInt8Array>(values.as_ref(), "UInt8 list")?.values().to_vec(),
            ),
            None => ColumnValue::zero(kind),
        },
        ColumnKind::UInt16List => match list_values(array, row)? {
            Some(values) => ColumnValue::UInt16List(
                downcast::<UInt16Array>(values.as_ref(), "UInt16 list")?.values().to_vec(),
            ),
            None => ColumnValue::zero(kind),
        },
        ColumnKind::Float32List => match list_values(array, row)? {
            Some(values) => ColumnValue::Float32List(
                downcast::<Float32Array>(values.as_ref(), "Float32 list")?.values().to_vec(),
            ),
            None => ColumnValue::zero(kind),
        },
        ColumnKind::BoolList => match list_values(array, row)? {
            Some(values) => ColumnValue::BoolList(
                downcast::<BooleanArray>(values.as_ref(), "Boolean list")?
                    .iter()
                    .map(|flag| flag.unwrap_or(false))
                    .collect(),
            ),
            None => ColumnValue::zero(kind),
        },
        ColumnKind::LorentzList => {
            return Err(ReaderError::InvalidFormat(
                "Lorentz collections are decoded on access".to_string(),
            ))
        }
    };
    Ok(value)
}

/// Decode the Lorentz-vector collection of one row.
pub(super) fn read_lorentz_list(
    array: &ArrayRef,
    row: usize,
) -> Result<Vec<LorentzVector>, ReaderError> {
    let Some(values) = list_values(array, row)? else {
        return Ok(Vec::new());
    };
    let vectors = downcast::<StructArray>(values.as_ref(), "Lorentz list")?;
    let px = get_float64_field(vectors, LORENTZ_PX)?;
    let py = get_float64_field(vectors, LORENTZ_PY)?;
    let pz = get_float64_field(vectors, LORENTZ_PZ)?;
    let e = get_float64_field(vectors, LORENTZ_E)?;

    Ok((0..vectors.len())
        .map(|i| LorentzVector::new(px.value(i), py.value(i), pz.value(i), e.value(i)))
        .collect())
}

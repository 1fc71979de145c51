use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Fields, Schema, SchemaBuilder};

use super::columns::{ColumnSet, RowGroupKind};
use super::constants::{
    FOREST_FORMAT_VERSION, KEY_FORMAT_VERSION, KEY_ROW_GROUP, LORENTZ_E, LORENTZ_PX, LORENTZ_PY,
    LORENTZ_PZ, VECTOR3_X, VECTOR3_Y, VECTOR3_Z,
};

/// Struct fields of a stored Lorentz vector.
pub fn lorentz_fields() -> Fields {
    Fields::from(vec![
        Field::new(LORENTZ_PX, DataType::Float64, false),
        Field::new(LORENTZ_PY, DataType::Float64, false),
        Field::new(LORENTZ_PZ, DataType::Float64, false),
        Field::new(LORENTZ_E, DataType::Float64, false),
    ])
}

/// Struct fields of a stored 3-vector.
pub fn vector3_fields() -> Fields {
    Fields::from(vec![
        Field::new(VECTOR3_X, DataType::Float64, false),
        Field::new(VECTOR3_Y, DataType::Float64, false),
        Field::new(VECTOR3_Z, DataType::Float64, false),
    ])
}

/// Creates the Arrow schema of one row group table of a directory.
///
/// # Example
///
/// ```
/// use chiforest::schema::{create_table_schema, ConversionColumn, RowGroupKind};
///
/// let schema = create_table_schema::<ConversionColumn>(RowGroupKind::Event);
/// assert_eq!(schema.fields().len(), 8);
/// ```
pub fn create_table_schema<C: ColumnSet>(group: RowGroupKind) -> Schema {
    let mut builder = SchemaBuilder::new();
    for column in C::columns_of(group) {
        let def = column.def();
        builder.push(Field::new(def.name, def.kind.data_type(), false));
    }

    let mut metadata = HashMap::new();
    metadata.insert(
        KEY_FORMAT_VERSION.to_string(),
        FOREST_FORMAT_VERSION.to_string(),
    );
    metadata.insert(KEY_ROW_GROUP.to_string(), group.as_str().to_string());

    builder.finish().with_metadata(metadata)
}

/// Same as [`create_table_schema`], wrapped in an `Arc`.
pub fn create_table_schema_arc<C: ColumnSet>(group: RowGroupKind) -> Arc<Schema> {
    Arc::new(create_table_schema::<C>(group))
}

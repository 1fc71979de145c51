/// Forest format version - follows semantic versioning
pub const FOREST_FORMAT_VERSION: &str = "1.0.0";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "chiforest:format_version";

/// Metadata key for the row group name in Parquet footer
pub const KEY_ROW_GROUP: &str = "chiforest:row_group";

/// File extension of a forest table
pub const TABLE_EXTENSION: &str = "parquet";

/// Field names of a Lorentz vector struct
pub const LORENTZ_PX: &str = "px";
/// y momentum component field
pub const LORENTZ_PY: &str = "py";
/// z momentum component field
pub const LORENTZ_PZ: &str = "pz";
/// Energy field
pub const LORENTZ_E: &str = "e";

/// Field names of a 3-vector struct
pub const VECTOR3_X: &str = "x";
/// y coordinate field
pub const VECTOR3_Y: &str = "y";
/// z coordinate field
pub const VECTOR3_Z: &str = "z";

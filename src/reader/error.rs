use super::RowGroupKind;

/// Errors that can occur during reading
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Non-local URI scheme
    #[error("Unsupported URI '{0}': only local paths and file:// URIs can be opened")]
    UnsupportedUri(String),

    /// None of the row group tables of a directory exist
    #[error("No row groups of '{directory}' found in {path}")]
    NoRowGroups {
        /// Forest path
        path: String,
        /// Analysis directory that was looked up
        directory: &'static str,
    },

    /// Linked row groups do not have the same number of rows
    #[error("Row group {group} has {found} rows, primary has {expected}")]
    RowCountMismatch {
        /// The dependent row group
        group: RowGroupKind,
        /// Row count of the primary group
        expected: usize,
        /// Row count of the dependent group
        found: usize,
    },

    /// Advance past the last row
    #[error("Row {row} out of range ({rows} rows)")]
    RowOutOfRange {
        /// Requested row
        row: usize,
        /// Total rows
        rows: usize,
    },

    /// Stored column type does not match the schema
    #[error("Column {column} has type {found}, expected {expected}")]
    ColumnTypeMismatch {
        /// Column name
        column: &'static str,
        /// Expected kind
        expected: String,
        /// Stored Arrow type
        found: String,
    },

    /// A Lorentz-vector collection of the current row could not be decoded
    #[error("Failed to decode {column} at row {row}: {reason}")]
    CompositeDecode {
        /// Column name
        column: &'static str,
        /// Row being read
        row: usize,
        /// Decoder message
        reason: String,
    },
}

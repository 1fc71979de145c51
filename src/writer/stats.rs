use std::fmt;

/// Statistics from a completed forest write
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Events written to the conversion directory
    pub conversion_rows: usize,
    /// Events written to the muon directory
    pub muon_rows: usize,
    /// Parquet tables written
    pub tables_written: usize,
    /// Total size of the written tables in bytes
    pub bytes_written: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} tables ({} conversion rows, {} muon rows, {} bytes)",
            self.tables_written, self.conversion_rows, self.muon_rows, self.bytes_written
        )
    }
}

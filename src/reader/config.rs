use std::fs::File;
use std::path::PathBuf;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use parquet::file::reader::ChunkReader;

use super::ReaderError;

/// Configuration for reading forests
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Batch size for decoding records
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 65536 }
    }
}

/// Where a row group table lives (stores path or bytes for re-reading)
#[derive(Debug, Clone)]
pub(super) enum TableSource {
    /// Parquet file inside a directory bundle
    FilePath(PathBuf),
    /// Parquet entry extracted from a ZIP container
    Memory(Bytes),
}

/// Schema and size of a table, read from the Parquet footer only.
pub(super) struct TableInfo {
    pub schema: SchemaRef,
    pub num_rows: usize,
}

impl TableSource {
    /// Read the footer of the table.
    pub(super) fn inspect(&self) -> Result<TableInfo, ReaderError> {
        match self {
            TableSource::FilePath(path) => inspect_reader(File::open(path)?),
            TableSource::Memory(bytes) => inspect_reader(bytes.clone()),
        }
    }

    /// Decode the given root columns of every row.
    pub(super) fn read_columns(
        &self,
        roots: &[usize],
        batch_size: usize,
    ) -> Result<Vec<RecordBatch>, ReaderError> {
        match self {
            TableSource::FilePath(path) => read_reader(File::open(path)?, roots, batch_size),
            TableSource::Memory(bytes) => read_reader(bytes.clone(), roots, batch_size),
        }
    }
}

fn inspect_reader<T: ChunkReader + 'static>(reader: T) -> Result<TableInfo, ReaderError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let num_rows = builder.metadata().file_metadata().num_rows();
    let num_rows = usize::try_from(num_rows)
        .map_err(|_| ReaderError::InvalidFormat(format!("negative row count {}", num_rows)))?;
    Ok(TableInfo {
        schema: builder.schema().clone(),
        num_rows,
    })
}

fn read_reader<T: ChunkReader + 'static>(
    reader: T,
    roots: &[usize],
    batch_size: usize,
) -> Result<Vec<RecordBatch>, ReaderError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let mask = ProjectionMask::roots(builder.parquet_schema(), roots.iter().copied());
    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(batch_result?);
    }
    Ok(batches)
}

use std::collections::HashMap;

use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;

use crate::schema::event_columns::{EVENT_LUMI, EVENT_NPV, EVENT_RUN};

/// Configuration for the forest writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// ZSTD compression level of every table
    pub zstd_level: i32,

    /// Target Parquet row group size (events per group)
    pub row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            zstd_level: 3,
            row_group_size: 100_000,
        }
    }
}

impl WriterConfig {
    /// Parquet properties of one table.
    pub(super) fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let level = ZstdLevel::try_new(self.zstd_level).unwrap_or_default();

        let mut builder = WriterProperties::builder()
            .set_compression(Compression::ZSTD(level))
            .set_statistics_enabled(EnabledStatistics::Chunk)
            .set_max_row_group_size(self.row_group_size.max(1));

        // Run, lumi section and vertex count repeat across consecutive events
        for col in [EVENT_RUN, EVENT_LUMI, EVENT_NPV] {
            builder =
                builder.set_column_dictionary_enabled(ColumnPath::new(vec![col.to_string()]), true);
        }

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        builder.set_key_value_metadata(Some(kv_metadata)).build()
    }
}

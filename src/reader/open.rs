use std::cell::{Cell, OnceCell};
use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::schema::{ColumnSet, RowGroupKind};

use super::config::TableSource;
use super::{ColumnStatus, ColumnValue, LinkedGroup, ReaderConfig, ReaderError, RowSource};

impl<C: ColumnSet> RowSource<C> {
    /// Open the tables of `C::DIRECTORY` in a forest
    ///
    /// Automatically detects the format:
    /// - directories are treated as bundles (`<dir>/<DIRECTORY>/<table>.parquet`)
    /// - any other file is treated as a ZIP container with the same entry paths
    ///
    /// `file://` URIs are accepted; other URI schemes are rejected.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a forest with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let path = resolve_local_path(path.as_ref())?;

        let tables = if path.is_dir() {
            Self::discover_directory(&path)
        } else {
            Self::discover_container(&path)?
        };

        if tables.is_empty() {
            return Err(ReaderError::NoRowGroups {
                path: path.display().to_string(),
                directory: C::DIRECTORY,
            });
        }

        let mut groups = Vec::with_capacity(tables.len());
        for (kind, table) in tables {
            let table_info = table.inspect()?;
            groups.push(LinkedGroup {
                kind,
                table,
                schema: table_info.schema,
                num_rows: table_info.num_rows,
                projected: Vec::new(),
                batches: Vec::new(),
                batch_starts: Vec::new(),
            });
        }

        // Dependents advance in lockstep with the primary, so sizes must agree
        let expected = groups[0].num_rows;
        for group in &groups[1..] {
            if group.num_rows != expected {
                return Err(ReaderError::RowCountMismatch {
                    group: group.kind,
                    expected,
                    found: group.num_rows,
                });
            }
        }

        let status = C::ALL
            .iter()
            .map(|column| {
                let def = column.def();
                let present = groups
                    .iter()
                    .any(|g| g.kind == def.group && g.schema.index_of(def.name).is_ok());
                if present {
                    ColumnStatus::Inactive
                } else {
                    ColumnStatus::Missing
                }
            })
            .collect();

        info!(
            "Opened {} in {}: {} rows, row groups [{}]",
            C::DIRECTORY,
            path.display(),
            expected,
            groups
                .iter()
                .map(|g| g.kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let n_columns = C::ALL.len();
        Ok(Self {
            path,
            config,
            groups,
            status,
            bindings: vec![None; n_columns],
            row: None,
            scratch: vec![ColumnValue::Empty; n_columns],
            composites: (0..n_columns).map(|_| OnceCell::new()).collect(),
            composite_reads: Cell::new(0),
            _columns: PhantomData,
        })
    }

    /// Look up the tables of a directory bundle
    fn discover_directory(root: &Path) -> Vec<(RowGroupKind, TableSource)> {
        let mut tables = Vec::new();
        for kind in RowGroupKind::ALL {
            let table_path = root.join(C::table_path(kind));
            if table_path.is_file() {
                debug!("Found {} table {}", kind, table_path.display());
                tables.push((kind, TableSource::FilePath(table_path)));
            }
        }
        tables
    }

    /// Look up the tables of a ZIP container and read them into memory
    fn discover_container(path: &Path) -> Result<Vec<(RowGroupKind, TableSource)>, ReaderError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let mut tables = Vec::new();
        for kind in RowGroupKind::ALL {
            let entry_name = C::table_path(kind);
            let mut entry = match archive.by_name(&entry_name) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => continue,
                Err(e) => return Err(e.into()),
            };

            let mut parquet_bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut parquet_bytes)?;
            debug!(
                "Found {} table {} ({} bytes)",
                kind,
                entry_name,
                parquet_bytes.len()
            );
            tables.push((kind, TableSource::Memory(Bytes::from(parquet_bytes))));
        }
        Ok(tables)
    }
}

/// Turn a path or `file://` URI into a local path.
pub(super) fn resolve_local_path(path: &Path) -> Result<PathBuf, ReaderError> {
    let text = path.to_string_lossy();
    if let Some(local) = text.strip_prefix("file://") {
        return Ok(PathBuf::from(local));
    }
    if let Some((scheme, _)) = text.split_once("://") {
        let is_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            return Err(ReaderError::UnsupportedUri(text.into_owned()));
        }
    }
    Ok(path.to_path_buf())
}

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Float64Array, ListArray, StructArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, FieldRef};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use parquet::arrow::ArrowWriter;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::kinematics::{LorentzVector, Vector3};
use crate::schema::event_columns::*;
use crate::schema::{
    create_table_schema_arc, lorentz_fields, vector3_fields, ColumnKind, ColumnSet,
    ConversionColumn, MuonColumn, RowGroupKind, FOREST_FORMAT_VERSION, KEY_FORMAT_VERSION,
};

use super::config::WriterConfig;
use super::error::WriterError;
use super::records::{ConversionReco, EventRecord, MuonReco};
use super::stats::WriterStats;

/// Output layout of a forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForestLayout {
    /// Single ZIP container file
    #[default]
    Container,
    /// Directory bundle
    Directory,
}

/// Where the tables go
enum ForestSink {
    Directory {
        root_path: PathBuf,
    },
    /// Parquet tables are stored uncompressed inside the ZIP so they can be
    /// read back without inflating
    Container {
        output_path: PathBuf,
        zip_writer: ZipWriter<BufWriter<File>>,
    },
}

/// Writer for forests: the conversion and muon directories, each with an
/// Event and a Reco table.
///
/// Rows are buffered in memory and written on [`ForestWriter::close`].
///
/// # Example
///
/// ```rust,no_run
/// use chiforest::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};
///
/// let mut writer = ForestWriter::create("forest.zip", ForestLayout::Container)?;
/// let event = EventRecord::new(1, 101);
/// writer.write_event(&event, &ConversionReco::default(), &MuonReco::default())?;
/// let stats = writer.close()?;
/// println!("{}", stats);
/// # Ok::<(), chiforest::writer::WriterError>(())
/// ```
pub struct ForestWriter {
    sink: ForestSink,
    config: WriterConfig,
    conversion_events: Vec<EventRecord>,
    conversion_reco: Vec<ConversionReco>,
    muon_events: Vec<EventRecord>,
    muon_reco: Vec<MuonReco>,
}

impl ForestWriter {
    /// Create a forest at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::AlreadyExists`] if anything exists at `path`.
    pub fn create<P: AsRef<Path>>(path: P, layout: ForestLayout) -> Result<Self, WriterError> {
        Self::create_with_config(path, layout, WriterConfig::default())
    }

    /// Create a forest with a custom configuration.
    pub fn create_with_config<P: AsRef<Path>>(
        path: P,
        layout: ForestLayout,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let output_path = path.as_ref().to_path_buf();

        if output_path.as_os_str().is_empty() {
            return Err(WriterError::InvalidPath("Empty path".to_string()));
        }
        if output_path.exists() {
            return Err(WriterError::AlreadyExists(
                output_path.display().to_string(),
            ));
        }

        let sink = match layout {
            ForestLayout::Directory => {
                fs::create_dir_all(&output_path)?;
                ForestSink::Directory {
                    root_path: output_path,
                }
            }
            ForestLayout::Container => {
                if let Some(parent) = output_path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        fs::create_dir_all(parent)?;
                    }
                }
                let file = File::create(&output_path)?;
                ForestSink::Container {
                    output_path,
                    zip_writer: ZipWriter::new(BufWriter::new(file)),
                }
            }
        };

        Ok(Self {
            sink,
            config,
            conversion_events: Vec::new(),
            conversion_reco: Vec::new(),
            muon_events: Vec::new(),
            muon_reco: Vec::new(),
        })
    }

    /// Append one row to the conversion directory.
    pub fn write_conversion(
        &mut self,
        event: &EventRecord,
        reco: &ConversionReco,
    ) -> Result<(), WriterError> {
        reco.validate()?;
        self.conversion_events.push(*event);
        self.conversion_reco.push(reco.clone());
        Ok(())
    }

    /// Append one row to the muon directory.
    pub fn write_muon(&mut self, event: &EventRecord, reco: &MuonReco) -> Result<(), WriterError> {
        reco.validate()?;
        self.muon_events.push(*event);
        self.muon_reco.push(reco.clone());
        Ok(())
    }

    /// Append the same event to both directories.
    pub fn write_event(
        &mut self,
        event: &EventRecord,
        conversion: &ConversionReco,
        muon: &MuonReco,
    ) -> Result<(), WriterError> {
        self.write_conversion(event, conversion)?;
        self.write_muon(event, muon)
    }

    /// Write every table and finalize the forest.
    pub fn close(mut self) -> Result<WriterStats, WriterError> {
        let mut stats = WriterStats {
            conversion_rows: self.conversion_events.len(),
            muon_rows: self.muon_events.len(),
            ..WriterStats::default()
        };

        let tables = [
            (
                ConversionColumn::table_path(RowGroupKind::Event),
                event_batch::<ConversionColumn>(&self.conversion_events)?,
            ),
            (
                ConversionColumn::table_path(RowGroupKind::Reco),
                conversion_reco_batch(&self.conversion_reco)?,
            ),
            (
                MuonColumn::table_path(RowGroupKind::Event),
                event_batch::<MuonColumn>(&self.muon_events)?,
            ),
            (
                MuonColumn::table_path(RowGroupKind::Reco),
                muon_reco_batch(&self.muon_reco)?,
            ),
        ];

        for (entry_path, batch) in &tables {
            let bytes = encode_table(batch, &self.config)?;
            debug!(
                "Encoded {} ({} rows, {} bytes)",
                entry_path,
                batch.num_rows(),
                bytes.len()
            );
            self.put_table(entry_path, &bytes)?;
            stats.tables_written += 1;
            stats.bytes_written += bytes.len() as u64;
        }

        let output_path = match self.sink {
            ForestSink::Directory { root_path } => root_path,
            ForestSink::Container {
                output_path,
                zip_writer,
            } => {
                let mut inner = zip_writer.finish()?;
                inner.flush()?;
                output_path
            }
        };

        info!("Forest written to {}: {}", output_path.display(), stats);
        Ok(stats)
    }

    fn put_table(&mut self, entry_path: &str, bytes: &[u8]) -> Result<(), WriterError> {
        match &mut self.sink {
            ForestSink::Directory { root_path } => {
                let table_path = root_path.join(entry_path);
                if let Some(parent) = table_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&table_path, bytes)?;
            }
            ForestSink::Container { zip_writer, .. } => {
                let options = SimpleFileOptions::default()
                    .compression_method(CompressionMethod::Stored)
                    .unix_permissions(0o644);
                zip_writer.start_file(entry_path, options)?;
                zip_writer.write_all(bytes)?;
            }
        }
        Ok(())
    }
}

/// Encode a batch as a complete Parquet file in memory.
fn encode_table(batch: &RecordBatch, config: &WriterConfig) -> Result<Vec<u8>, WriterError> {
    let mut metadata = HashMap::new();
    metadata.insert(
        KEY_FORMAT_VERSION.to_string(),
        FOREST_FORMAT_VERSION.to_string(),
    );
    let props = config.to_writer_properties(&metadata);

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(buffer)
}

/// Item field of a list kind, identical to the one in the table schema.
fn list_field(kind: ColumnKind) -> Result<FieldRef, WriterError> {
    match kind.data_type() {
        DataType::List(field) => Ok(field),
        other => Err(WriterError::InvalidData(format!(
            "{:?} is not a list kind ({})",
            kind, other
        ))),
    }
}

fn list_array(
    kind: ColumnKind,
    lengths: impl IntoIterator<Item = usize>,
    values: ArrayRef,
) -> Result<ArrayRef, WriterError> {
    let offsets = OffsetBuffer::<i32>::from_lengths(lengths);
    Ok(Arc::new(ListArray::try_new(
        list_field(kind)?,
        offsets,
        values,
        None,
    )?))
}

fn vector3_array<'a>(vectors: impl Iterator<Item = &'a Vector3> + Clone) -> Result<ArrayRef, WriterError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from_iter_values(vectors.clone().map(|v| v.x))),
        Arc::new(Float64Array::from_iter_values(vectors.clone().map(|v| v.y))),
        Arc::new(Float64Array::from_iter_values(vectors.map(|v| v.z))),
    ];
    Ok(Arc::new(StructArray::try_new(vector3_fields(), columns, None)?))
}

fn lorentz_list_array(rows: &[&[LorentzVector]]) -> Result<ArrayRef, WriterError> {
    let flat = rows.iter().flat_map(|r| r.iter());
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from_iter_values(flat.clone().map(|v| v.px))),
        Arc::new(Float64Array::from_iter_values(flat.clone().map(|v| v.py))),
        Arc::new(Float64Array::from_iter_values(flat.clone().map(|v| v.pz))),
        Arc::new(Float64Array::from_iter_values(flat.map(|v| v.e))),
    ];
    let values = Arc::new(StructArray::try_new(lorentz_fields(), columns, None)?);
    list_array(ColumnKind::LorentzList, rows.iter().map(|r| r.len()), values)
}

fn u16_list_array(rows: &[&[u16]]) -> Result<ArrayRef, WriterError> {
    let values = Arc::new(UInt16Array::from_iter_values(
        rows.iter().flat_map(|r| r.iter().copied()),
    ));
    list_array(ColumnKind::UInt16List, rows.iter().map(|r| r.len()), values)
}

/// Event table of one directory, columns in schema order.
fn event_batch<C: ColumnSet>(events: &[EventRecord]) -> Result<RecordBatch, WriterError> {
    let schema = create_table_schema_arc::<C>(RowGroupKind::Event);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for column in C::columns_of(RowGroupKind::Event) {
        let name = column.def().name;
        let array: ArrayRef = match name {
            EVENT_RUN => Arc::new(UInt32Array::from_iter_values(events.iter().map(|e| e.run))),
            EVENT_LUMI => Arc::new(UInt16Array::from_iter_values(events.iter().map(|e| e.lumi))),
            EVENT_BX => Arc::new(UInt32Array::from_iter_values(events.iter().map(|e| e.bx))),
            EVENT_ORBIT => Arc::new(UInt64Array::from_iter_values(
                events.iter().map(|e| e.orbit),
            )),
            EVENT_NUMBER => Arc::new(UInt64Array::from_iter_values(
                events.iter().map(|e| e.number),
            )),
            EVENT_NPV => Arc::new(UInt8Array::from_iter_values(events.iter().map(|e| e.n_pv))),
            EVENT_PRIVTX_POS => vector3_array(events.iter().map(|e| &e.privtx_pos))?,
            EVENT_PRIVTX_ERR => vector3_array(events.iter().map(|e| &e.privtx_err))?,
            other => {
                return Err(WriterError::InvalidData(format!(
                    "no event field for column {}",
                    other
                )))
            }
        };
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn conversion_reco_batch(rows: &[ConversionReco]) -> Result<RecordBatch, WriterError> {
    let schema = create_table_schema_arc::<ConversionColumn>(RowGroupKind::Reco);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for column in ConversionColumn::columns_of(RowGroupKind::Reco) {
        let array = match column {
            ConversionColumn::RecoDiMuonConvMom => {
                let moms: Vec<&[LorentzVector]> =
                    rows.iter().map(|r| r.dimuonconv_mom.as_slice()).collect();
                lorentz_list_array(&moms)?
            }
            ConversionColumn::RecoDiMuonConvConversionIdx => {
                let idx: Vec<&[u16]> = rows.iter().map(|r| r.conversion_idx.as_slice()).collect();
                u16_list_array(&idx)?
            }
            ConversionColumn::RecoDiMuonConvDiMuonIdx => {
                let idx: Vec<&[u16]> = rows.iter().map(|r| r.dimuon_idx.as_slice()).collect();
                u16_list_array(&idx)?
            }
            ConversionColumn::RecoChiMass => {
                let values = Arc::new(Float32Array::from_iter_values(
                    rows.iter().flat_map(|r| r.chi_mass.iter().copied()),
                ));
                list_array(
                    ColumnKind::Float32List,
                    rows.iter().map(|r| r.chi_mass.len()),
                    values,
                )?
            }
            ConversionColumn::RecoChiType => {
                let values = Arc::new(UInt8Array::from_iter_values(
                    rows.iter().flat_map(|r| r.chi_type.iter().copied()),
                ));
                list_array(
                    ColumnKind::UInt8List,
                    rows.iter().map(|r| r.chi_type.len()),
                    values,
                )?
            }
            other => {
                return Err(WriterError::InvalidData(format!(
                    "{:?} is not a reco column",
                    other
                )))
            }
        };
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn muon_reco_batch(rows: &[MuonReco]) -> Result<RecordBatch, WriterError> {
    let schema = create_table_schema_arc::<MuonColumn>(RowGroupKind::Reco);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for column in MuonColumn::columns_of(RowGroupKind::Reco) {
        let array = match column {
            MuonColumn::RecoDiMuonMom => {
                let moms: Vec<&[LorentzVector]> =
                    rows.iter().map(|r| r.dimuon_mom.as_slice()).collect();
                lorentz_list_array(&moms)?
            }
            MuonColumn::RecoDiMuonMuon1Idx => {
                let idx: Vec<&[u16]> = rows.iter().map(|r| r.muon1_idx.as_slice()).collect();
                u16_list_array(&idx)?
            }
            MuonColumn::RecoDiMuonMuon2Idx => {
                let idx: Vec<&[u16]> = rows.iter().map(|r| r.muon2_idx.as_slice()).collect();
                u16_list_array(&idx)?
            }
            MuonColumn::RecoMuonMom => {
                let moms: Vec<&[LorentzVector]> =
                    rows.iter().map(|r| r.muon_mom.as_slice()).collect();
                lorentz_list_array(&moms)?
            }
            MuonColumn::RecoMuonIsGlobal => {
                let values = BooleanArray::from(
                    rows.iter()
                        .flat_map(|r| r.muon_is_global.iter().copied())
                        .collect::<Vec<bool>>(),
                );
                list_array(
                    ColumnKind::BoolList,
                    rows.iter().map(|r| r.muon_is_global.len()),
                    Arc::new(values),
                )?
            }
            other => {
                return Err(WriterError::InvalidData(format!(
                    "{:?} is not a reco column",
                    other
                )))
            }
        };
        arrays.push(array);
    }

    Ok(RecordBatch::try_new(schema, arrays)?)
}

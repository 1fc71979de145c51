use super::*;
use crate::kinematics::Vector3;
use crate::schema::{ColumnSet, ConversionColumn, MuonColumn};
use crate::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};
use arrow::array::{ArrayRef, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

/// Row `i` holds event `101 + i` of run 1 with `i + 1` combinations.
fn write_forest(path: &Path, layout: ForestLayout, rows: usize) {
    let mut writer = ForestWriter::create(path, layout).unwrap();
    for i in 0..rows {
        let mut event = EventRecord::new(1, 101 + i as u64);
        event.lumi = i as u16;
        event.n_pv = 2;
        event.privtx_pos = Vector3::new(0.1, -0.2, i as f64);

        let mut conversion = ConversionReco::default();
        for j in 0..=i {
            let e = 10.0 + j as f64;
            conversion.push(
                LorentzVector::new(1.0, 2.0, 3.0, e),
                j as u16,
                0,
                3.5 + 0.01 * j as f32,
                1,
            );
        }

        let mut muon = MuonReco::default();
        let m1 = muon.push_muon(LorentzVector::new(4.0, 0.0, 0.0, 4.0), true);
        let m2 = muon.push_muon(LorentzVector::new(-4.0, 0.0, 0.0, 4.0), i % 2 == 0);
        muon.push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, 8.0), m1, m2);

        writer.write_event(&event, &conversion, &muon).unwrap();
    }
    writer.close().unwrap();
}

/// Write a bare Parquet table with the given columns.
fn write_table(path: &Path, columns: Vec<(&str, ArrayRef)>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

    let mut writer = ArrowWriter::try_new(File::create(path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_inactive_column_reads_zero() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 3);

    let mut tree = ConversionTree::open(&path)?;
    assert_eq!(tree.row_count(), 3);

    for row in 0..3 {
        tree.advance(row)?;
        assert_eq!(tree.event_number(), 0);
        assert!(tree.reco_chi_mass().is_empty());
        assert!(tree.reco_dimuonconv_mom().is_empty());
    }

    tree.activate(&[ConversionColumn::EventNumber, ConversionColumn::RecoChiMass])?;
    for row in 0..3 {
        tree.advance(row)?;
        assert_eq!(tree.event_number(), 101 + row as u64);
        assert_eq!(tree.reco_chi_mass().len(), row + 1);
        assert_eq!(tree.event_run(), 0);
    }

    Ok(())
}

#[test]
fn test_activation_reloads_current_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 3);

    let mut tree = ConversionTree::open(&path)?;
    tree.advance(1)?;
    assert_eq!(tree.event_lumi(), 0);

    tree.activate(&[ConversionColumn::EventLumi])?;
    assert_eq!(tree.source().current_row(), Some(1));
    assert_eq!(tree.event_lumi(), 1);
    assert_eq!(
        tree.source().column_status(ConversionColumn::EventLumi),
        ColumnStatus::Active
    );
    assert_eq!(
        tree.source().column_status(ConversionColumn::EventRun),
        ColumnStatus::Inactive
    );

    Ok(())
}

#[test]
fn test_readvance_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 3);

    let mut tree = ConversionTree::open(&path)?;
    tree.activate_all()?;

    tree.advance(2)?;
    let first = (
        tree.event_run(),
        tree.event_number(),
        tree.event_privtx_pos(),
        tree.reco_chi_mass().to_vec(),
        tree.reco_dimuonconv_mom().to_vec(),
    );
    tree.advance(2)?;
    let second = (
        tree.event_run(),
        tree.event_number(),
        tree.event_privtx_pos(),
        tree.reco_chi_mass().to_vec(),
        tree.reco_dimuonconv_mom().to_vec(),
    );
    assert_eq!(first, second);
    assert_eq!(first.2, Vector3::new(0.1, -0.2, 2.0));

    Ok(())
}

#[test]
fn test_composite_decoded_once_per_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 3);

    let mut tree = ConversionTree::open(&path)?;
    tree.activate(&[ConversionColumn::RecoDiMuonConvMom])?;

    tree.advance(2)?;
    assert_eq!(tree.source().composite_reads(), 0);

    let moms = tree.reco_dimuonconv_mom();
    assert_eq!(moms.len(), 3);
    assert_eq!(moms[2], LorentzVector::new(1.0, 2.0, 3.0, 12.0));
    assert_eq!(tree.reco_dimuonconv_mom().len(), 3);
    assert_eq!(tree.source().composite_reads(), 1);

    tree.advance(0)?;
    assert_eq!(tree.reco_dimuonconv_mom().len(), 1);
    assert_eq!(tree.reco_dimuonconv_mom().len(), 1);
    assert_eq!(tree.source().composite_reads(), 2);

    Ok(())
}

#[test]
fn test_composite_decode_failure_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 2);

    let mut source = RowSource::<ConversionColumn>::open(&path)?;
    source.activate(&[
        ConversionColumn::RecoDiMuonConvMom,
        ConversionColumn::RecoChiType,
    ])?;
    source.advance(1)?;

    // Point the four-vector column at the u8 list of chi types
    let mom = ConversionColumn::RecoDiMuonConvMom.index();
    source.bindings[mom] = source.bindings[ConversionColumn::RecoChiType.index()];

    let err = source.decode_composites().unwrap_err();
    assert!(matches!(
        err,
        ReaderError::CompositeDecode {
            column: "Reco_DiMuonConv_Mom",
            row: 1,
            ..
        }
    ));
    assert!(source
        .try_lorentz_list(ConversionColumn::RecoDiMuonConvMom)
        .is_err());
    assert!(source
        .lorentz_list(ConversionColumn::RecoDiMuonConvMom)
        .is_empty());
    // The failure is cached like a successful decode
    assert_eq!(source.composite_reads(), 1);

    Ok(())
}

#[test]
fn test_muon_tree_columns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest");
    write_forest(&path, ForestLayout::Directory, 2);

    let mut tree = MuonTree::open(&path)?;
    tree.activate(&[
        MuonColumn::EventNPv,
        MuonColumn::RecoDiMuonMuon1Idx,
        MuonColumn::RecoDiMuonMuon2Idx,
        MuonColumn::RecoMuonMom,
        MuonColumn::RecoMuonIsGlobal,
    ])?;

    tree.advance(1)?;
    assert_eq!(tree.event_npv(), 2);
    assert_eq!(tree.reco_dimuon_muon1_idx(), &[0]);
    assert_eq!(tree.reco_dimuon_muon2_idx(), &[1]);
    assert_eq!(tree.reco_muon_mom().len(), 2);
    assert_eq!(tree.reco_muon_is_global(), &[true, false]);
    assert!(tree.reco_dimuon_mom().is_empty());

    Ok(())
}

#[test]
fn test_small_batches_span_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 7);

    let mut tree = ConversionTree::open_with_config(&path, ReaderConfig { batch_size: 2 })?;
    tree.activate(&[ConversionColumn::EventNumber, ConversionColumn::RecoChiType])?;

    for row in (0..7).rev() {
        tree.advance(row)?;
        assert_eq!(tree.event_number(), 101 + row as u64);
        assert_eq!(tree.reco_chi_type().len(), row + 1);
    }

    Ok(())
}

#[test]
fn test_advance_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 3);

    let mut tree = ConversionTree::open(&path)?;
    let result = tree.advance(3);
    assert!(matches!(
        result,
        Err(ReaderError::RowOutOfRange { row: 3, rows: 3 })
    ));
    assert_eq!(tree.source().current_row(), None);

    Ok(())
}

#[test]
fn test_open_missing_file() {
    let dir = tempdir().unwrap();
    let result = ConversionTree::open(dir.path().join("nope.zip"));
    assert!(matches!(result, Err(ReaderError::IoError(_))));
}

#[test]
fn test_open_without_row_groups() {
    let dir = tempdir().unwrap();

    let result = ConversionTree::open(dir.path());
    assert!(matches!(result, Err(ReaderError::NoRowGroups { .. })));

    let path = dir.path().join("empty.zip");
    let zip = zip::ZipWriter::new(File::create(&path).unwrap());
    zip.finish().unwrap();
    let result = MuonTree::open(&path);
    assert!(matches!(
        result,
        Err(ReaderError::NoRowGroups {
            directory: "muonAna",
            ..
        })
    ));
}

#[test]
fn test_open_row_count_mismatch() {
    let dir = tempdir().unwrap();
    let long = dir.path().join("long");
    let short = dir.path().join("short");
    write_forest(&long, ForestLayout::Directory, 3);
    write_forest(&short, ForestLayout::Directory, 2);

    let reco = ConversionColumn::table_path(RowGroupKind::Reco);
    fs::copy(short.join(&reco), long.join(&reco)).unwrap();

    let result = ConversionTree::open(&long);
    assert!(matches!(
        result,
        Err(ReaderError::RowCountMismatch {
            group: RowGroupKind::Reco,
            expected: 3,
            found: 2
        })
    ));
    assert!(MuonTree::open(&long).is_ok());
}

#[test]
fn test_file_uri_accepted_remote_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("forest.zip");
    write_forest(&path, ForestLayout::Container, 1);

    let uri = format!("file://{}", path.display());
    let tree = ConversionTree::open(&uri)?;
    assert_eq!(tree.row_count(), 1);
    assert_eq!(tree.source().path(), path.as_path());

    let result = ConversionTree::open("root://eos.example.org//store/forest.root");
    assert!(matches!(result, Err(ReaderError::UnsupportedUri(_))));

    Ok(())
}

#[test]
fn test_missing_column_and_single_group() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let table = dir
        .path()
        .join(ConversionColumn::table_path(RowGroupKind::Event));
    write_table(
        &table,
        vec![(
            crate::schema::event_columns::EVENT_RUN,
            Arc::new(UInt32Array::from(vec![7, 8])) as ArrayRef,
        )],
    );

    let mut tree = ConversionTree::open(dir.path())?;
    assert_eq!(tree.source().row_groups(), vec![RowGroupKind::Event]);
    assert_eq!(
        tree.source().column_status(ConversionColumn::EventNumber),
        ColumnStatus::Missing
    );
    assert_eq!(
        tree.source().column_status(ConversionColumn::RecoChiMass),
        ColumnStatus::Missing
    );

    tree.activate(&[
        ConversionColumn::EventRun,
        ConversionColumn::EventNumber,
        ConversionColumn::RecoChiMass,
    ])?;
    tree.advance(1)?;
    assert_eq!(tree.event_run(), 8);
    assert_eq!(tree.event_number(), 0);
    assert!(tree.reco_chi_mass().is_empty());

    Ok(())
}

#[test]
fn test_column_type_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let table = dir.path().join(MuonColumn::table_path(RowGroupKind::Event));
    write_table(
        &table,
        vec![(
            crate::schema::event_columns::EVENT_RUN,
            Arc::new(UInt64Array::from(vec![1u64])) as ArrayRef,
        )],
    );

    let mut tree = MuonTree::open(dir.path())?;
    let result = tree.activate(&[MuonColumn::EventRun]);
    match result {
        Err(ReaderError::ColumnTypeMismatch { column, found, .. }) => {
            assert_eq!(column, "Event_Run");
            assert_eq!(found, DataType::UInt64.to_string());
        }
        other => panic!("expected a type mismatch, got {:?}", other.err()),
    }

    Ok(())
}

#[test]
fn test_resolve_local_path() {
    assert_eq!(
        open::resolve_local_path(Path::new("file:///data/forest.zip")).unwrap(),
        Path::new("/data/forest.zip")
    );
    assert_eq!(
        open::resolve_local_path(Path::new("relative/forest.zip")).unwrap(),
        Path::new("relative/forest.zip")
    );
    assert!(open::resolve_local_path(Path::new("https://host/forest.zip")).is_err());
}

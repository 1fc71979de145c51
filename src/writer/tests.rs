use super::*;
use crate::kinematics::LorentzVector;
use crate::schema::{ColumnSet, ConversionColumn, MuonColumn, RowGroupKind};
use std::fs::File;
use std::io::Read;
use tempfile::tempdir;

fn sample_rows() -> (EventRecord, ConversionReco, MuonReco) {
    let event = EventRecord::new(285_960, 101);

    let mut muon = MuonReco::default();
    let m1 = muon.push_muon(LorentzVector::new(3.5, 0.0, 1.0, 3.7), true);
    let m2 = muon.push_muon(LorentzVector::new(-3.5, 0.0, 1.0, 3.7), false);
    muon.push_dimuon(LorentzVector::new(0.0, 0.0, 2.0, 7.4), m1, m2);

    let mut conversion = ConversionReco::default();
    conversion.push(LorentzVector::new(0.0, 0.5, 2.0, 7.9), 0, 0, 3.5, 1);

    (event, conversion, muon)
}

// ==================== Directory Mode Tests ====================

#[test]
fn test_directory_layout_tables() {
    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("forest");

    let (event, conversion, muon) = sample_rows();
    let mut writer = ForestWriter::create(&forest_path, ForestLayout::Directory).unwrap();
    writer.write_event(&event, &conversion, &muon).unwrap();
    let stats = writer.close().unwrap();

    assert_eq!(stats.tables_written, 4);
    assert_eq!(stats.conversion_rows, 1);
    assert_eq!(stats.muon_rows, 1);
    for group in RowGroupKind::ALL {
        assert!(forest_path.join(ConversionColumn::table_path(group)).is_file());
        assert!(forest_path.join(MuonColumn::table_path(group)).is_file());
    }
}

#[test]
fn test_directory_already_exists() {
    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("existing");
    std::fs::create_dir(&forest_path).unwrap();

    let result = ForestWriter::create(&forest_path, ForestLayout::Directory);
    assert!(matches!(result, Err(WriterError::AlreadyExists(_))));
}

// ==================== Container Mode Tests ====================

#[test]
fn test_container_entries_are_stored() {
    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("forest.zip");

    let (event, conversion, muon) = sample_rows();
    let mut writer = ForestWriter::create(&forest_path, ForestLayout::Container).unwrap();
    writer.write_event(&event, &conversion, &muon).unwrap();
    writer.close().unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&forest_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 4);

    let mut entry = archive
        .by_name(&ConversionColumn::table_path(RowGroupKind::Reco))
        .unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored);

    let mut magic = [0u8; 4];
    entry.read_exact(&mut magic).unwrap();
    assert_eq!(&magic, b"PAR1");
}

#[test]
fn test_container_already_exists() {
    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("forest.zip");
    File::create(&forest_path).unwrap();

    let result = ForestWriter::create(&forest_path, ForestLayout::Container);
    assert!(matches!(result, Err(WriterError::AlreadyExists(_))));
}

#[test]
fn test_empty_forest_writes_empty_tables() {
    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("empty.zip");

    let writer = ForestWriter::create(&forest_path, ForestLayout::Container).unwrap();
    let stats = writer.close().unwrap();

    assert_eq!(stats.tables_written, 4);
    assert_eq!(stats.conversion_rows, 0);
}

#[test]
fn test_config_sets_row_groups_and_compression() {
    use parquet::basic::Compression;
    use parquet::file::reader::{FileReader, SerializedFileReader};

    let dir = tempdir().unwrap();
    let forest_path = dir.path().join("forest");
    let config = WriterConfig {
        zstd_level: 9,
        row_group_size: 2,
    };

    let (_, conversion, muon) = sample_rows();
    let mut writer =
        ForestWriter::create_with_config(&forest_path, ForestLayout::Directory, config).unwrap();
    for number in 0..5 {
        let event = EventRecord::new(285_960, number);
        writer.write_event(&event, &conversion, &muon).unwrap();
    }
    writer.close().unwrap();

    let table = forest_path.join(ConversionColumn::table_path(RowGroupKind::Reco));
    let reader = SerializedFileReader::new(File::open(table).unwrap()).unwrap();
    let metadata = reader.metadata();
    assert_eq!(metadata.file_metadata().num_rows(), 5);
    assert_eq!(metadata.num_row_groups(), 3);
    for column in metadata.row_group(0).columns() {
        assert!(matches!(column.compression(), Compression::ZSTD(_)));
    }
}

// ==================== Record Validation Tests ====================

#[test]
fn test_conversion_length_mismatch_rejected() {
    let dir = tempdir().unwrap();
    let mut writer =
        ForestWriter::create(dir.path().join("bad.zip"), ForestLayout::Container).unwrap();

    let (event, mut conversion, _) = sample_rows();
    conversion.chi_mass.push(3.6);

    let result = writer.write_conversion(&event, &conversion);
    assert!(matches!(result, Err(WriterError::InvalidData(_))));
}

#[test]
fn test_muon_length_mismatch_rejected() {
    let dir = tempdir().unwrap();
    let mut writer =
        ForestWriter::create(dir.path().join("bad.zip"), ForestLayout::Container).unwrap();

    let (event, _, mut muon) = sample_rows();
    muon.muon_is_global.pop();

    let result = writer.write_muon(&event, &muon);
    assert!(matches!(result, Err(WriterError::InvalidData(_))));
}

#[test]
fn test_record_builders_return_indices() {
    let (_, conversion, muon) = sample_rows();
    assert_eq!(conversion.len(), 1);
    assert!(!conversion.is_empty());
    assert_eq!(muon.muon1_idx, vec![0]);
    assert_eq!(muon.muon2_idx, vec![1]);
}

#[test]
fn test_stats_display() {
    let stats = WriterStats {
        conversion_rows: 3,
        muon_rows: 3,
        tables_written: 4,
        bytes_written: 1024,
    };
    assert_eq!(
        stats.to_string(),
        "Wrote 4 tables (3 conversion rows, 3 muon rows, 1024 bytes)"
    );
}

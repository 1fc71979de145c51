use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::histogram::{Beam, Category, Variable};
use crate::kinematics::LorentzVector;
use crate::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};

const JPSI: f64 = 3.096916;

/// Muon pair with the given transverse momenta at |eta| = 0.5.
fn push_dimuon(muon: &mut MuonReco, pts: [f64; 2], dimuon_mass: f64) -> u16 {
    let m1 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(pts[0], 0.5, 1.0, 0.105658), true);
    let m2 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(pts[1], -0.5, -1.0, 0.105658), false);
    muon.push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, dimuon_mass), m1, m2)
}

/// Candidate whose recovered dimuon mass equals the dimuon's own mass.
fn push_candidate(
    conversion: &mut ConversionReco,
    conversion_idx: u16,
    dimuon_idx: u16,
    chi_mass: f32,
    chi_type: u8,
) {
    conversion.push(
        LorentzVector::new(0.0, 0.0, 0.0, chi_mass as f64),
        conversion_idx,
        dimuon_idx,
        chi_mass,
        chi_type,
    );
}

fn write_rows(path: &Path, rows: &[(EventRecord, ConversionReco, MuonReco)]) {
    let mut writer = ForestWriter::create(path, ForestLayout::Container).unwrap();
    for (event, conversion, muon) in rows {
        writer.write_event(event, conversion, muon).unwrap();
    }
    writer.close().unwrap();
}

fn data_config(path: &Path, beams: &[Beam]) -> AnalysisConfig {
    let mut config = AnalysisConfig {
        beams: beams.to_vec(),
        ..AnalysisConfig::default()
    };
    config.samples.insert("DATA".to_string(), path.to_path_buf());
    config
}

fn analysis(config: AnalysisConfig) -> ChiAnalysis {
    let mut analysis = ChiAnalysis::new(config).unwrap();
    analysis.book();
    analysis
}

#[test]
fn test_selection_fills_accepted_candidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut conv0 = ConversionReco::default();
    let mut muon0 = MuonReco::default();
    let dm = push_dimuon(&mut muon0, [4.0, 4.0], JPSI);
    push_candidate(&mut conv0, 0, dm, 3.515, 1);
    let soft = push_dimuon(&mut muon0, [4.0, 2.0], 9.46030);
    push_candidate(&mut conv0, 1, soft, 9.905, 2);

    let mut conv1 = ConversionReco::default();
    let mut muon1 = MuonReco::default();
    let dm = push_dimuon(&mut muon1, [5.0, 3.5], JPSI);
    push_candidate(&mut conv1, 0, dm, 3.305, 1);
    push_candidate(&mut conv1, 1, dm, 3.705, 1);

    write_rows(
        &path,
        &[
            (EventRecord::new(1, 101), conv0, muon0),
            (EventRecord::new(1, 102), conv1, muon1),
        ],
    );

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    analysis.process_sample("DATA").unwrap();

    let category = Category::new("DATA", Beam::PA);
    let chic = analysis.histograms().get(&category, Variable::ChicMass).unwrap();
    assert_eq!(chic.entries, 3);
    assert_eq!(chic.bin_content[30], 1.0);
    assert_eq!(chic.bin_content[51], 1.0);
    assert_eq!(chic.bin_content[70], 1.0);
    let chib = analysis.histograms().get(&category, Variable::ChibMass).unwrap();
    assert_eq!(chib.entries, 0);

    let stats = analysis.stats();
    assert_eq!(stats.rows_processed, 2);
    assert_eq!(stats.candidates_seen, 4);
    assert_eq!(stats.candidates_accepted, 3);
    assert_eq!(stats.skipped_candidates, 0);
    assert_eq!(stats.dimuons_used, 2);
    assert_eq!(stats.conversions_used, 3);
}

#[test]
fn test_used_indices_count_chib_candidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut conversion = ConversionReco::default();
    let mut muon = MuonReco::default();
    let chic = push_dimuon(&mut muon, [4.0, 4.0], JPSI);
    push_candidate(&mut conversion, 0, chic, 3.515, 1);
    let chib = push_dimuon(&mut muon, [5.0, 4.5], 9.46030);
    push_candidate(&mut conversion, 1, chib, 9.905, 2);
    push_candidate(&mut conversion, 2, chib, 9.895, 2);
    write_rows(&path, &[(EventRecord::new(1, 101), conversion, muon)]);

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    analysis.process_sample("DATA").unwrap();

    let category = Category::new("DATA", Beam::PA);
    let chib_hist = analysis.histograms().get(&category, Variable::ChibMass).unwrap();
    assert_eq!(chib_hist.entries, 2);

    let stats = analysis.stats();
    assert_eq!(stats.candidates_accepted, 3);
    assert_eq!(stats.dimuons_used, 2);
    assert_eq!(stats.conversions_used, 3);
}

#[test]
fn test_mass_sanity_violation_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut conversion = ConversionReco::default();
    let mut muon = MuonReco::default();
    let dm = push_dimuon(&mut muon, [4.0, 4.0], 3.2);
    push_candidate(&mut conversion, 0, dm, 3.515, 1);
    write_rows(&path, &[(EventRecord::new(1, 101), conversion, muon)]);

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    let err = analysis.process_sample("DATA").unwrap_err();
    match err {
        AnalysisError::MassSanity {
            row,
            candidate,
            chi_type,
            expected,
            ..
        } => {
            assert_eq!((row, candidate, chi_type), (0, 0, 1));
            assert_eq!(expected, JPSI);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(analysis.stats().rows_processed, 0);
}

#[test]
fn test_out_of_range_indices_and_unknown_types() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut conversion = ConversionReco::default();
    let mut muon = MuonReco::default();
    let dm = push_dimuon(&mut muon, [4.0, 4.0], JPSI);
    // Dimuon 5 does not exist
    push_candidate(&mut conversion, 0, 5, 3.515, 1);
    // Dimuon 1 points at muons 7 and 8
    let broken = muon.push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, JPSI), 7, 8);
    push_candidate(&mut conversion, 1, broken, 3.515, 1);
    push_candidate(&mut conversion, 2, dm, 3.515, 9);
    push_candidate(&mut conversion, 3, dm, 3.615, 1);
    write_rows(&path, &[(EventRecord::new(1, 101), conversion, muon)]);

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    analysis.process_sample("DATA").unwrap();

    let stats = analysis.stats();
    assert_eq!(stats.candidates_seen, 4);
    assert_eq!(stats.skipped_candidates, 2);
    assert_eq!(stats.candidates_accepted, 1);

    let category = Category::new("DATA", Beam::PA);
    let chic = analysis.histograms().get(&category, Variable::ChicMass).unwrap();
    assert_eq!(chic.entries, 1);
    assert_eq!(chic.bin_content[61], 1.0);
}

#[test]
fn test_entry_count_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut writer = ForestWriter::create(&path, ForestLayout::Container).unwrap();
    for i in 0..3 {
        let event = EventRecord::new(1, 101 + i);
        writer.write_muon(&event, &MuonReco::default()).unwrap();
        if i < 2 {
            writer.write_conversion(&event, &ConversionReco::default()).unwrap();
        }
    }
    writer.close().unwrap();

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    let err = analysis.process_sample("DATA").unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::EntryCountMismatch {
            muon: 3,
            conversion: 2,
            ..
        }
    ));
}

#[test]
fn test_event_number_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut writer = ForestWriter::create(&path, ForestLayout::Directory).unwrap();
    writer
        .write_muon(&EventRecord::new(1, 101), &MuonReco::default())
        .unwrap();
    writer
        .write_conversion(&EventRecord::new(1, 999), &ConversionReco::default())
        .unwrap();
    writer.close().unwrap();

    let mut analysis = analysis(data_config(&path, &[Beam::PA]));
    let err = analysis.process_sample("DATA").unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::EventMismatch {
            row: 0,
            muon: 101,
            conversion: 999,
            ..
        }
    ));
}

#[test]
fn test_run_gates_split_beam_directions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut rows = Vec::new();
    for (number, run) in [(1u64, 285960u32), (2, 285500), (3, 100)] {
        let mut conversion = ConversionReco::default();
        let mut muon = MuonReco::default();
        let dm = push_dimuon(&mut muon, [4.0, 4.0], JPSI);
        push_candidate(&mut conversion, 0, dm, 3.515, 1);
        rows.push((EventRecord::new(run, number), conversion, muon));
    }
    write_rows(&path, &rows);

    let mut analysis = analysis(data_config(&path, &[Beam::PPb, Beam::Pbp, Beam::PA]));
    analysis.process_sample("DATA").unwrap();

    let entries = |beam| {
        analysis
            .histograms()
            .get(&Category::new("DATA", beam), Variable::ChicMass)
            .unwrap()
            .entries
    };
    assert_eq!(entries(Beam::PPb), 1);
    assert_eq!(entries(Beam::Pbp), 1);
    assert_eq!(entries(Beam::PA), 3);
}

#[test]
fn test_global_muon_requirement() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forest.zip");

    let mut conversion = ConversionReco::default();
    let mut muon = MuonReco::default();
    let m1 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(4.0, 0.5, 1.0, 0.105658), false);
    let m2 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(4.0, 0.5, -1.0, 0.105658), false);
    let dm = muon.push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, JPSI), m1, m2);
    push_candidate(&mut conversion, 0, dm, 3.515, 1);
    write_rows(&path, &[(EventRecord::new(1, 101), conversion, muon)]);

    let mut config = data_config(&path, &[Beam::PA]);
    config.cuts.require_global = true;
    let mut strict = analysis(config);
    strict.process_sample("DATA").unwrap();
    assert_eq!(strict.stats().candidates_accepted, 0);

    let mut loose = analysis(data_config(&path, &[Beam::PA]));
    loose.process_sample("DATA").unwrap();
    assert_eq!(loose.stats().candidates_accepted, 1);
}

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::Path;
use tempfile::TempDir;

use chiforest::analysis::{AnalysisConfig, ChiAnalysis};
use chiforest::kinematics::LorentzVector;
use chiforest::reader::{ConversionTree, MuonTree};
use chiforest::schema::{ConversionColumn, MuonColumn};
use chiforest::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};

const JPSI: f64 = 3.096916;

/// Write a forest of `events` rows with `per_event` candidates each
fn generate_forest(path: &Path, events: usize, per_event: usize) {
    let mut writer = ForestWriter::create(path, ForestLayout::Container).unwrap();
    for i in 0..events {
        let mut conversion = ConversionReco::default();
        let mut muon = MuonReco::default();
        for k in 0..per_event {
            let x = (i * per_event + k) as f64;
            let pt = 2.5 + 3.0 * (x * 0.31).sin().abs();
            let eta = 2.0 * (x * 0.13).sin();
            let m1 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(pt, eta, 0.4, 0.105658), true);
            let m2 = muon.push_muon(LorentzVector::from_pt_eta_phi_m(pt, -eta, 2.4, 0.105658), true);
            let dm = muon.push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, JPSI), m1, m2);
            let chi_mass = (3.5 + 0.05 * (x * 0.7).sin()) as f32;
            conversion.push(
                LorentzVector::new(0.0, 0.0, 0.0, chi_mass as f64),
                k as u16,
                dm,
                chi_mass,
                1,
            );
        }
        writer
            .write_event(&EventRecord::new(1, i as u64), &conversion, &muon)
            .unwrap();
    }
    writer.close().unwrap();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for events in [1_000, 10_000].iter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("forest.zip");
        generate_forest(&path, *events, 2);

        group.throughput(Throughput::Elements(*events as u64));

        group.bench_with_input(BenchmarkId::new("event_only", events), events, |b, &n| {
            b.iter(|| {
                let mut tree = MuonTree::open(&path).unwrap();
                let mut sum = 0u64;
                for row in 0..n {
                    tree.advance(row).unwrap();
                    sum += tree.event_number();
                }
                sum
            });
        });

        group.bench_with_input(BenchmarkId::new("reco_columns", events), events, |b, &n| {
            b.iter(|| {
                let mut muon = MuonTree::open(&path).unwrap();
                let mut conversion = ConversionTree::open(&path).unwrap();
                muon.activate(&[MuonColumn::RecoMuonMom]).unwrap();
                conversion
                    .activate(&[ConversionColumn::RecoChiMass, ConversionColumn::RecoChiType])
                    .unwrap();
                let mut total = 0.0f64;
                for row in 0..n {
                    muon.advance(row).unwrap();
                    conversion.advance(row).unwrap();
                    total += muon.reco_muon_mom().iter().map(|m| m.pt()).sum::<f64>();
                    total += conversion.reco_chi_mass().iter().map(|&m| m as f64).sum::<f64>();
                }
                total
            });
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.sample_size(10);

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("forest.zip");
    let events = 10_000;
    generate_forest(&path, events, 3);
    group.throughput(Throughput::Elements(events as u64));

    group.bench_function("process_sample", |b| {
        b.iter(|| {
            let mut config = AnalysisConfig::default();
            config.samples.insert("DATA".to_string(), path.clone());
            config.render.mode = String::new();
            let mut analysis = ChiAnalysis::new(config).unwrap();
            analysis.book();
            analysis.process_sample("DATA").unwrap();
            analysis.stats().candidates_accepted
        });
    });

    group.finish();
}

criterion_group!(benches, bench_advance, bench_selection);
criterion_main!(benches);

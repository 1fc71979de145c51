use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use chiforest::kinematics::LorentzVector;
use chiforest::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};

const MUON_MASS: f64 = 0.105658;
const JPSI_MASS: f64 = 3.096916;
const UPSILON_MASS: f64 = 9.46030;

/// chi_c1 / chi_c2 and chi_b1 / chi_b2 mass differences to their S-state.
const CHIC_DELTAS: [f64; 2] = [0.4137, 0.4593];
const CHIB_DELTAS: [f64; 2] = [0.4327, 0.4523];

/// First pPb and Pbp runs of the 2016 pA period.
const PPB_FIRST_RUN: u32 = 285952;
const PBP_FIRST_RUN: u32 = 285410;

/// Generate a synthetic forest
pub fn run(output: PathBuf, events: usize, layout: ForestLayout) -> Result<()> {
    info!("chiforest - synthetic forest generator");
    info!("======================================");
    info!("Creating forest: {}", output.display());

    let mut writer =
        ForestWriter::create(&output, layout).context("Failed to create forest writer")?;

    let mut candidates = 0usize;
    for i in 0..events {
        let (event, conversion, muon) = generate_event(i);
        candidates += conversion.len();
        writer
            .write_event(&event, &conversion, &muon)
            .with_context(|| format!("Failed to write event {}", i))?;

        if (i + 1) % 100_000 == 0 {
            info!("  Written {} events...", i + 1);
        }
    }

    let stats = writer.close().context("Failed to finalize forest")?;

    println!("Forest written: {}", output.display());
    println!("  Events:     {}", events);
    println!("  Candidates: {}", candidates);
    println!("  {}", stats);
    println!();
    println!("Run the selection with a config such as:");
    println!();
    println!("  sample_types = [\"DATA\"]");
    println!("  beams = [\"pPb\", \"Pbp\", \"PA\"]");
    println!();
    println!("  [samples]");
    println!("  DATA = \"{}\"", output.display());
    println!();
    println!("  chiforest run --config analysis.toml");

    Ok(())
}

/// Build event `i`: alternating beam directions, one or two dimuons, and a
/// photon conversion per dimuon whose chi mass matches the reference mass.
fn generate_event(i: usize) -> (EventRecord, ConversionReco, MuonReco) {
    let x = i as f64;
    let run = if i % 2 == 0 {
        PPB_FIRST_RUN + (i % 500) as u32
    } else {
        PBP_FIRST_RUN + (i % 500) as u32
    };
    let mut event = EventRecord::new(run, 1_000_000 + i as u64);
    event.lumi = (i / 1000) as u16;
    event.n_pv = 1 + (i % 3) as u8;

    let mut conversion = ConversionReco::default();
    let mut muon = MuonReco::default();

    let n_dimuons = 1 + i % 2;
    for k in 0..n_dimuons {
        let y = x + 7.0 * k as f64;
        let upsilon = i % 5 == 4;

        let pt1 = 2.5 + 4.0 * (y * 0.37).sin().abs();
        let pt2 = 2.5 + 4.0 * (y * 0.53 + 1.0).sin().abs();
        let eta1 = 2.2 * (y * 0.11).sin();
        let eta2 = 2.2 * (y * 0.17 + 0.5).sin();
        let phi = std::f64::consts::PI * (y * 0.07).sin();
        let opening = if upsilon { 2.6 } else { 1.2 };

        let mu1 = LorentzVector::from_pt_eta_phi_m(pt1, eta1, phi, MUON_MASS);
        let mu2 = LorentzVector::from_pt_eta_phi_m(pt2, eta2, phi + opening, MUON_MASS);
        let m1 = muon.push_muon(mu1, (i + k) % 7 != 0);
        let m2 = muon.push_muon(mu2, (i + k) % 11 != 0);
        let dimuon = mu1 + mu2;
        let dm = muon.push_dimuon(dimuon, m1, m2);

        let (reference, deltas, chi_type) = if upsilon {
            (UPSILON_MASS, CHIB_DELTAS, 2)
        } else {
            (JPSI_MASS, CHIC_DELTAS, 1)
        };
        let smear = 0.01 * (y * 1.3).sin();
        let delta = deltas[(i / 2 + k) % 2] + smear;
        let dimuonconv = dimuon + collinear_photon(&dimuon, delta);
        let chi_mass = (dimuonconv.m() - dimuon.m() + reference) as f32;

        conversion.push(dimuonconv, k as u16, dm, chi_mass, chi_type);
    }

    (event, conversion, muon)
}

/// Photon along the dimuon direction raising its invariant mass by `delta`.
fn collinear_photon(dimuon: &LorentzVector, delta: f64) -> LorentzVector {
    let m = dimuon.m();
    let p = dimuon.p();
    let energy = ((m + delta).powi(2) - m * m) / (2.0 * (dimuon.e - p));
    let scale = if p > 0.0 { energy / p } else { 0.0 };
    LorentzVector::new(
        dimuon.px * scale,
        dimuon.py * scale,
        dimuon.pz * scale,
        energy,
    )
}

//! Shared forest fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use chiforest::kinematics::LorentzVector;
use chiforest::writer::{ConversionReco, EventRecord, ForestLayout, ForestWriter, MuonReco};

pub const JPSI: f64 = 3.096916;
pub const UPSILON: f64 = 9.46030;
pub const MUON_MASS: f64 = 0.105658;

/// One event of both directories.
pub struct Row {
    pub event: EventRecord,
    pub conversion: ConversionReco,
    pub muon: MuonReco,
}

impl Row {
    pub fn empty(run: u32, number: u64) -> Self {
        Self {
            event: EventRecord::new(run, number),
            conversion: ConversionReco::default(),
            muon: MuonReco::default(),
        }
    }

    /// Add a dimuon at `dimuon_mass` whose muons have the given transverse
    /// momenta and pseudorapidities.
    pub fn dimuon(&mut self, pts: [f64; 2], etas: [f64; 2], dimuon_mass: f64) -> u16 {
        let m1 = self
            .muon
            .push_muon(LorentzVector::from_pt_eta_phi_m(pts[0], etas[0], 0.3, MUON_MASS), true);
        let m2 = self
            .muon
            .push_muon(LorentzVector::from_pt_eta_phi_m(pts[1], etas[1], 2.1, MUON_MASS), true);
        self.muon
            .push_dimuon(LorentzVector::new(0.0, 0.0, 0.0, dimuon_mass), m1, m2)
    }

    /// Add a candidate whose recovered dimuon mass equals the mass of `dimuon`.
    pub fn candidate(&mut self, dimuon: u16, chi_mass: f32, chi_type: u8) {
        let conversion_idx = self.conversion.len() as u16;
        self.conversion.push(
            LorentzVector::new(0.0, 0.0, 0.0, chi_mass as f64),
            conversion_idx,
            dimuon,
            chi_mass,
            chi_type,
        );
    }
}

pub fn write_forest(path: &Path, layout: ForestLayout, rows: &[Row]) {
    let mut writer = ForestWriter::create(path, layout).unwrap();
    for row in rows {
        writer
            .write_event(&row.event, &row.conversion, &row.muon)
            .unwrap();
    }
    writer.close().unwrap();
}

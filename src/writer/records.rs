use crate::kinematics::{LorentzVector, Vector3};

use super::error::WriterError;

/// Event-level row, shared by every analysis directory.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventRecord {
    /// Run number
    pub run: u32,
    /// Luminosity section
    pub lumi: u16,
    /// Bunch crossing
    pub bx: u32,
    /// Orbit number
    pub orbit: u64,
    /// Event number
    pub number: u64,
    /// Number of primary vertices
    pub n_pv: u8,
    /// Primary vertex position
    pub privtx_pos: Vector3,
    /// Primary vertex position error
    pub privtx_err: Vector3,
}

impl EventRecord {
    /// Event with the given identifier and every other field zero.
    pub fn new(run: u32, number: u64) -> Self {
        Self {
            run,
            number,
            ..Self::default()
        }
    }
}

/// Reco-level row of the conversion directory.
///
/// Every vector holds one entry per dimuon + conversion combination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionReco {
    /// Four-momentum of each combination
    pub dimuonconv_mom: Vec<LorentzVector>,
    /// Conversion index of each combination
    pub conversion_idx: Vec<u16>,
    /// Dimuon index of each combination
    pub dimuon_idx: Vec<u16>,
    /// Chi mass of each combination
    pub chi_mass: Vec<f32>,
    /// Chi type of each combination
    pub chi_type: Vec<u8>,
}

impl ConversionReco {
    /// Append one combination.
    pub fn push(
        &mut self,
        mom: LorentzVector,
        conversion_idx: u16,
        dimuon_idx: u16,
        chi_mass: f32,
        chi_type: u8,
    ) -> &mut Self {
        self.dimuonconv_mom.push(mom);
        self.conversion_idx.push(conversion_idx);
        self.dimuon_idx.push(dimuon_idx);
        self.chi_mass.push(chi_mass);
        self.chi_type.push(chi_type);
        self
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.dimuonconv_mom.len()
    }

    /// Whether the row holds no combination.
    pub fn is_empty(&self) -> bool {
        self.dimuonconv_mom.is_empty()
    }

    pub(super) fn validate(&self) -> Result<(), WriterError> {
        let n = self.len();
        let lengths = [
            ("conversion_idx", self.conversion_idx.len()),
            ("dimuon_idx", self.dimuon_idx.len()),
            ("chi_mass", self.chi_mass.len()),
            ("chi_type", self.chi_type.len()),
        ];
        check_lengths("dimuonconv_mom", n, &lengths)
    }
}

/// Reco-level row of the muon directory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MuonReco {
    /// Four-momentum of each dimuon
    pub dimuon_mom: Vec<LorentzVector>,
    /// First muon index of each dimuon
    pub muon1_idx: Vec<u16>,
    /// Second muon index of each dimuon
    pub muon2_idx: Vec<u16>,
    /// Four-momentum of each muon
    pub muon_mom: Vec<LorentzVector>,
    /// Global-muon flag of each muon
    pub muon_is_global: Vec<bool>,
}

impl MuonReco {
    /// Append one muon, returning its index.
    pub fn push_muon(&mut self, mom: LorentzVector, is_global: bool) -> u16 {
        self.muon_mom.push(mom);
        self.muon_is_global.push(is_global);
        (self.muon_mom.len() - 1) as u16
    }

    /// Append one dimuon built from two muon indices, returning its index.
    pub fn push_dimuon(&mut self, mom: LorentzVector, muon1_idx: u16, muon2_idx: u16) -> u16 {
        self.dimuon_mom.push(mom);
        self.muon1_idx.push(muon1_idx);
        self.muon2_idx.push(muon2_idx);
        (self.dimuon_mom.len() - 1) as u16
    }

    pub(super) fn validate(&self) -> Result<(), WriterError> {
        check_lengths(
            "dimuon_mom",
            self.dimuon_mom.len(),
            &[
                ("muon1_idx", self.muon1_idx.len()),
                ("muon2_idx", self.muon2_idx.len()),
            ],
        )?;
        check_lengths(
            "muon_mom",
            self.muon_mom.len(),
            &[("muon_is_global", self.muon_is_global.len())],
        )
    }
}

fn check_lengths(
    reference: &str,
    expected: usize,
    others: &[(&str, usize)],
) -> Result<(), WriterError> {
    for &(name, len) in others {
        if len != expected {
            return Err(WriterError::InvalidData(format!(
                "{} has {} entries but {} has {}",
                name, len, reference, expected
            )));
        }
    }
    Ok(())
}

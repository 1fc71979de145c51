use crate::kinematics::LorentzVector;
use crate::reader::{ConversionTree, MuonTree};

use super::config::{CutConfig, SanityConfig};

/// Candidate columns of the current conversion row.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRow<'a> {
    /// Dimuon + conversion four-momenta
    pub dimuonconv_mom: &'a [LorentzVector],
    /// Conversion index of each candidate
    pub conversion_idx: &'a [u16],
    /// Dimuon index of each candidate
    pub dimuon_idx: &'a [u16],
    /// Chi mass of each candidate
    pub chi_mass: &'a [f32],
    /// Chi type of each candidate
    pub chi_type: &'a [u8],
}

impl<'a> ConversionRow<'a> {
    /// Columns of the row loaded in `tree`.
    pub fn from_tree(tree: &'a ConversionTree) -> Self {
        Self {
            dimuonconv_mom: tree.reco_dimuonconv_mom(),
            conversion_idx: tree.reco_dimuonconv_conversion_idx(),
            dimuon_idx: tree.reco_dimuonconv_dimuon_idx(),
            chi_mass: tree.reco_chi_mass(),
            chi_type: tree.reco_chi_type(),
        }
    }

    /// Number of candidates, one per chi type entry.
    pub fn len(&self) -> usize {
        self.chi_type.len()
    }

    /// Whether the row has no candidate.
    pub fn is_empty(&self) -> bool {
        self.chi_type.is_empty()
    }
}

/// Dimuon and muon columns of the current muon row.
#[derive(Debug, Clone, Copy)]
pub struct MuonRow<'a> {
    /// Dimuon four-momenta
    pub dimuon_mom: &'a [LorentzVector],
    /// First muon of each dimuon
    pub muon1_idx: &'a [u16],
    /// Second muon of each dimuon
    pub muon2_idx: &'a [u16],
    /// Muon four-momenta
    pub muon_mom: &'a [LorentzVector],
    /// Global-muon flags, empty unless the global requirement is on
    pub muon_is_global: &'a [bool],
}

impl<'a> MuonRow<'a> {
    /// Columns of the row loaded in `tree`.
    pub fn from_tree(tree: &'a MuonTree) -> Self {
        Self {
            dimuon_mom: tree.reco_dimuon_mom(),
            muon1_idx: tree.reco_dimuon_muon1_idx(),
            muon2_idx: tree.reco_dimuon_muon2_idx(),
            muon_mom: tree.reco_muon_mom(),
            muon_is_global: tree.reco_muon_is_global(),
        }
    }
}

/// A candidate with its dimuon resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Candidate index within the row
    pub index: usize,
    /// Referenced conversion
    pub conversion_idx: u16,
    /// Referenced dimuon
    pub dimuon_idx: u16,
    /// Chi mass
    pub chi_mass: f32,
    /// Chi type, 1 for chi_c and 2 for chi_b
    pub chi_type: u8,
    /// Dimuon four-momentum
    pub dimuon: LorentzVector,
    /// Dimuon + conversion four-momentum
    pub dimuonconv: LorentzVector,
}

impl Candidate {
    /// Resolve candidate `index`; `None` when an index points past its column.
    pub fn resolve(conversion: &ConversionRow<'_>, muon: &MuonRow<'_>, index: usize) -> Option<Self> {
        let dimuon_idx = *conversion.dimuon_idx.get(index)?;
        Some(Self {
            index,
            conversion_idx: *conversion.conversion_idx.get(index)?,
            dimuon_idx,
            chi_mass: *conversion.chi_mass.get(index)?,
            chi_type: *conversion.chi_type.get(index)?,
            dimuon: *muon.dimuon_mom.get(dimuon_idx as usize)?,
            dimuonconv: *conversion.dimuonconv_mom.get(index)?,
        })
    }

    /// Dimuon mass recovered from the chi mass,
    /// `chi_mass + M(dimuon) - M(dimuon + conversion)`, rounded to single
    /// precision like the stored chi mass.
    pub fn dimuon_mass(&self) -> f32 {
        (self.chi_mass as f64 + self.dimuon.m() - self.dimuonconv.m()) as f32
    }

    /// Mass check against the reference of the chi type.
    ///
    /// `Ok` for types without a reference; `Err(reference)` on a deviation
    /// beyond the tolerance.
    pub fn check_mass(&self, sanity: &SanityConfig) -> Result<(), f64> {
        match sanity.reference(self.chi_type) {
            Some(reference) if (self.dimuon_mass() as f64 - reference).abs() > sanity.tolerance => {
                Err(reference)
            }
            _ => Ok(()),
        }
    }

    /// Both muons of the dimuon, `None` when a muon index points past the
    /// muon column.
    pub fn muons(&self, muon: &MuonRow<'_>) -> Option<[usize; 2]> {
        let dm = self.dimuon_idx as usize;
        let m1 = *muon.muon1_idx.get(dm)? as usize;
        let m2 = *muon.muon2_idx.get(dm)? as usize;
        (m1 < muon.muon_mom.len() && m2 < muon.muon_mom.len()).then_some([m1, m2])
    }
}

/// Single-muon acceptance.
pub fn muon_accepted(mom: &LorentzVector, cuts: &CutConfig) -> bool {
    let eta = mom.eta().abs();
    let pt = mom.pt();
    (eta < cuts.eta_boundary && pt > cuts.pt_min_central)
        || (eta > cuts.eta_boundary && pt > cuts.pt_min_forward)
}

/// Acceptance of a muon pair.
pub fn dimuon_accepted(muons: [usize; 2], muon: &MuonRow<'_>, cuts: &CutConfig) -> bool {
    if cuts.require_global
        && !muons
            .iter()
            .any(|&m| muon.muon_is_global.get(m).copied().unwrap_or(false))
    {
        return false;
    }
    muons
        .iter()
        .all(|&m| muon_accepted(&muon.muon_mom[m], cuts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn muon_at(pt: f64, eta: f64) -> LorentzVector {
        LorentzVector::from_pt_eta_phi_m(pt, eta, 0.3, 0.105658)
    }

    #[test]
    fn test_muon_acceptance() {
        let cuts = CutConfig::default();
        assert!(muon_accepted(&muon_at(3.5, 0.5), &cuts));
        assert!(muon_accepted(&muon_at(3.5, -2.0), &cuts));
        assert!(!muon_accepted(&muon_at(2.5, 0.5), &cuts));
        let at_threshold = LorentzVector::new(3.0, 0.0, 0.0, 3.01);
        assert!(!muon_accepted(&at_threshold, &cuts));

        let forward = CutConfig {
            pt_min_forward: 5.0,
            ..CutConfig::default()
        };
        assert!(!muon_accepted(&muon_at(4.0, 2.0), &forward));
        assert!(muon_accepted(&muon_at(4.0, 1.0), &forward));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let moms = [LorentzVector::new(0.0, 0.0, 0.0, 3.5)];
        let conversion = ConversionRow {
            dimuonconv_mom: &moms,
            conversion_idx: &[0, 0],
            dimuon_idx: &[0, 4],
            chi_mass: &[3.5, 3.5],
            chi_type: &[1, 1],
        };
        let dimuons = [LorentzVector::new(0.0, 0.0, 0.0, 3.1)];
        let muon = MuonRow {
            dimuon_mom: &dimuons,
            muon1_idx: &[0],
            muon2_idx: &[7],
            muon_mom: &[LorentzVector::default()],
            muon_is_global: &[],
        };

        let first = Candidate::resolve(&conversion, &muon, 0).unwrap();
        assert_eq!(first.dimuon, dimuons[0]);
        assert_eq!(first.muons(&muon), None);
        assert_eq!(Candidate::resolve(&conversion, &muon, 1), None);
        assert_eq!(Candidate::resolve(&conversion, &muon, 2), None);
        assert_eq!(conversion.len(), 2);
    }

    #[test]
    fn test_mass_check() {
        let sanity = SanityConfig::default();
        let candidate = Candidate {
            index: 0,
            conversion_idx: 0,
            dimuon_idx: 0,
            chi_mass: 3.5,
            chi_type: 1,
            dimuon: LorentzVector::new(0.0, 0.0, 0.0, 3.096916),
            dimuonconv: LorentzVector::new(0.0, 0.0, 0.0, 3.5),
        };
        assert!((candidate.dimuon_mass() - 3.096916).abs() < 1e-5);
        assert_eq!(candidate.check_mass(&sanity), Ok(()));

        let off = Candidate {
            chi_mass: 3.51,
            ..candidate
        };
        assert_eq!(off.check_mass(&sanity), Err(3.096916));

        let unknown = Candidate {
            chi_type: 7,
            ..off
        };
        assert_eq!(unknown.check_mass(&sanity), Ok(()));
    }

    #[test]
    fn test_global_requirement() {
        let moms = [muon_at(4.0, 0.1), muon_at(4.0, -0.1)];
        let mut muon = MuonRow {
            dimuon_mom: &[],
            muon1_idx: &[0],
            muon2_idx: &[1],
            muon_mom: &moms,
            muon_is_global: &[false, false],
        };
        let cuts = CutConfig {
            require_global: true,
            ..CutConfig::default()
        };
        assert!(!dimuon_accepted([0, 1], &muon, &cuts));
        assert!(dimuon_accepted([0, 1], &muon, &CutConfig::default()));

        muon.muon_is_global = &[false, true];
        assert!(dimuon_accepted([0, 1], &muon, &cuts));
    }
}

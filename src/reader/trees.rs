use std::path::Path;

use crate::kinematics::{LorentzVector, Vector3};
use crate::schema::{ConversionColumn, MuonColumn};

use super::{ReaderConfig, ReaderError, RowSource};

/// Shared surface of the typed directory readers.
macro_rules! tree_common {
    ($tree:ident, $column:ty) => {
        impl $tree {
            /// Open the directory tables of a forest.
            pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
                Ok(Self {
                    source: RowSource::open(path)?,
                })
            }

            /// Open the directory tables of a forest with custom configuration.
            pub fn open_with_config<P: AsRef<Path>>(
                path: P,
                config: ReaderConfig,
            ) -> Result<Self, ReaderError> {
                Ok(Self {
                    source: RowSource::open_with_config(path, config)?,
                })
            }

            /// See [`RowSource::activate`].
            pub fn activate(&mut self, columns: &[$column]) -> Result<(), ReaderError> {
                self.source.activate(columns)
            }

            /// See [`RowSource::activate_all`].
            pub fn activate_all(&mut self) -> Result<(), ReaderError> {
                self.source.activate_all()
            }

            /// See [`RowSource::advance`].
            pub fn advance(&mut self, row: usize) -> Result<(), ReaderError> {
                self.source.advance(row)
            }

            /// See [`RowSource::decode_composites`].
            pub fn decode_composites(&self) -> Result<(), ReaderError> {
                self.source.decode_composites()
            }

            /// Total rows of the primary group.
            pub fn row_count(&self) -> usize {
                self.source.row_count()
            }

            /// Underlying row source.
            pub fn source(&self) -> &RowSource<$column> {
                &self.source
            }

            /// Underlying row source, mutably.
            pub fn source_mut(&mut self) -> &mut RowSource<$column> {
                &mut self.source
            }

            /// Run number.
            pub fn event_run(&self) -> u32 {
                self.source.u32(<$column>::EventRun)
            }

            /// Luminosity section.
            pub fn event_lumi(&self) -> u16 {
                self.source.u16(<$column>::EventLumi)
            }

            /// Bunch crossing.
            pub fn event_bx(&self) -> u32 {
                self.source.u32(<$column>::EventBx)
            }

            /// Orbit number.
            pub fn event_orbit(&self) -> u64 {
                self.source.u64(<$column>::EventOrbit)
            }

            /// Event number.
            pub fn event_number(&self) -> u64 {
                self.source.u64(<$column>::EventNumber)
            }

            /// Number of primary vertices.
            pub fn event_npv(&self) -> u8 {
                self.source.u8(<$column>::EventNPv)
            }

            /// Primary vertex position.
            pub fn event_privtx_pos(&self) -> Vector3 {
                self.source.vector3(<$column>::EventPriVtxPos)
            }

            /// Primary vertex position error.
            pub fn event_privtx_err(&self) -> Vector3 {
                self.source.vector3(<$column>::EventPriVtxErr)
            }
        }
    };
}

/// Reader of the photon-conversion directory (`convAna`).
pub struct ConversionTree {
    source: RowSource<ConversionColumn>,
}

tree_common!(ConversionTree, ConversionColumn);

impl ConversionTree {
    /// Four-momentum of each dimuon + conversion combination.
    pub fn reco_dimuonconv_mom(&self) -> &[LorentzVector] {
        self.source
            .lorentz_list(ConversionColumn::RecoDiMuonConvMom)
    }

    /// Conversion index of each combination.
    pub fn reco_dimuonconv_conversion_idx(&self) -> &[u16] {
        self.source
            .u16_list(ConversionColumn::RecoDiMuonConvConversionIdx)
    }

    /// Dimuon index of each combination.
    pub fn reco_dimuonconv_dimuon_idx(&self) -> &[u16] {
        self.source.u16_list(ConversionColumn::RecoDiMuonConvDiMuonIdx)
    }

    /// Chi mass of each combination.
    pub fn reco_chi_mass(&self) -> &[f32] {
        self.source.f32_list(ConversionColumn::RecoChiMass)
    }

    /// Chi type of each combination.
    pub fn reco_chi_type(&self) -> &[u8] {
        self.source.u8_list(ConversionColumn::RecoChiType)
    }
}

/// Reader of the muon directory (`muonAna`).
pub struct MuonTree {
    source: RowSource<MuonColumn>,
}

tree_common!(MuonTree, MuonColumn);

impl MuonTree {
    /// Four-momentum of each dimuon.
    pub fn reco_dimuon_mom(&self) -> &[LorentzVector] {
        self.source.lorentz_list(MuonColumn::RecoDiMuonMom)
    }

    /// First muon index of each dimuon.
    pub fn reco_dimuon_muon1_idx(&self) -> &[u16] {
        self.source.u16_list(MuonColumn::RecoDiMuonMuon1Idx)
    }

    /// Second muon index of each dimuon.
    pub fn reco_dimuon_muon2_idx(&self) -> &[u16] {
        self.source.u16_list(MuonColumn::RecoDiMuonMuon2Idx)
    }

    /// Four-momentum of each muon.
    pub fn reco_muon_mom(&self) -> &[LorentzVector] {
        self.source.lorentz_list(MuonColumn::RecoMuonMom)
    }

    /// Global-muon flag of each muon.
    pub fn reco_muon_is_global(&self) -> &[bool] {
        self.source.bool_list(MuonColumn::RecoMuonIsGlobal)
    }
}

use super::columns::{ColumnDef, ColumnKind, ColumnSet, RowGroupKind};
use super::event_columns::*;

/// Directory holding the muon tables
pub const DIRECTORY: &str = "muonAna";
/// Event-level table name
pub const EVENT_TABLE: &str = "Muon_Event";
/// Reco-level table name
pub const RECO_TABLE: &str = "Muon_Reco";

/// Four-momentum of each dimuon
pub const RECO_DIMUON_MOM: &str = "Reco_DiMuon_Mom";
/// Index of the first muon of each dimuon
pub const RECO_DIMUON_MUON1_IDX: &str = "Reco_DiMuon_Muon1_Idx";
/// Index of the second muon of each dimuon
pub const RECO_DIMUON_MUON2_IDX: &str = "Reco_DiMuon_Muon2_Idx";
/// Four-momentum of each muon
pub const RECO_MUON_MOM: &str = "Reco_Muon_Mom";
/// Global-muon flag of each muon
pub const RECO_MUON_ISGLOBAL: &str = "Reco_Muon_isGlobal";

/// Columns of the muon directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MuonColumn {
    /// Run number
    EventRun,
    /// Luminosity section
    EventLumi,
    /// Bunch crossing
    EventBx,
    /// Orbit number
    EventOrbit,
    /// Event number
    EventNumber,
    /// Number of primary vertices
    EventNPv,
    /// Primary vertex position
    EventPriVtxPos,
    /// Primary vertex position error
    EventPriVtxErr,
    /// Dimuon four-momenta
    RecoDiMuonMom,
    /// First muon index per dimuon
    RecoDiMuonMuon1Idx,
    /// Second muon index per dimuon
    RecoDiMuonMuon2Idx,
    /// Muon four-momenta
    RecoMuonMom,
    /// Global-muon flags
    RecoMuonIsGlobal,
}

impl ColumnSet for MuonColumn {
    const DIRECTORY: &'static str = DIRECTORY;

    const ALL: &'static [Self] = &[
        MuonColumn::EventRun,
        MuonColumn::EventLumi,
        MuonColumn::EventBx,
        MuonColumn::EventOrbit,
        MuonColumn::EventNumber,
        MuonColumn::EventNPv,
        MuonColumn::EventPriVtxPos,
        MuonColumn::EventPriVtxErr,
        MuonColumn::RecoDiMuonMom,
        MuonColumn::RecoDiMuonMuon1Idx,
        MuonColumn::RecoDiMuonMuon2Idx,
        MuonColumn::RecoMuonMom,
        MuonColumn::RecoMuonIsGlobal,
    ];

    fn def(self) -> ColumnDef {
        use ColumnKind::*;
        use RowGroupKind::*;
        match self {
            MuonColumn::EventRun => ColumnDef::new(EVENT_RUN, Event, UInt32),
            MuonColumn::EventLumi => ColumnDef::new(EVENT_LUMI, Event, UInt16),
            MuonColumn::EventBx => ColumnDef::new(EVENT_BX, Event, UInt32),
            MuonColumn::EventOrbit => ColumnDef::new(EVENT_ORBIT, Event, UInt64),
            MuonColumn::EventNumber => ColumnDef::new(EVENT_NUMBER, Event, UInt64),
            MuonColumn::EventNPv => ColumnDef::new(EVENT_NPV, Event, UInt8),
            MuonColumn::EventPriVtxPos => ColumnDef::new(EVENT_PRIVTX_POS, Event, Vector3),
            MuonColumn::EventPriVtxErr => ColumnDef::new(EVENT_PRIVTX_ERR, Event, Vector3),
            MuonColumn::RecoDiMuonMom => ColumnDef::new(RECO_DIMUON_MOM, Reco, LorentzList),
            MuonColumn::RecoDiMuonMuon1Idx => {
                ColumnDef::new(RECO_DIMUON_MUON1_IDX, Reco, UInt16List)
            }
            MuonColumn::RecoDiMuonMuon2Idx => {
                ColumnDef::new(RECO_DIMUON_MUON2_IDX, Reco, UInt16List)
            }
            MuonColumn::RecoMuonMom => ColumnDef::new(RECO_MUON_MOM, Reco, LorentzList),
            MuonColumn::RecoMuonIsGlobal => ColumnDef::new(RECO_MUON_ISGLOBAL, Reco, BoolList),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn table_name(group: RowGroupKind) -> &'static str {
        match group {
            RowGroupKind::Event => EVENT_TABLE,
            RowGroupKind::Reco => RECO_TABLE,
        }
    }
}

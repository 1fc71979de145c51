use super::columns::{ColumnDef, ColumnKind, ColumnSet, RowGroupKind};
use super::event_columns::*;

/// Directory holding the photon-conversion tables
pub const DIRECTORY: &str = "convAna";
/// Event-level table name
pub const EVENT_TABLE: &str = "Conversion_Event";
/// Reco-level table name
pub const RECO_TABLE: &str = "Conversion_Reco";

/// Four-momentum of each dimuon + conversion combination
pub const RECO_DIMUONCONV_MOM: &str = "Reco_DiMuonConv_Mom";
/// Index of the conversion used by each combination
pub const RECO_DIMUONCONV_CONVERSION_IDX: &str = "Reco_DiMuonConv_Conversion_Idx";
/// Index of the dimuon used by each combination
pub const RECO_DIMUONCONV_DIMUON_IDX: &str = "Reco_DiMuonConv_DiMuon_Idx";
/// Constrained chi mass of each combination
pub const RECO_CHI_MASS: &str = "Reco_Chi_Mass";
/// Chi candidate type (1 = chi_c, 2 = chi_b)
pub const RECO_CHI_TYPE: &str = "Reco_Chi_Type";

/// Columns of the photon-conversion directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionColumn {
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
    /// Dimuon + conversion four-momenta
    RecoDiMuonConvMom,
    /// Conversion index per combination
    RecoDiMuonConvConversionIdx,
    /// Dimuon index per combination
    RecoDiMuonConvDiMuonIdx,
    /// Chi mass per combination
    RecoChiMass,
    /// Chi type per combination
    RecoChiType,
}

impl ColumnSet for ConversionColumn {
    const DIRECTORY: &'static str = DIRECTORY;

    const ALL: &'static [Self] = &[
        ConversionColumn::EventRun,
        ConversionColumn::EventLumi,
        ConversionColumn::EventBx,
        ConversionColumn::EventOrbit,
        ConversionColumn::EventNumber,
        ConversionColumn::EventNPv,
        ConversionColumn::EventPriVtxPos,
        ConversionColumn::EventPriVtxErr,
        ConversionColumn::RecoDiMuonConvMom,
        ConversionColumn::RecoDiMuonConvConversionIdx,
        ConversionColumn::RecoDiMuonConvDiMuonIdx,
        ConversionColumn::RecoChiMass,
        ConversionColumn::RecoChiType,
    ];

    fn def(self) -> ColumnDef {
        use ColumnKind::*;
        use RowGroupKind::*;
        match self {
            ConversionColumn::EventRun => ColumnDef::new(EVENT_RUN, Event, UInt32),
            ConversionColumn::EventLumi => ColumnDef::new(EVENT_LUMI, Event, UInt16),
            ConversionColumn::EventBx => ColumnDef::new(EVENT_BX, Event, UInt32),
            ConversionColumn::EventOrbit => ColumnDef::new(EVENT_ORBIT, Event, UInt64),
            ConversionColumn::EventNumber => ColumnDef::new(EVENT_NUMBER, Event, UInt64),
            ConversionColumn::EventNPv => ColumnDef::new(EVENT_NPV, Event, UInt8),
            ConversionColumn::EventPriVtxPos => ColumnDef::new(EVENT_PRIVTX_POS, Event, Vector3),
            ConversionColumn::EventPriVtxErr => ColumnDef::new(EVENT_PRIVTX_ERR, Event, Vector3),
            ConversionColumn::RecoDiMuonConvMom => {
                ColumnDef::new(RECO_DIMUONCONV_MOM, Reco, LorentzList)
            }
            ConversionColumn::RecoDiMuonConvConversionIdx => {
                ColumnDef::new(RECO_DIMUONCONV_CONVERSION_IDX, Reco, UInt16List)
            }
            ConversionColumn::RecoDiMuonConvDiMuonIdx => {
                ColumnDef::new(RECO_DIMUONCONV_DIMUON_IDX, Reco, UInt16List)
            }
            ConversionColumn::RecoChiMass => ColumnDef::new(RECO_CHI_MASS, Reco, Float32List),
            ConversionColumn::RecoChiType => ColumnDef::new(RECO_CHI_TYPE, Reco, UInt8List),
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

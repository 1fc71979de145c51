/// Run number
pub const EVENT_RUN: &str = "Event_Run";
/// Luminosity section
pub const EVENT_LUMI: &str = "Event_Lumi";
/// Bunch crossing
pub const EVENT_BX: &str = "Event_Bx";
/// LHC orbit number
pub const EVENT_ORBIT: &str = "Event_Orbit";
/// Event number within the run
pub const EVENT_NUMBER: &str = "Event_Number";
/// Number of reconstructed primary vertices
pub const EVENT_NPV: &str = "Event_nPV";
/// Primary vertex position
pub const EVENT_PRIVTX_POS: &str = "Event_PriVtx_Pos";
/// Primary vertex position error
pub const EVENT_PRIVTX_ERR: &str = "Event_PriVtx_Err";

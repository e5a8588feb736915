pub mod controller;
pub mod state;

pub use controller::{
    CycleReport, ExplorationController, ExplorationEvent, InsectView, SpotPresentation,
};
pub use state::{CollectOutcome, CycleOutcome, DexEntry, PresentOutcome, SessionState};

//! bugdex — the session core of a location-based insect exploration demo.
//!
//! A user moves a marker (map click or geolocation) toward one of five campus
//! spots; entering a spot's radius makes a randomly-assigned day/night insect
//! appear, which can be collected into a running dex. The rendering surface
//! and the map widget are the hosting application's concern: it feeds
//! coordinate updates and commands in, and renders the presentations and
//! events this crate exposes.

pub mod assets;
pub mod catalog;
pub mod daylight;
pub mod explore;
pub mod geo;
pub mod location;
pub mod spots;

pub use catalog::{InsectCard, InsectKind, APPEARANCE_CAP};
pub use daylight::{classify, TimeOfDay};
pub use explore::{
    CollectOutcome, CycleReport, DexEntry, ExplorationController, ExplorationEvent, SessionState,
    SpotPresentation,
};
pub use geo::{distance_meters, Coordinate};
pub use location::{LocationFix, LocationSource, LocationTracker, TrackingConfig};
pub use spots::{Spot, SpotRegistry};

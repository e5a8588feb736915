//! Optional location providers. Every provider degrades silently: a poll that
//! produces nothing (missing capability, denied permission, stale bridge) is
//! "no data this cycle", never an error.

pub mod tracker;

pub use tracker::{LocationTracker, TrackingConfig};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One geolocation reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub accuracy_m: Option<f64>,
}

impl LocationFix {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            coordinate: Coordinate::new(lat, lon),
            accuracy_m: None,
        }
    }
}

/// A polled geolocation provider. Providers are tried in priority order each
/// tracking cycle; the first fix wins.
pub trait LocationSource: Send {
    fn name(&self) -> &str;

    /// Latest fix, or `None` when this provider has nothing this cycle.
    fn poll(&mut self) -> Option<LocationFix>;
}

/// Bridge for host-pushed fixes (browser geolocation, JS-eval fallback). The
/// host pushes whenever its provider reports; polling returns the latest known
/// fix, like a browser's cached position.
#[derive(Clone)]
pub struct SharedFixSource {
    name: String,
    latest: Arc<Mutex<Option<LocationFix>>>,
}

impl SharedFixSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn push(&self, fix: LocationFix) {
        if let Ok(mut guard) = self.latest.lock() {
            *guard = Some(fix);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.latest.lock() {
            *guard = None;
        }
    }
}

impl LocationSource for SharedFixSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Option<LocationFix> {
        // A poisoned lock counts as a failed provider, not a fault.
        self.latest.lock().ok().and_then(|guard| *guard)
    }
}

/// Replays a fixed route one fix per poll; for demos and tests.
pub struct ScriptedSource {
    route: VecDeque<LocationFix>,
}

impl ScriptedSource {
    pub fn new(route: impl IntoIterator<Item = LocationFix>) -> Self {
        Self {
            route: route.into_iter().collect(),
        }
    }
}

impl LocationSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn poll(&mut self) -> Option<LocationFix> {
        self.route.pop_front()
    }
}

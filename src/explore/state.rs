use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assets::ImageAsset;
use crate::catalog::{self, APPEARANCE_CAP};
use crate::daylight::TimeOfDay;
use crate::geo::Coordinate;
use crate::spots::{Spot, SpotRegistry};

/// One collected insect-at-spot record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexEntry {
    pub id: String,
    pub insect_id: String,
    pub spot_name: String,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CollectOutcome {
    Recorded,
    DuplicateIgnored,
}

/// Result of presenting an occupied spot for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented(String),
    Exhausted,
}

/// What one locate/present pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The current coordinate is inside a spot's radius.
    Arrived {
        spot_key: String,
        outcome: PresentOutcome,
    },
    /// No spot is occupied, but a previously visited spot can still be shown.
    Fallback { spot_key: String },
    Idle,
}

/// A spot's lazily-created assignment slot. `insect: None` means the slot
/// needs (re)assignment: either never rolled, cleared after exhaustion, or
/// rolled when no candidate was eligible. Slot order is insertion order and
/// drives the sticky-last-spot fallback.
#[derive(Debug, Clone)]
struct AssignmentSlot {
    spot_key: String,
    insect: Option<String>,
}

/// Per-session mutable state for one user's exploration. Created empty at
/// session start, discarded at session end, never persisted.
pub struct SessionState {
    pub session_id: String,
    current: Option<Coordinate>,
    assignments: Vec<AssignmentSlot>,
    counts: HashMap<String, u32>,
    dex: Vec<DexEntry>,
    descriptions: HashMap<String, String>,
    images: HashMap<String, ImageAsset>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            current: None,
            assignments: Vec::new(),
            counts: zeroed_counts(),
            dex: Vec::new(),
            descriptions: HashMap::new(),
            images: HashMap::new(),
        }
    }

    pub fn current(&self) -> Option<Coordinate> {
        self.current
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.current = Some(coordinate);
    }

    /// First spot in registry order containing the current coordinate.
    /// First-match-wins by declaration order, not by nearness.
    pub fn locate<'a>(&self, registry: &'a SpotRegistry) -> Option<&'a Spot> {
        self.current.and_then(|c| registry.locate(c))
    }

    pub fn appearance_count(&self, insect_id: &str) -> u32 {
        self.counts.get(insect_id).copied().unwrap_or(0)
    }

    pub fn appearance_counts(&self) -> &HashMap<String, u32> {
        &self.counts
    }

    /// The insect currently assigned to a spot, if any.
    pub fn assigned_insect(&self, spot_key: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|slot| slot.spot_key == spot_key)
            .and_then(|slot| slot.insect.as_deref())
    }

    /// Whether a spot has ever been occupied this session (its slot exists),
    /// even if the slot currently holds no insect.
    pub fn has_assignment_slot(&self, spot_key: &str) -> bool {
        self.assignments.iter().any(|slot| slot.spot_key == spot_key)
    }

    /// Spot key of the most recently created assignment slot; used to keep
    /// showing the last visited spot when none is currently occupied.
    pub fn last_assigned_spot(&self) -> Option<&str> {
        self.assignments.last().map(|slot| slot.spot_key.as_str())
    }

    /// Sticky per-spot assignment: an existing assignment is returned
    /// unchanged; otherwise pick uniformly at random from the time-of-day pool
    /// restricted to insects still under the appearance cap. An empty
    /// candidate set records the needs-assignment sentinel and yields `None`.
    pub fn resolve_insect<R: Rng + ?Sized>(
        &mut self,
        spot_key: &str,
        time_of_day: TimeOfDay,
        rng: &mut R,
    ) -> Option<String> {
        if let Some(insect) = self.assigned_insect(spot_key) {
            return Some(insect.to_string());
        }

        let candidates: Vec<&str> = catalog::pool(time_of_day)
            .iter()
            .copied()
            .filter(|id| self.appearance_count(id) < APPEARANCE_CAP)
            .collect();

        let chosen = candidates.choose(rng).map(|id| id.to_string());
        self.upsert_slot(spot_key, chosen.clone());
        chosen
    }

    /// One presentation cycle for an occupied spot. Every presented cycle
    /// consumes appearance budget, not just the first assignment; an insect
    /// that meanwhile hit the cap reports exhausted and frees the slot so a
    /// later occupancy can roll a new insect.
    pub fn present<R: Rng + ?Sized>(
        &mut self,
        spot_key: &str,
        time_of_day: TimeOfDay,
        rng: &mut R,
    ) -> PresentOutcome {
        match self.resolve_insect(spot_key, time_of_day, rng) {
            Some(insect) if self.appearance_count(&insect) < APPEARANCE_CAP => {
                *self.counts.entry(insect.clone()).or_insert(0) += 1;
                PresentOutcome::Presented(insect)
            }
            Some(_) => {
                self.upsert_slot(spot_key, None);
                PresentOutcome::Exhausted
            }
            None => PresentOutcome::Exhausted,
        }
    }

    /// One full locate → present pass against the current coordinate.
    pub fn run_cycle<R: Rng + ?Sized>(
        &mut self,
        registry: &SpotRegistry,
        time_of_day: TimeOfDay,
        rng: &mut R,
    ) -> CycleOutcome {
        if let Some(spot) = self.locate(registry) {
            let spot_key = spot.key.clone();
            let outcome = self.present(&spot_key, time_of_day, rng);
            CycleOutcome::Arrived { spot_key, outcome }
        } else if let Some(spot_key) = self.last_assigned_spot() {
            CycleOutcome::Fallback {
                spot_key: spot_key.to_string(),
            }
        } else {
            CycleOutcome::Idle
        }
    }

    /// Append a dex entry unless the same (insect, spot name) pair was already
    /// collected. Timestamps are not part of the uniqueness key. Never fails.
    pub fn collect(
        &mut self,
        insect_id: &str,
        spot_name: &str,
        now: DateTime<Utc>,
    ) -> CollectOutcome {
        let duplicate = self
            .dex
            .iter()
            .any(|e| e.insect_id == insect_id && e.spot_name == spot_name);
        if duplicate {
            return CollectOutcome::DuplicateIgnored;
        }

        self.dex.push(DexEntry {
            id: Uuid::new_v4().to_string(),
            insect_id: insect_id.to_string(),
            spot_name: spot_name.to_string(),
            collected_at: now,
        });
        CollectOutcome::Recorded
    }

    pub fn dex(&self) -> &[DexEntry] {
        &self.dex
    }

    /// Clears appearance counters and all spot assignments; the dex stays.
    pub fn reset_counters(&mut self) {
        self.counts.clear();
        self.assignments.clear();
    }

    /// Clears the dex only.
    pub fn reset_dex(&mut self) {
        self.dex.clear();
    }

    /// Full session reset: coordinate, assignments, and dex cleared, counters
    /// re-zeroed for every catalog insect. Overrides stay, like the reference.
    pub fn reset_all(&mut self) {
        self.current = None;
        self.assignments.clear();
        self.dex.clear();
        self.counts = zeroed_counts();
    }

    pub fn set_description_override(&mut self, insect_id: &str, text: String) {
        self.descriptions.insert(insect_id.to_string(), text);
    }

    /// User-supplied description if present, otherwise the catalog blurb.
    pub fn description(&self, insect_id: &str) -> Option<&str> {
        self.descriptions
            .get(insect_id)
            .map(String::as_str)
            .or_else(|| catalog::find(insect_id).map(|k| k.blurb))
    }

    pub fn set_image(&mut self, insect_id: &str, asset: ImageAsset) {
        self.images.insert(insect_id.to_string(), asset);
    }

    /// Install a default image only where the user has not uploaded one.
    pub fn set_default_images(&mut self, defaults: HashMap<String, ImageAsset>) {
        for (id, asset) in defaults {
            self.images.entry(id).or_insert(asset);
        }
    }

    pub fn image(&self, insect_id: &str) -> Option<&ImageAsset> {
        self.images.get(insect_id)
    }

    fn upsert_slot(&mut self, spot_key: &str, insect: Option<String>) {
        match self
            .assignments
            .iter_mut()
            .find(|slot| slot.spot_key == spot_key)
        {
            Some(slot) => slot.insect = insect,
            None => self.assignments.push(AssignmentSlot {
                spot_key: spot_key.to_string(),
                insect,
            }),
        }
    }
}

fn zeroed_counts() -> HashMap<String, u32> {
    catalog::all()
        .iter()
        .map(|kind| (kind.id.to_string(), 0))
        .collect()
}

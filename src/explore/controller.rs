use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::assets::{load_default_images, ImageAsset};
use crate::catalog::{self, InsectCard};
use crate::daylight::{self, TimeOfDay};
use crate::geo::Coordinate;
use crate::spots::{Spot, SpotRegistry};

use super::state::{CollectOutcome, CycleOutcome, DexEntry, PresentOutcome, SessionState};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Facts the core pushes to whoever is rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ExplorationEvent {
    SpotReached {
        spot_key: String,
        spot_name: String,
    },
    InsectPresented {
        spot_key: String,
        insect_id: String,
        appearance_count: u32,
    },
    PoolExhausted {
        spot_key: String,
    },
    InsectCollected {
        entry: DexEntry,
    },
}

/// What the presentation layer renders for one insect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsectView {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub card: Option<InsectCard>,
    pub has_image: bool,
}

/// Render-ready view of a spot: the assigned insect (if any) and whether the
/// appearance pool ran dry at this spot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotPresentation {
    pub spot_key: String,
    pub spot_name: String,
    pub insect: Option<InsectView>,
    pub exhausted: bool,
}

/// Result of one locate → present pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// Key of the spot whose radius contains the current coordinate, if any.
    pub occupied_spot: Option<String>,
    /// What to render: the occupied spot, or the sticky last-visited spot
    /// when nothing is currently occupied.
    pub presentation: Option<SpotPresentation>,
}

/// Session-scoped command/query surface over [`SessionState`]. Each user
/// interaction runs one bounded synchronous pass while holding the state lock;
/// the lock only exists so a tracking task and host commands can share the
/// handle.
#[derive(Clone)]
pub struct ExplorationController {
    state: Arc<Mutex<SessionState>>,
    registry: Arc<SpotRegistry>,
    rng: Arc<Mutex<StdRng>>,
    events: broadcast::Sender<ExplorationEvent>,
    fixed_time_of_day: Option<TimeOfDay>,
}

impl ExplorationController {
    pub fn new(registry: SpotRegistry) -> Self {
        Self::with_rng(registry, StdRng::from_entropy())
    }

    /// Deterministic controller for tests and scripted demos.
    pub fn with_seed(registry: SpotRegistry, seed: u64) -> Self {
        Self::with_rng(registry, StdRng::seed_from_u64(seed))
    }

    fn with_rng(registry: SpotRegistry, rng: StdRng) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            registry: Arc::new(registry),
            rng: Arc::new(Mutex::new(rng)),
            events,
            fixed_time_of_day: None,
        }
    }

    /// Pin the day/night classification instead of reading the local clock.
    pub fn with_fixed_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.fixed_time_of_day = Some(time_of_day);
        self
    }

    pub fn registry(&self) -> &SpotRegistry {
        &self.registry
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExplorationEvent> {
        self.events.subscribe()
    }

    /// Unconditionally overwrite the current coordinate (map click or a
    /// geolocation fix), then run one full pass.
    pub async fn update_coordinate(&self, lat: f64, lon: f64) -> CycleReport {
        let mut state = self.state.lock().await;
        state.set_coordinate(Coordinate::new(lat, lon));
        debug!("coordinate updated to ({lat:.6}, {lon:.6})");
        self.run_pass(&mut state).await
    }

    /// Run one pass against the existing coordinate. An auto-refresh tick with
    /// no new fix still re-presents the occupied spot (and spends budget).
    pub async fn tick(&self) -> CycleReport {
        let mut state = self.state.lock().await;
        self.run_pass(&mut state).await
    }

    /// Tracker entry point: apply an optional fix, then run the pass.
    pub async fn poll_cycle(&self, fix: Option<Coordinate>) -> CycleReport {
        let mut state = self.state.lock().await;
        if let Some(coordinate) = fix {
            state.set_coordinate(coordinate);
        }
        self.run_pass(&mut state).await
    }

    async fn run_pass(&self, state: &mut SessionState) -> CycleReport {
        let time_of_day = self.time_of_day();
        let outcome = {
            let mut rng = self.rng.lock().await;
            state.run_cycle(&self.registry, time_of_day, &mut *rng)
        };

        match outcome {
            CycleOutcome::Arrived { spot_key, outcome } => {
                let spot_name = self
                    .registry
                    .get(&spot_key)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                self.emit(ExplorationEvent::SpotReached {
                    spot_key: spot_key.clone(),
                    spot_name,
                });

                match outcome {
                    PresentOutcome::Presented(insect_id) => {
                        let appearance_count = state.appearance_count(&insect_id);
                        self.emit(ExplorationEvent::InsectPresented {
                            spot_key: spot_key.clone(),
                            insect_id,
                            appearance_count,
                        });
                    }
                    PresentOutcome::Exhausted => {
                        info!("appearance pool exhausted at spot {spot_key}");
                        self.emit(ExplorationEvent::PoolExhausted {
                            spot_key: spot_key.clone(),
                        });
                    }
                }

                CycleReport {
                    occupied_spot: Some(spot_key.clone()),
                    presentation: self.build_presentation(state, &spot_key),
                }
            }
            CycleOutcome::Fallback { spot_key } => CycleReport {
                occupied_spot: None,
                presentation: self.build_presentation(state, &spot_key),
            },
            CycleOutcome::Idle => CycleReport {
                occupied_spot: None,
                presentation: None,
            },
        }
    }

    /// The spot whose radius contains the current coordinate, if any.
    pub async fn current_occupied_spot(&self) -> Option<Spot> {
        let state = self.state.lock().await;
        state.locate(&self.registry).cloned()
    }

    /// Render-ready view for one spot; `None` for unknown keys. Pure query:
    /// never rolls an assignment or spends appearance budget.
    pub async fn presentation_for_spot(&self, spot_key: &str) -> Option<SpotPresentation> {
        let state = self.state.lock().await;
        self.build_presentation(&state, spot_key)
    }

    /// What to render right now: the occupied spot if any, otherwise the
    /// sticky last-visited spot, otherwise nothing.
    pub async fn current_presentation(&self) -> Option<SpotPresentation> {
        let state = self.state.lock().await;
        if let Some(spot) = state.locate(&self.registry) {
            let key = spot.key.clone();
            return self.build_presentation(&state, &key);
        }
        let spot_key = state.last_assigned_spot()?.to_string();
        self.build_presentation(&state, &spot_key)
    }

    /// Record a collection. Duplicate (insect, spot) pairs are silently
    /// ignored; only an unknown spot or insect id is an error.
    pub async fn collect(&self, spot_key: &str, insect_id: &str) -> Result<CollectOutcome> {
        let Some(spot) = self.registry.get(spot_key) else {
            bail!("unknown spot key {spot_key}");
        };
        if catalog::find(insect_id).is_none() {
            bail!("unknown insect id {insect_id}");
        }

        let mut state = self.state.lock().await;
        let outcome = state.collect(insect_id, &spot.name, Utc::now());
        if outcome == CollectOutcome::Recorded {
            if let Some(entry) = state.dex().last().cloned() {
                info!("collected {insect_id} at {}", spot.name);
                self.emit(ExplorationEvent::InsectCollected { entry });
            }
        }
        Ok(outcome)
    }

    pub async fn dex_entries(&self) -> Vec<DexEntry> {
        self.state.lock().await.dex().to_vec()
    }

    /// Diagnostic view of how much appearance budget each insect has spent.
    pub async fn appearance_counts(&self) -> HashMap<String, u32> {
        self.state.lock().await.appearance_counts().clone()
    }

    pub async fn reset_counters(&self) {
        let mut state = self.state.lock().await;
        state.reset_counters();
        info!("appearance counters and spot assignments reset");
    }

    pub async fn reset_dex(&self) {
        let mut state = self.state.lock().await;
        state.reset_dex();
        info!("dex cleared");
    }

    pub async fn reset_all(&self) {
        let mut state = self.state.lock().await;
        state.reset_all();
        info!("session fully reset");
    }

    /// Cosmetic override: replaces the catalog blurb for one insect.
    pub async fn set_description_override(&self, insect_id: &str, text: String) -> Result<()> {
        if catalog::find(insect_id).is_none() {
            bail!("unknown insect id {insect_id}");
        }
        self.state
            .lock()
            .await
            .set_description_override(insect_id, text);
        Ok(())
    }

    /// Cosmetic override: user-uploaded image bytes for one insect. Invalid
    /// image data is reported to the caller, not stored.
    pub async fn set_image_override(&self, insect_id: &str, bytes: &[u8]) -> Result<()> {
        if catalog::find(insect_id).is_none() {
            bail!("unknown insect id {insect_id}");
        }
        let asset = ImageAsset::from_bytes(bytes)?;
        self.state.lock().await.set_image(insect_id, asset);
        Ok(())
    }

    /// Fill in default images from an asset directory without clobbering any
    /// user uploads.
    pub async fn install_default_images(&self, asset_dir: &Path) {
        let defaults = load_default_images(asset_dir);
        if defaults.is_empty() {
            return;
        }
        info!("installing {} default insect images", defaults.len());
        self.state.lock().await.set_default_images(defaults);
    }

    fn time_of_day(&self) -> TimeOfDay {
        self.fixed_time_of_day
            .unwrap_or_else(daylight::classify_now)
    }

    fn build_presentation(&self, state: &SessionState, spot_key: &str) -> Option<SpotPresentation> {
        let spot = self.registry.get(spot_key)?;
        let insect = state.assigned_insect(spot_key).and_then(|insect_id| {
            let kind = catalog::find(insect_id)?;
            Some(InsectView {
                id: kind.id.to_string(),
                name: kind.name.to_string(),
                emoji: kind.emoji.to_string(),
                description: state.description(insect_id).unwrap_or_default().to_string(),
                card: catalog::card(insect_id).cloned(),
                has_image: state.image(insect_id).is_some(),
            })
        });
        let exhausted = insect.is_none() && state.has_assignment_slot(spot_key);

        Some(SpotPresentation {
            spot_key: spot.key.clone(),
            spot_name: spot.name.clone(),
            insect,
            exhausted,
        })
    }

    fn emit(&self, event: ExplorationEvent) {
        // Nobody listening is fine; the demo core renders via queries too.
        let _ = self.events.send(event);
    }
}

use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::explore::ExplorationController;

use super::{LocationFix, LocationSource};

const MIN_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 10;
const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Auto-refresh settings. The interval mirrors the UI slider: 1–10 s,
/// default 3 s; anything outside is clamped.
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub interval_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl TrackingConfig {
    fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS))
    }
}

/// Owns the background polling task that re-runs the exploration pass on a
/// fixed cadence, feeding it fixes from the configured providers.
pub struct LocationTracker {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTracker {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_tracking(
        &mut self,
        controller: ExplorationController,
        sources: Vec<Box<dyn LocationSource>>,
        config: TrackingConfig,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("tracking already active");
        }

        let interval = config.interval();
        info!(
            "starting location tracking: {} source(s), every {:?}",
            sources.len(),
            interval
        );

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let handle = tokio::spawn(tracking_loop(controller, sources, interval, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop_tracking(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("tracking loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

async fn tracking_loop(
    controller: ExplorationController,
    mut sources: Vec<Box<dyn LocationSource>>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fix = poll_sources(&mut sources);
                if fix.is_none() {
                    debug!("no location fix this cycle");
                }
                // A fix-less tick still runs the pass: the occupied spot keeps
                // presenting against the existing coordinate.
                let report = controller.poll_cycle(fix.map(|f| f.coordinate)).await;
                if let Some(spot_key) = report.occupied_spot {
                    debug!("tracking cycle: occupying {spot_key}");
                }
            }
            _ = cancel_token.cancelled() => {
                info!("tracking loop shutting down");
                break;
            }
        }
    }
}

/// First provider with a fix wins; the rest are not consulted this cycle.
fn poll_sources(sources: &mut [Box<dyn LocationSource>]) -> Option<LocationFix> {
    for source in sources.iter_mut() {
        if let Some(fix) = source.poll() {
            debug!(
                "fix from {}: ({:.6}, {:.6})",
                source.name(),
                fix.coordinate.lat,
                fix.coordinate.lon
            );
            return Some(fix);
        }
    }
    None
}

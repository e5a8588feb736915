use std::time::Duration;

use anyhow::Result;
use log::info;

use bugdex::explore::{ExplorationController, ExplorationEvent};
use bugdex::location::{LocationFix, LocationTracker, ScriptedSource, TrackingConfig};
use bugdex::spots::SpotRegistry;

/// Scripted walk past the campus spots: linger at the main gate, move to the
/// library, then wander off campus so the sticky fallback kicks in.
fn demo_route() -> Vec<LocationFix> {
    vec![
        LocationFix::new(36.632275, 127.453036),
        LocationFix::new(36.632280, 127.453040),
        LocationFix::new(36.628345, 127.457695),
        LocationFix::new(36.628350, 127.457700),
        LocationFix::new(36.600000, 127.400000),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    // Reads RUST_LOG from the environment.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("bugdex demo starting up...");

    let controller = ExplorationController::new(SpotRegistry::default());

    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExplorationEvent::SpotReached {
                    spot_name, ..
                } => println!("arrived at {spot_name}"),
                ExplorationEvent::InsectPresented {
                    insect_id,
                    appearance_count,
                    ..
                } => println!("  {insect_id} appeared (appearance #{appearance_count})"),
                ExplorationEvent::PoolExhausted { spot_key } => {
                    println!("  nothing left to find at {spot_key} right now")
                }
                ExplorationEvent::InsectCollected { entry } => {
                    println!("  collected {} at {}", entry.insect_id, entry.spot_name)
                }
            }
        }
    });

    let mut tracker = LocationTracker::new();
    tracker.start_tracking(
        controller.clone(),
        vec![Box::new(ScriptedSource::new(demo_route()))],
        TrackingConfig { interval_secs: 1 },
    )?;

    tokio::time::sleep(Duration::from_secs(6)).await;
    tracker.stop_tracking().await?;

    // Collect whatever is on screen at the end of the walk.
    if let Some(presentation) = controller.current_presentation().await {
        if let Some(insect) = &presentation.insect {
            controller.collect(&presentation.spot_key, &insect.id).await?;
        }
    }

    println!(
        "dex: {}",
        serde_json::to_string_pretty(&controller.dex_entries().await)?
    );
    println!("appearance counts: {:?}", controller.appearance_counts().await);

    printer.abort();
    Ok(())
}

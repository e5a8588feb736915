// tests/tracking_test.rs — Integration test: tracker loop + provider priority

use std::time::Duration;

use bugdex::explore::ExplorationController;
use bugdex::location::{
    LocationFix, LocationTracker, ScriptedSource, SharedFixSource, TrackingConfig,
};
use bugdex::spots::SpotRegistry;
use bugdex::TimeOfDay;

const GATE: (f64, f64) = (36.632275, 127.453036);
const LIB: (f64, f64) = (36.628345, 127.457695);

fn controller(seed: u64) -> ExplorationController {
    ExplorationController::with_seed(SpotRegistry::default(), seed)
        .with_fixed_time_of_day(TimeOfDay::Day)
}

#[tokio::test(start_paused = true)]
async fn tracker_feeds_fixes_and_keeps_presenting_without_new_ones() {
    let controller = controller(21);
    let mut tracker = LocationTracker::new();

    // One fix, then the provider goes quiet; later ticks re-run the pass
    // against the stale coordinate.
    let source = ScriptedSource::new([LocationFix::new(GATE.0, GATE.1)]);
    tracker
        .start_tracking(
            controller.clone(),
            vec![Box::new(source)],
            TrackingConfig { interval_secs: 1 },
        )
        .unwrap();
    assert!(tracker.is_tracking());

    tokio::time::sleep(Duration::from_secs(5)).await;
    tracker.stop_tracking().await.unwrap();
    assert!(!tracker.is_tracking());

    let occupied = controller.current_occupied_spot().await.unwrap();
    assert_eq!(occupied.key, "gate");

    // Sustained occupancy spent budget on more than the first cycle.
    let counts = controller.appearance_counts().await;
    let spent: u32 = counts.values().sum();
    assert!(spent >= 2, "expected repeated presentations, got {spent}");
    assert!(controller.dex_entries().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn first_source_with_a_fix_wins() {
    let controller = controller(22);
    let mut tracker = LocationTracker::new();

    let browser = SharedFixSource::new("browser");
    // The lower-priority provider keeps insisting on the gate.
    let scripted = ScriptedSource::new(
        std::iter::repeat(LocationFix::new(GATE.0, GATE.1)).take(30),
    );

    tracker
        .start_tracking(
            controller.clone(),
            vec![Box::new(browser.clone()), Box::new(scripted)],
            TrackingConfig { interval_secs: 1 },
        )
        .unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(
        controller.current_occupied_spot().await.unwrap().key,
        "gate"
    );

    // Once the browser has a fix it outranks the scripted provider.
    browser.push(LocationFix::new(LIB.0, LIB.1));
    tokio::time::sleep(Duration::from_secs(3)).await;
    tracker.stop_tracking().await.unwrap();

    assert_eq!(controller.current_occupied_spot().await.unwrap().key, "lib");
}

#[tokio::test(start_paused = true)]
async fn starting_twice_is_an_error() {
    let controller = controller(23);
    let mut tracker = LocationTracker::new();

    tracker
        .start_tracking(
            controller.clone(),
            vec![Box::new(ScriptedSource::new(std::iter::empty::<LocationFix>()))],
            TrackingConfig::default(),
        )
        .unwrap();
    assert!(tracker
        .start_tracking(
            controller.clone(),
            vec![Box::new(ScriptedSource::new(std::iter::empty::<LocationFix>()))],
            TrackingConfig::default(),
        )
        .is_err());

    tracker.stop_tracking().await.unwrap();
    // Stopping an already-stopped tracker is a no-op.
    tracker.stop_tracking().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn interval_is_clamped_to_the_supported_range() {
    let controller = controller(24);
    let mut tracker = LocationTracker::new();

    // 0 would spin; it must clamp up to 1s and still deliver fixes.
    tracker
        .start_tracking(
            controller.clone(),
            vec![Box::new(ScriptedSource::new([LocationFix::new(
                GATE.0, GATE.1,
            )]))],
            TrackingConfig { interval_secs: 0 },
        )
        .unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    tracker.stop_tracking().await.unwrap();

    assert_eq!(
        controller.current_occupied_spot().await.unwrap().key,
        "gate"
    );
}

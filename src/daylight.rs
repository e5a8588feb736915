use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Which insect pool is active: day runs 06:00:00 through 17:59:59 local time,
/// everything else is night.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    Day,
    Night,
}

/// Classify a local instant into day or night.
pub fn classify<T: Timelike>(instant: &T) -> TimeOfDay {
    if (6..18).contains(&instant.hour()) {
        TimeOfDay::Day
    } else {
        TimeOfDay::Night
    }
}

/// Classification for the current local time.
pub fn classify_now() -> TimeOfDay {
    classify(&chrono::Local::now())
}

//! Schedule evaluation
//!
//! Pure time-window math. Both window endpoints are inclusive, and a
//! window whose start is later than its end crosses midnight.

use chrono::{DateTime, Local};
use warden_store::Target;
use warden_util::WallClock;

/// Whether `target`'s schedule calls for blocking at `now`.
///
/// Disabled targets are never blocked. An active pause is the caller's
/// concern; it overrides this result entirely.
pub fn should_block(target: &Target, now: DateTime<Local>) -> bool {
    if !target.enabled {
        return false;
    }

    let cur = WallClock::from_datetime(&now).minutes_from_midnight();
    let start = target.start_time.minutes_from_midnight();
    let end = target.end_time.minutes_from_midnight();

    if start <= end {
        start <= cur && cur <= end
    } else {
        // Window crosses midnight (e.g. 22:00 - 06:00)
        cur >= start || cur <= end
    }
}

//! Pause quota tracking
//!
//! Each target gets a bounded daily override budget: at most
//! [`MAX_DAILY_PAUSES`] pauses and [`MAX_DAILY_PAUSE_MINUTES`] total
//! minutes per local calendar day. The count check is against the state
//! before granting; the minutes check includes the requested duration,
//! so the day's total can never exceed the cap. The budget is keyed by
//! date, so crossing midnight starts a fresh zeroed day without any
//! reset logic.

use chrono::{DateTime, Local};
use warden_store::PauseRecord;

use crate::{MAX_DAILY_PAUSES, MAX_DAILY_PAUSE_MINUTES};

/// Result of a granted pause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseGrant {
    pub pause_until: DateTime<Local>,
    pub remaining_pauses: u32,
    pub remaining_minutes: u32,
}

/// Whether `record` has budget for a pause of `minutes` on `now`'s date.
///
/// Granting must keep the day's total at or below the minutes cap, so
/// the requested duration counts against what is already consumed.
pub fn can_pause(record: &PauseRecord, minutes: u32, now: DateTime<Local>) -> bool {
    let today = now.date_naive();
    record.count_on(today) < MAX_DAILY_PAUSES
        && record.minutes_on(today) + minutes <= MAX_DAILY_PAUSE_MINUTES
}

/// Remaining (pauses, minutes) for `now`'s date.
pub fn remaining_budget(record: &PauseRecord, now: DateTime<Local>) -> (u32, u32) {
    let today = now.date_naive();
    (
        MAX_DAILY_PAUSES.saturating_sub(record.count_on(today)),
        MAX_DAILY_PAUSE_MINUTES.saturating_sub(record.minutes_on(today)),
    )
}

/// Register a pause of `minutes` starting at `now`.
///
/// Callers must hold the registry lock across the preceding
/// [`can_pause`] check and this call; the pair is one atomic
/// check-and-increment.
pub fn register_pause(
    record: &mut PauseRecord,
    minutes: u32,
    now: DateTime<Local>,
) -> PauseGrant {
    let today = now.date_naive();
    let pause_until = now + chrono::Duration::minutes(minutes as i64);

    record.pause_until = Some(pause_until);
    *record.daily_count.entry(today).or_insert(0) += 1;
    *record.daily_minutes.entry(today).or_insert(0) += minutes;

    let (remaining_pauses, remaining_minutes) = remaining_budget(record, now);

    PauseGrant {
        pause_until,
        remaining_pauses,
        remaining_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn fresh_record_has_full_budget() {
        let record = PauseRecord::default();
        let now = at(2, 10, 0);

        assert!(can_pause(&record, 5, now));
        assert!(can_pause(&record, 15, now));
        assert_eq!(remaining_budget(&record, now), (2, 15));
    }

    #[test]
    fn single_request_cannot_exceed_minutes_cap() {
        let record = PauseRecord::default();
        let now = at(2, 10, 0);

        // Even a fresh day never covers a request past the cap
        assert!(!can_pause(&record, 16, now));
        assert!(!can_pause(&record, 1000, now));
    }

    #[test]
    fn grant_updates_budget_and_pause_until() {
        let mut record = PauseRecord::default();
        let now = at(2, 10, 0);

        let grant = register_pause(&mut record, 5, now);
        assert_eq!(grant.pause_until, at(2, 10, 5));
        assert_eq!(grant.remaining_pauses, 1);
        assert_eq!(grant.remaining_minutes, 10);
        assert!(record.is_active(now));
    }

    #[test]
    fn count_cap_exhausts_budget() {
        let mut record = PauseRecord::default();
        let now = at(2, 10, 0);

        register_pause(&mut record, 3, now);
        assert!(can_pause(&record, 3, now));
        register_pause(&mut record, 3, now);

        // Two pauses granted; the count cap is reached
        assert!(!can_pause(&record, 1, now));
    }

    #[test]
    fn minutes_cap_exhausts_budget() {
        let mut record = PauseRecord::default();
        let now = at(2, 10, 0);

        let grant = register_pause(&mut record, 15, now);
        assert_eq!(grant.remaining_minutes, 0);
        assert!(!can_pause(&record, 1, now));
    }

    #[test]
    fn request_past_remaining_minutes_denied() {
        let mut record = PauseRecord::default();
        let now = at(2, 10, 0);

        register_pause(&mut record, 10, now);

        // 5 minutes left; 6 would push the day past the cap
        assert!(!can_pause(&record, 6, now));
        assert!(can_pause(&record, 5, now));
    }

    #[test]
    fn budget_resets_on_date_rollover() {
        let mut record = PauseRecord::default();
        let today = at(2, 23, 50);

        register_pause(&mut record, 10, today);
        register_pause(&mut record, 5, today);
        assert!(!can_pause(&record, 1, today));

        // Next local day starts with a fresh zeroed budget
        let tomorrow = at(3, 0, 5);
        assert!(can_pause(&record, 15, tomorrow));
        assert_eq!(remaining_budget(&record, tomorrow), (2, 15));

        // Yesterday's history is retained, not reset
        assert_eq!(record.count_on(today.date_naive()), 2);
        assert_eq!(record.minutes_on(today.date_naive()), 15);
    }

    #[test]
    fn budgets_are_per_target_state() {
        // Quota lives in the record itself; separate records are
        // independent by construction.
        let mut a = PauseRecord::default();
        let b = PauseRecord::default();
        let now = at(2, 10, 0);

        register_pause(&mut a, 15, now);
        assert!(!can_pause(&a, 1, now));
        assert!(can_pause(&b, 1, now));
    }
}

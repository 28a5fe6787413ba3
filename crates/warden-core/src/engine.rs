//! Blocking engine
//!
//! Owns the in-memory registry and its store. Every mutation is a full
//! read-modify-write: validate, mutate, persist, and only then report
//! success. Callers serialize access with a single lock around the
//! engine, which also makes the can-pause/register-pause pair atomic.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use warden_store::{JsonStore, Registry, Target};
use warden_util::{WallClock, WardenError, Result};

use crate::{can_pause, register_pause, remaining_budget, should_block, PauseGrant};

/// Pause decision from the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseDecision {
    Granted(PauseGrant),
    /// Daily budget exhausted. Not an error; reported with what is left.
    Denied {
        remaining_pauses: u32,
        remaining_minutes: u32,
    },
}

/// Snapshot of one target with its current blocking state
#[derive(Debug, Clone)]
pub struct TargetStatus {
    pub target: Target,
    pub blocked_now: bool,
    pub paused_until: Option<DateTime<Local>>,
}

/// The blocking engine
pub struct BlockerEngine {
    store: JsonStore,
    registry: Registry,
}

impl BlockerEngine {
    /// Create an engine backed by `store`, loading any existing registry.
    pub fn new(store: JsonStore) -> Self {
        let registry = store.load();

        info!(
            target_count = registry.targets.len(),
            "Blocking engine initialized"
        );

        Self { store, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Re-read the registry from durable storage (timer path).
    pub fn reload(&mut self) {
        self.registry = self.store.load();
        debug!(
            target_count = self.registry.targets.len(),
            "Registry reloaded"
        );
    }

    /// List all targets with their current blocking state.
    pub fn list_targets(&self, now: DateTime<Local>) -> Vec<TargetStatus> {
        self.registry
            .targets
            .iter()
            .map(|t| TargetStatus {
                blocked_now: self.is_blocked(t, now),
                paused_until: self
                    .registry
                    .pause_record(&t.url)
                    .and_then(|r| r.pause_until.filter(|until| now < *until)),
                target: t.clone(),
            })
            .collect()
    }

    /// Add a target. Rejects empty or duplicate urls and malformed times
    /// before touching persisted state.
    pub fn add_target(
        &mut self,
        url: &str,
        enabled: bool,
        start_time: &str,
        end_time: &str,
    ) -> Result<Target> {
        let url = url.trim();
        if url.is_empty() {
            return Err(WardenError::validation("url cannot be empty"));
        }
        if url.contains(char::is_whitespace) {
            return Err(WardenError::validation("url cannot contain whitespace"));
        }
        if self.registry.contains_target(url) {
            return Err(WardenError::DuplicateTarget(url.to_string()));
        }

        let start_time: WallClock = start_time
            .parse()
            .map_err(|e| WardenError::validation(format!("bad startTime: {e}")))?;
        let end_time: WallClock = end_time
            .parse()
            .map_err(|e| WardenError::validation(format!("bad endTime: {e}")))?;

        let target = Target {
            url: url.to_string(),
            enabled,
            start_time,
            end_time,
        };

        self.registry.targets.push(target.clone());
        self.persist()?;

        info!(url = %target.url, start = %target.start_time, end = %target.end_time, "Target added");

        Ok(target)
    }

    /// Remove a target by url.
    pub fn remove_target(&mut self, url: &str) -> Result<()> {
        if !self.registry.remove_target(url) {
            return Err(WardenError::TargetNotFound(url.to_string()));
        }
        self.persist()?;

        info!(url = %url, "Target removed");

        Ok(())
    }

    /// Request a pause for a target.
    ///
    /// A non-positive duration and an unknown url are validation errors;
    /// an exhausted daily budget, or a duration the remaining budget
    /// does not cover, is an ordinary denied decision.
    pub fn request_pause(
        &mut self,
        url: &str,
        minutes: u32,
        now: DateTime<Local>,
    ) -> Result<PauseDecision> {
        if minutes == 0 {
            return Err(WardenError::validation(
                "pause duration must be a positive number of minutes",
            ));
        }
        if !self.registry.contains_target(url) {
            return Err(WardenError::TargetNotFound(url.to_string()));
        }

        let record = self.registry.pause_entry(url);
        if !can_pause(record, minutes, now) {
            let (remaining_pauses, remaining_minutes) = remaining_budget(record, now);
            info!(url = %url, "Pause denied, daily budget exhausted");
            return Ok(PauseDecision::Denied {
                remaining_pauses,
                remaining_minutes,
            });
        }

        let grant = register_pause(record, minutes, now);
        self.persist()?;

        info!(
            url = %url,
            minutes,
            pause_until = %grant.pause_until,
            remaining_pauses = grant.remaining_pauses,
            remaining_minutes = grant.remaining_minutes,
            "Pause granted"
        );

        Ok(PauseDecision::Granted(grant))
    }

    /// The complete desired block set at `now`, sorted by url.
    pub fn blocked_domains(&self, now: DateTime<Local>) -> Vec<String> {
        let mut blocked: Vec<String> = self
            .registry
            .targets
            .iter()
            .filter(|t| self.is_blocked(t, now))
            .map(|t| t.url.clone())
            .collect();
        blocked.sort();
        blocked
    }

    /// Combined decision for one target: an active pause force-allows it
    /// regardless of schedule.
    fn is_blocked(&self, target: &Target, now: DateTime<Local>) -> bool {
        if let Some(record) = self.registry.pause_record(&target.url)
            && record.is_active(now)
        {
            return false;
        }
        should_block(target, now)
    }

    fn persist(&mut self) -> Result<()> {
        if let Err(e) = self.store.save(&self.registry) {
            // Roll the in-memory registry back to what is actually on
            // disk so memory and storage never diverge.
            warn!(error = %e, "Failed to persist registry, reloading from disk");
            self.registry = self.store.load();
            return Err(WardenError::store(e.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
    }

    fn engine(dir: &tempfile::TempDir) -> BlockerEngine {
        BlockerEngine::new(JsonStore::new(dir.path().join("registry.json")))
    }

    #[test]
    fn add_validates_before_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);

        assert!(matches!(
            eng.add_target("", true, "09:00", "17:00"),
            Err(WardenError::ValidationError(_))
        ));
        assert!(matches!(
            eng.add_target("example.com", true, "9am", "17:00"),
            Err(WardenError::ValidationError(_))
        ));

        eng.add_target("example.com", true, "09:00", "17:00").unwrap();
        assert!(matches!(
            eng.add_target("example.com", true, "10:00", "11:00"),
            Err(WardenError::DuplicateTarget(_))
        ));

        // Only the one valid target made it to disk
        let reloaded = engine(&dir);
        assert_eq!(reloaded.registry().targets.len(), 1);
    }

    #[test]
    fn remove_unknown_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);

        assert!(matches!(
            eng.remove_target("example.com"),
            Err(WardenError::TargetNotFound(_))
        ));

        eng.add_target("example.com", true, "09:00", "17:00").unwrap();
        eng.remove_target("example.com").unwrap();
        assert!(eng.registry().targets.is_empty());
    }

    #[test]
    fn blocked_domains_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);

        eng.add_target("b.com", true, "09:00", "17:00").unwrap();
        eng.add_target("a.com", true, "09:00", "17:00").unwrap();
        eng.add_target("off.com", false, "09:00", "17:00").unwrap();
        eng.add_target("night.com", true, "22:00", "06:00").unwrap();

        let blocked = eng.blocked_domains(at(10, 0));
        assert_eq!(blocked, vec!["a.com".to_string(), "b.com".to_string()]);

        let blocked = eng.blocked_domains(at(23, 0));
        assert_eq!(blocked, vec!["night.com".to_string()]);
    }

    #[test]
    fn pause_overrides_schedule_until_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.add_target("example.com", true, "09:00", "17:00").unwrap();

        let now = at(10, 1);
        let decision = eng.request_pause("example.com", 5, now).unwrap();
        let grant = match decision {
            PauseDecision::Granted(g) => g,
            other => panic!("expected grant, got {other:?}"),
        };
        assert_eq!(grant.pause_until, at(10, 6));

        // Inside the window but paused
        assert!(eng.blocked_domains(at(10, 2)).is_empty());

        // Pause elapsed; blocking resumes with no further action
        assert_eq!(eng.blocked_domains(at(10, 7)), vec!["example.com".to_string()]);
    }

    #[test]
    fn pause_quota_is_per_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.add_target("a.com", true, "00:00", "23:59").unwrap();
        eng.add_target("b.com", true, "00:00", "23:59").unwrap();

        let now = at(10, 0);
        eng.request_pause("a.com", 10, now).unwrap();
        eng.request_pause("a.com", 5, now).unwrap();

        // a.com exhausted both caps
        assert!(matches!(
            eng.request_pause("a.com", 1, now).unwrap(),
            PauseDecision::Denied {
                remaining_pauses: 0,
                remaining_minutes: 0
            }
        ));

        // b.com untouched
        assert!(matches!(
            eng.request_pause("b.com", 5, now).unwrap(),
            PauseDecision::Granted(_)
        ));
    }

    #[test]
    fn oversized_pause_request_denied_with_budget_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.add_target("example.com", true, "00:00", "23:59").unwrap();

        // A single request past the daily minutes cap is denied outright
        assert!(matches!(
            eng.request_pause("example.com", 1000, at(10, 0)).unwrap(),
            PauseDecision::Denied {
                remaining_pauses: 2,
                remaining_minutes: 15
            }
        ));

        // Nothing was consumed; the target stays blocked and a covered
        // request still succeeds
        assert_eq!(
            eng.blocked_domains(at(10, 1)),
            vec!["example.com".to_string()]
        );
        assert!(matches!(
            eng.request_pause("example.com", 15, at(10, 1)).unwrap(),
            PauseDecision::Granted(_)
        ));
    }

    #[test]
    fn pause_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.add_target("example.com", true, "09:00", "17:00").unwrap();

        assert!(matches!(
            eng.request_pause("example.com", 0, at(10, 0)),
            Err(WardenError::ValidationError(_))
        ));
        assert!(matches!(
            eng.request_pause("unknown.com", 5, at(10, 0)),
            Err(WardenError::TargetNotFound(_))
        ));
    }

    #[test]
    fn pause_state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let now = at(10, 0);

        {
            let mut eng = engine(&dir);
            eng.add_target("example.com", true, "09:00", "17:00").unwrap();
            eng.request_pause("example.com", 5, now).unwrap();
        }

        let eng = engine(&dir);
        assert!(eng.blocked_domains(at(10, 2)).is_empty());
        assert_eq!(
            eng.blocked_domains(at(10, 6)),
            vec!["example.com".to_string()]
        );
    }

    #[test]
    fn list_targets_reports_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut eng = engine(&dir);
        eng.add_target("example.com", true, "09:00", "17:00").unwrap();

        let now = at(10, 0);
        let list = eng.list_targets(now);
        assert_eq!(list.len(), 1);
        assert!(list[0].blocked_now);
        assert!(list[0].paused_until.is_none());

        eng.request_pause("example.com", 5, now).unwrap();
        let list = eng.list_targets(now);
        assert!(!list[0].blocked_now);
        assert_eq!(list[0].paused_until, Some(at(10, 5)));
    }
}

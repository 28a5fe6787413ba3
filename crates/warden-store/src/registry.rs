//! Registry data model
//!
//! Field names follow the persisted JSON layout: targets keep their
//! window as `"HH:MM"` strings, pause records key their daily budget
//! maps by local calendar date. Date-keyed maps are never pruned; a new
//! date simply starts at zero, which is what resets the budget at
//! midnight.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use warden_util::WallClock;

/// A domain tracked for scheduled blocking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Bare domain, unique within the registry
    pub url: String,

    /// When false the target is never blocked, schedule or not
    pub enabled: bool,

    /// Start of the blocking window (inclusive)
    pub start_time: WallClock,

    /// End of the blocking window (inclusive)
    pub end_time: WallClock,
}

/// Per-target pause state and daily override budget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseRecord {
    /// When set and in the future, the target is force-allowed
    #[serde(default)]
    pub pause_until: Option<DateTime<Local>>,

    /// Pauses granted per local calendar date
    #[serde(default)]
    pub daily_count: BTreeMap<NaiveDate, u32>,

    /// Paused minutes granted per local calendar date
    #[serde(default)]
    pub daily_minutes: BTreeMap<NaiveDate, u32>,
}

impl PauseRecord {
    /// Whether a pause is active at `now`.
    pub fn is_active(&self, now: DateTime<Local>) -> bool {
        match self.pause_until {
            Some(until) => now < until,
            None => false,
        }
    }

    /// Pauses already granted on `date`.
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.daily_count.get(&date).copied().unwrap_or(0)
    }

    /// Paused minutes already granted on `date`.
    pub fn minutes_on(&self, date: NaiveDate) -> u32 {
        self.daily_minutes.get(&date).copied().unwrap_or(0)
    }
}

/// The durable collection of targets and pause records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub targets: Vec<Target>,

    #[serde(default)]
    pub pauses: BTreeMap<String, PauseRecord>,
}

impl Registry {
    pub fn get_target(&self, url: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.url == url)
    }

    pub fn contains_target(&self, url: &str) -> bool {
        self.get_target(url).is_some()
    }

    /// Remove a target by url. Returns true if one was removed.
    /// The pause record, if any, is kept; quota history outlives the target.
    pub fn remove_target(&mut self, url: &str) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.url != url);
        self.targets.len() != before
    }

    /// Pause record for a target, created lazily on first access.
    pub fn pause_entry(&mut self, url: &str) -> &mut PauseRecord {
        self.pauses.entry(url.to_string()).or_default()
    }

    /// Pause record for a target, if one exists.
    pub fn pause_record(&self, url: &str) -> Option<&PauseRecord> {
        self.pauses.get(url)
    }
}

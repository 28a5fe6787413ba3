//! View types shared between daemon and clients

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One target with its current blocking state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetView {
    pub url: String,
    pub enabled: bool,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    /// Whether the reconciler currently blocks this target
    pub blocked_now: bool,
    /// Set when an override pause is active
    pub paused_until: Option<DateTime<Local>>,
}

/// Daemon status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub api_version: u32,
    pub target_count: usize,
    pub blocked_count: usize,
    /// Last reconcile attempt, if any
    pub last_reconcile: Option<DateTime<Local>>,
    /// Whether the last reconcile attempt succeeded
    pub last_reconcile_ok: bool,
}

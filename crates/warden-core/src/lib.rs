//! Core blocking engine for wardend
//!
//! This crate owns the decisions: whether a target's schedule calls for
//! blocking right now, whether a pause may be granted against the daily
//! budget, and the full desired block set the reconciler should apply.

mod engine;
mod pause;
mod schedule;

pub use engine::*;
pub use pause::*;
pub use schedule::*;

/// Maximum pauses a single target may be granted per local calendar day
pub const MAX_DAILY_PAUSES: u32 = 2;

/// Maximum total paused minutes per target per local calendar day
pub const MAX_DAILY_PAUSE_MINUTES: u32 = 15;

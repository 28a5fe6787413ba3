//! Shared utilities for wardend
//!
//! This crate provides:
//! - The common error type
//! - Wall-clock time-of-day values and `HH:MM` parsing
//! - Default paths for the socket and state directory

mod error;
mod paths;
mod time;

pub use error::*;
pub use paths::*;
pub use time::*;

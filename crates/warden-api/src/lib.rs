//! IPC protocol for wardend
//!
//! Newline-delimited JSON over a Unix socket. Clients send [`Request`]s
//! carrying a [`Command`]; the daemon answers with a [`Response`]
//! carrying a payload or a coded error.

mod commands;
mod types;

pub use commands::*;
pub use types::*;

/// Protocol version, bumped on incompatible changes
pub const API_VERSION: u32 = 1;

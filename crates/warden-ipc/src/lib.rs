//! Unix-socket IPC for wardend
//!
//! Newline-delimited JSON requests and responses. The server funnels
//! every parsed request into one channel; the daemon's event loop
//! answers through a per-request oneshot, which keeps all command
//! handling (and therefore all registry access) on a single path.

mod client;
mod server;

pub use client::*;
pub use server::*;

use thiserror::Error;

/// IPC errors
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Server error: {0}")]
    ServerError(String),
}

pub type IpcResult<T> = Result<T, IpcError>;

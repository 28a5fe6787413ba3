//! Hosts-file enforcement for wardend
//!
//! The hosts file is a shared external resource: everything outside the
//! warden-managed section belongs to the system and is preserved
//! byte-for-byte. Reconciliation fully replaces the managed section,
//! writes the file through an atomic rename, and re-arms the immutable
//! attribute that keeps other processes from editing the file.

mod guard;
mod reconciler;
mod section;

pub use guard::*;
pub use reconciler::*;
pub use section::*;

use thiserror::Error;

/// Hosts-layer errors
#[derive(Debug, Error)]
pub enum HostsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Insufficient privilege: {0}")]
    Privilege(String),

    #[error("Tamper guard failed: {0}")]
    Guard(String),

    #[error("Cache flush failed: {0}")]
    CacheFlush(String),
}

pub type HostsResult<T> = Result<T, HostsError>;

//! Privileged external tools
//!
//! The hosts file is kept immutable between edits with `chattr +i`, and
//! the systemd resolver cache is flushed after every rewrite. Both are
//! external commands; their failures map to distinguishable error kinds
//! so the reconciler can tell a missing privilege from a missing tool.

use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::{HostsError, HostsResult};

/// Set or clear the immutable attribute on `path`.
pub fn set_immutable(path: &Path, on: bool) -> HostsResult<()> {
    let flag = if on { "+i" } else { "-i" };

    let output = Command::new("chattr")
        .arg(flag)
        .arg(path)
        .output()
        .map_err(|e| HostsError::Guard(format!("failed to run chattr: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let msg = format!("chattr {flag} {}: {}", path.display(), stderr.trim());
        if stderr.contains("Operation not permitted") || stderr.contains("Permission denied") {
            return Err(HostsError::Privilege(msg));
        }
        return Err(HostsError::Guard(msg));
    }

    debug!(path = %path.display(), flag, "Immutable attribute updated");
    Ok(())
}

/// Flush the systemd resolver cache. Best-effort; the caller logs and
/// moves on when this fails.
pub fn flush_resolver_cache() -> HostsResult<()> {
    let output = Command::new("resolvectl")
        .arg("flush-caches")
        .output()
        .map_err(|e| HostsError::CacheFlush(format!("failed to run resolvectl: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HostsError::CacheFlush(format!(
            "resolvectl flush-caches: {}",
            stderr.trim()
        )));
    }

    debug!("Resolver cache flushed");
    Ok(())
}

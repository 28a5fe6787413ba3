//! Hosts-file reconciler
//!
//! Applies a desired block set to the hosts file:
//! 1. drop the immutable attribute
//! 2. read and strip the old managed section
//! 3. splice in the new one (or nothing, when the set is empty)
//! 4. atomic temp-file-then-rename write
//! 5. re-arm the immutable attribute
//! 6. best-effort resolver cache flush
//!
//! Callers serialize invocations; one reconciliation is in flight at a
//! time.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{flush_resolver_cache, set_immutable, splice, HostsResult};

/// Reconciles the hosts file against a desired block set.
pub struct HostsReconciler {
    path: PathBuf,
    /// Arm/disarm `chattr +i` around edits
    guard: bool,
    /// Flush the resolver cache after a write
    flush_cache: bool,
}

impl HostsReconciler {
    /// Production reconciler: tamper guard and cache flush active.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: true,
            flush_cache: true,
        }
    }

    /// Reconciler without the privileged side steps, for development
    /// runs and tests against a scratch file.
    pub fn unguarded(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: false,
            flush_cache: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the managed section to exactly `blocked`.
    ///
    /// Returns the number of blocked domains written. Foreign content is
    /// never touched; a failure before the rename leaves the previous
    /// file fully intact.
    pub fn apply(&self, blocked: &[String]) -> HostsResult<usize> {
        if self.guard {
            set_immutable(&self.path, false)?;
        }

        let current = std::fs::read_to_string(&self.path)?;
        let updated = splice(&current, blocked);

        if updated != current {
            self.write_atomic(&updated)?;
            info!(
                path = %self.path.display(),
                blocked_count = blocked.len(),
                "Hosts file updated"
            );
        } else {
            debug!(
                path = %self.path.display(),
                blocked_count = blocked.len(),
                "Hosts file already up to date"
            );
        }

        if self.guard {
            set_immutable(&self.path, true)?;
        }

        if self.flush_cache
            && let Err(e) = flush_resolver_cache()
        {
            warn!(error = %e, "Resolver cache flush failed, continuing");
        }

        Ok(blocked.len())
    }

    fn write_atomic(&self, content: &str) -> HostsResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("/"));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        // The hosts file must stay world-readable; a fresh temp file
        // defaults to 0600.
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

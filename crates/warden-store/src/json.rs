//! JSON-file registry persistence

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Registry, StoreResult};

/// File-backed registry store.
///
/// `load` is forgiving: a missing or unparsable file yields an empty
/// registry so the daemon can always start. `save` is strict and
/// propagates every failure so a mutation is never reported successful
/// without the registry on disk.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry from disk.
    pub fn load(&self) -> Registry {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No registry file, starting empty");
                return Registry::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read registry, starting empty");
                return Registry::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(registry) => registry,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse registry, starting empty");
                Registry::default()
            }
        }
    }

    /// Persist the registry as one atomic replace.
    pub fn save(&self, registry: &Registry) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(registry)?;

        // Write to a sibling temp file and rename over the target so a
        // crash mid-write never leaves a truncated registry.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            path = %self.path.display(),
            target_count = registry.targets.len(),
            "Registry saved"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Target;
    use warden_util::WallClock;

    fn sample_registry() -> Registry {
        let mut reg = Registry::default();
        reg.targets.push(Target {
            url: "example.com".into(),
            enabled: true,
            start_time: WallClock::new(9, 0).unwrap(),
            end_time: WallClock::new(17, 0).unwrap(),
        });
        reg
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("registry.json"));

        let reg = sample_registry();
        store.save(&reg).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, reg);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("missing.json"));

        let loaded = store.load();
        assert!(loaded.targets.is_empty());
        assert!(loaded.pauses.is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonStore::new(&path);
        assert!(store.load().targets.is_empty());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/state/registry.json"));

        store.save(&sample_registry()).unwrap();
        assert_eq!(store.load().targets.len(), 1);
    }
}

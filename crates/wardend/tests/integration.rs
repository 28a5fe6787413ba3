//! Integration tests for wardend
//!
//! These tests verify the end-to-end behavior of the daemon: registry
//! changes and pause decisions flowing through to the managed hosts
//! file section.

use chrono::{DateTime, Local, TimeZone};
use warden_core::{BlockerEngine, PauseDecision};
use warden_hosts::HostsReconciler;
use warden_store::JsonStore;

fn at(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .unwrap()
}

struct Harness {
    engine: BlockerEngine,
    reconciler: HostsReconciler,
    hosts_path: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let hosts_path = dir.path().join("hosts");
        std::fs::write(&hosts_path, "127.0.0.1 localhost\n").unwrap();

        let store = JsonStore::new(dir.path().join("registry.json"));
        Self {
            engine: BlockerEngine::new(store),
            reconciler: HostsReconciler::unguarded(&hosts_path),
            hosts_path,
            _dir: dir,
        }
    }

    fn reconcile(&mut self, now: DateTime<Local>) {
        let blocked = self.engine.blocked_domains(now);
        self.reconciler.apply(&blocked).unwrap();
    }

    fn hosts(&self) -> String {
        std::fs::read_to_string(&self.hosts_path).unwrap()
    }
}

#[test]
fn block_pause_and_restore_cycle() {
    let mut h = Harness::new();
    h.engine
        .add_target("example.com", true, "09:00", "17:00")
        .unwrap();

    // Inside the window: both host entries present
    h.reconcile(at(10, 0));
    let hosts = h.hosts();
    assert!(hosts.contains("0.0.0.0 example.com"));
    assert!(hosts.contains("0.0.0.0 www.example.com"));
    assert!(hosts.contains("127.0.0.1 localhost"));

    // Grant a 5-minute pause at 10:01
    let decision = h.engine.request_pause("example.com", 5, at(10, 1)).unwrap();
    assert!(matches!(decision, PauseDecision::Granted(_)));

    // While paused the entries are gone
    h.reconcile(at(10, 2));
    assert!(!h.hosts().contains("example.com"));

    // Pause expired: the next cycle restores them
    h.reconcile(at(10, 7));
    assert!(h.hosts().contains("0.0.0.0 example.com"));
}

#[test]
fn outside_window_leaves_no_managed_section() {
    let mut h = Harness::new();
    h.engine
        .add_target("example.com", true, "09:00", "17:00")
        .unwrap();

    h.reconcile(at(8, 0));
    let hosts = h.hosts();
    assert!(!hosts.contains("example.com"));
    assert!(!hosts.contains("## WARDEN"));
    assert_eq!(hosts, "127.0.0.1 localhost\n");
}

#[test]
fn registry_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("registry.json");

    {
        let mut engine = BlockerEngine::new(JsonStore::new(&registry_path));
        engine
            .add_target("example.com", true, "09:00", "17:00")
            .unwrap();
        engine.request_pause("example.com", 5, at(10, 0)).unwrap();
        engine.request_pause("example.com", 5, at(10, 30)).unwrap();
    }

    // A fresh engine sees the targets and the consumed pause budget
    let mut engine = BlockerEngine::new(JsonStore::new(&registry_path));
    assert_eq!(engine.blocked_domains(at(23, 0)).len(), 0);
    assert_eq!(engine.blocked_domains(at(12, 0)), vec!["example.com"]);

    let decision = engine.request_pause("example.com", 5, at(11, 0)).unwrap();
    assert!(matches!(decision, PauseDecision::Denied { .. }));
}

#[test]
fn cross_midnight_window_blocks_on_both_sides() {
    let mut h = Harness::new();
    h.engine
        .add_target("example.com", true, "22:00", "06:00")
        .unwrap();

    h.reconcile(at(23, 30));
    assert!(h.hosts().contains("0.0.0.0 example.com"));

    h.reconcile(at(5, 0));
    assert!(h.hosts().contains("0.0.0.0 example.com"));

    h.reconcile(at(12, 0));
    assert!(!h.hosts().contains("example.com"));
}

#[test]
fn foreign_hosts_content_untouched_across_cycles() {
    let mut h = Harness::new();
    std::fs::write(
        &h.hosts_path,
        "127.0.0.1 localhost\n# my router\n192.168.1.1 gateway\n",
    )
    .unwrap();

    h.engine
        .add_target("example.com", true, "00:00", "23:59")
        .unwrap();

    h.reconcile(at(10, 0));
    h.engine.remove_target("example.com").unwrap();
    h.reconcile(at(10, 1));

    assert_eq!(
        h.hosts(),
        "127.0.0.1 localhost\n# my router\n192.168.1.1 gateway\n"
    );
}

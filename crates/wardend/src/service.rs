//! Service state and command handling
//!
//! One `Service` value holds the engine and the reconciler; the daemon
//! wraps it in a single mutex. Holding that lock across a whole
//! mutation (validate, persist, reconcile) serializes registry
//! read-modify-writes and hosts-file rewrites against each other and
//! against the timer path.

use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;
use tracing::debug;
use warden_api::{
    Command, ErrorCode, ErrorInfo, Request, Response, ResponsePayload, StatusSnapshot, TargetView,
    API_VERSION,
};
use warden_core::{BlockerEngine, PauseDecision, TargetStatus};
use warden_hosts::{HostsError, HostsReconciler};
use warden_store::JsonStore;
use warden_util::WardenError;

pub struct Service {
    engine: BlockerEngine,
    reconciler: HostsReconciler,
    last_reconcile: Option<DateTime<Local>>,
    last_reconcile_ok: bool,
}

impl Service {
    pub fn new(state_dir: &Path, hosts_file: &Path, no_guard: bool) -> Result<Self> {
        std::fs::create_dir_all(state_dir)?;

        let store = JsonStore::new(state_dir.join("registry.json"));
        let engine = BlockerEngine::new(store);

        let reconciler = if no_guard {
            HostsReconciler::unguarded(hosts_file)
        } else {
            HostsReconciler::new(hosts_file)
        };

        // No attempt yet; the flag only turns true once a reconcile
        // actually succeeds.
        Ok(Self {
            engine,
            reconciler,
            last_reconcile: None,
            last_reconcile_ok: false,
        })
    }

    /// Re-read the registry from disk (timer path).
    pub fn reload(&mut self) {
        self.engine.reload();
    }

    /// Recompute the desired block set and rewrite the hosts file.
    pub fn reconcile_now(&mut self) -> std::result::Result<usize, HostsError> {
        self.reconcile_at(warden_util::now())
    }

    fn reconcile_at(&mut self, now: DateTime<Local>) -> std::result::Result<usize, HostsError> {
        let blocked = self.engine.blocked_domains(now);
        let result = self.reconciler.apply(&blocked);

        self.last_reconcile = Some(now);
        self.last_reconcile_ok = result.is_ok();

        if let Ok(count) = &result {
            debug!(blocked_count = count, "Reconciliation complete");
        }

        result
    }

    /// Handle one IPC request.
    pub fn handle_request(&mut self, request: &Request) -> Response {
        let id = request.request_id;

        if request.api_version != API_VERSION {
            return Response::error(
                id,
                ErrorInfo::new(
                    ErrorCode::InvalidRequest,
                    format!(
                        "unsupported api version {} (expected {})",
                        request.api_version, API_VERSION
                    ),
                ),
            );
        }

        let now = warden_util::now();

        match &request.command {
            Command::ListTargets => {
                let targets = self
                    .engine
                    .list_targets(now)
                    .into_iter()
                    .map(to_view)
                    .collect();
                Response::success(id, ResponsePayload::Targets(targets))
            }

            Command::AddTarget {
                url,
                enabled,
                start_time,
                end_time,
            } => {
                let target = match self.engine.add_target(url, *enabled, start_time, end_time) {
                    Ok(t) => t,
                    Err(e) => return Response::error(id, engine_error(e)),
                };

                if let Err(e) = self.reconcile_at(now) {
                    return Response::error(id, hosts_error(e));
                }

                let status = TargetStatus {
                    blocked_now: self
                        .engine
                        .blocked_domains(now)
                        .iter()
                        .any(|u| u == &target.url),
                    paused_until: None,
                    target,
                };
                Response::success(id, ResponsePayload::TargetAdded(to_view(status)))
            }

            Command::RemoveTarget { url } => {
                if let Err(e) = self.engine.remove_target(url) {
                    return Response::error(id, engine_error(e));
                }

                if let Err(e) = self.reconcile_at(now) {
                    return Response::error(id, hosts_error(e));
                }

                Response::success(id, ResponsePayload::TargetRemoved)
            }

            Command::PauseTarget { url, minutes } => {
                let decision = match self.engine.request_pause(url, *minutes, now) {
                    Ok(d) => d,
                    Err(e) => return Response::error(id, engine_error(e)),
                };

                match decision {
                    PauseDecision::Granted(grant) => {
                        if let Err(e) = self.reconcile_at(now) {
                            return Response::error(id, hosts_error(e));
                        }

                        Response::success(
                            id,
                            ResponsePayload::PauseGranted {
                                pause_until: grant.pause_until,
                                remaining_pauses: grant.remaining_pauses,
                                remaining_minutes: grant.remaining_minutes,
                            },
                        )
                    }
                    PauseDecision::Denied {
                        remaining_pauses,
                        remaining_minutes,
                    } => Response::success(
                        id,
                        ResponsePayload::PauseDenied {
                            remaining_pauses,
                            remaining_minutes,
                        },
                    ),
                }
            }

            Command::GetStatus => {
                let target_count = self.engine.registry().targets.len();
                let blocked_count = self.engine.blocked_domains(now).len();

                let snapshot = StatusSnapshot {
                    api_version: API_VERSION,
                    target_count,
                    blocked_count,
                    last_reconcile: self.last_reconcile,
                    last_reconcile_ok: self.last_reconcile_ok,
                };
                Response::success(id, ResponsePayload::Status(snapshot))
            }

            Command::Ping => Response::success(id, ResponsePayload::Pong),
        }
    }
}

fn to_view(status: TargetStatus) -> TargetView {
    TargetView {
        url: status.target.url,
        enabled: status.target.enabled,
        start_time: status.target.start_time.to_string(),
        end_time: status.target.end_time.to_string(),
        blocked_now: status.blocked_now,
        paused_until: status.paused_until,
    }
}

fn engine_error(e: WardenError) -> ErrorInfo {
    let code = match &e {
        WardenError::TargetNotFound(_) => ErrorCode::TargetNotFound,
        WardenError::DuplicateTarget(_) => ErrorCode::DuplicateTarget,
        WardenError::ValidationError(_) => ErrorCode::ValidationError,
        WardenError::StoreError(_) => ErrorCode::StoreError,
        WardenError::HostsError(_) => ErrorCode::HostsError,
        WardenError::PermissionDenied(_) => ErrorCode::PermissionDenied,
        WardenError::IpcError(_) | WardenError::Internal(_) => ErrorCode::InternalError,
    };
    ErrorInfo::new(code, e.to_string())
}

fn hosts_error(e: HostsError) -> ErrorInfo {
    let code = match &e {
        HostsError::Privilege(_) => ErrorCode::PermissionDenied,
        _ => ErrorCode::HostsError,
    };
    ErrorInfo::new(code, e.to_string())
}

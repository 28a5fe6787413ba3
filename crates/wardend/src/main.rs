//! wardend - scheduled website blocking daemon
//!
//! Wires together the components:
//! - Registry store (JSON)
//! - Blocking engine (schedule + pause quota decisions)
//! - Hosts-file reconciler
//! - IPC server (Unix socket)
//! - Timer-driven reconciliation loop

mod service;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use service::Service;

/// wardend - time-windowed website blocking via the hosts file
#[derive(Parser, Debug)]
#[command(name = "wardend")]
#[command(about = "Time-windowed website blocking via the hosts file", long_about = None)]
struct Args {
    /// Hosts file to manage
    #[arg(long, default_value = "/etc/hosts")]
    hosts_file: PathBuf,

    /// Socket path override (or set WARDEN_SOCKET env var)
    #[arg(short, long, env = "WARDEN_SOCKET", default_value_os_t = warden_util::socket_path_without_env())]
    socket: PathBuf,

    /// State directory override (or set WARDEN_STATE_DIR env var)
    #[arg(short = 'd', long, env = "WARDEN_STATE_DIR", default_value_os_t = warden_util::state_dir_without_env())]
    state_dir: PathBuf,

    /// Seconds between reconciliation cycles
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,

    /// Skip the chattr tamper guard and resolver cache flush.
    /// For development against a scratch hosts file.
    #[arg(long)]
    no_guard: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "wardend starting");

    if !args.no_guard && !nix::unistd::geteuid().is_root() {
        bail!(
            "wardend must run as root to manage {} (use --no-guard for development)",
            args.hosts_file.display()
        );
    }

    let mut service = Service::new(
        &args.state_dir,
        &args.hosts_file,
        args.no_guard,
    )
    .with_context(|| format!("Failed to initialize service in {:?}", args.state_dir))?;

    // First reconcile happens before the socket accepts requests so the
    // hosts file reflects the persisted registry from the start.
    if let Err(e) = service.reconcile_now() {
        warn!(error = %e, "Initial reconciliation failed, will retry on the next tick");
    }

    let mut ipc = warden_ipc::IpcServer::new(&args.socket);
    ipc.start().await?;
    info!(socket_path = %args.socket.display(), "IPC server started");

    let mut requests = ipc
        .take_request_receiver()
        .await
        .expect("Request receiver should be available");

    let ipc = Arc::new(ipc);
    let accept = ipc.clone();
    tokio::spawn(async move {
        if let Err(e) = accept.run().await {
            error!(error = %e, "IPC server error");
        }
    });

    let service = Arc::new(Mutex::new(service));

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

    let mut tick_timer = tokio::time::interval(Duration::from_secs(args.interval_secs.max(1)));
    // The startup reconcile already ran; skip the interval's immediate tick
    tick_timer.tick().await;

    info!(interval_secs = args.interval_secs, "Service running");

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
                break;
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, shutting down");
                break;
            }

            // Timer tick: reload the registry and reconcile. Failures are
            // logged and retried on the next tick, never surfaced.
            _ = tick_timer.tick() => {
                let mut svc = service.lock().await;
                svc.reload();
                if let Err(e) = svc.reconcile_now() {
                    warn!(error = %e, "Reconciliation failed, will retry on the next tick");
                }
            }

            // IPC request: mutations reconcile synchronously before the
            // response goes out.
            Some(pending) = requests.recv() => {
                let response = {
                    let mut svc = service.lock().await;
                    svc.handle_request(&pending.request)
                };
                if pending.respond.send(response).is_err() {
                    warn!("Client went away before response");
                }
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}

//! wardenctl - control CLI for wardend

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use warden_api::{Command, ResponsePayload, ResponseResult};
use warden_ipc::IpcClient;

/// Control CLI for wardend
#[derive(Parser, Debug)]
#[command(name = "wardenctl")]
#[command(about = "Manage wardend block targets and pauses", long_about = None)]
struct Args {
    /// Socket path override (or set WARDEN_SOCKET env var)
    #[arg(short, long, env = "WARDEN_SOCKET", default_value_os_t = warden_util::socket_path_without_env())]
    socket: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List targets and their current blocking state
    List,

    /// Add a target
    Add {
        /// Bare domain, e.g. example.com
        url: String,

        /// Window start, HH:MM
        #[arg(long, default_value = "00:00")]
        start: String,

        /// Window end, HH:MM (inclusive)
        #[arg(long, default_value = "23:59")]
        end: String,

        /// Add the target without enabling its schedule
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a target by url
    Remove { url: String },

    /// Pause blocking for a target (counts against the daily budget)
    Pause {
        url: String,

        /// Pause duration in minutes
        minutes: u32,
    },

    /// Show daemon status
    Status,

    /// Check the daemon is reachable
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut client = IpcClient::connect(&args.socket)
        .await
        .with_context(|| format!("Failed to connect to wardend at {:?}", args.socket))?;

    let command = match &args.action {
        Action::List => Command::ListTargets,
        Action::Add {
            url,
            start,
            end,
            disabled,
        } => Command::AddTarget {
            url: url.clone(),
            enabled: !disabled,
            start_time: start.clone(),
            end_time: end.clone(),
        },
        Action::Remove { url } => Command::RemoveTarget { url: url.clone() },
        Action::Pause { url, minutes } => Command::PauseTarget {
            url: url.clone(),
            minutes: *minutes,
        },
        Action::Status => Command::GetStatus,
        Action::Ping => Command::Ping,
    };

    let response = client.send(command).await?;

    let payload = match response.result {
        ResponseResult::Ok(payload) => payload,
        ResponseResult::Err(e) => bail!("{:?}: {}", e.code, e.message),
    };

    match payload {
        ResponsePayload::Targets(targets) => {
            if targets.is_empty() {
                println!("No targets configured");
            }
            for t in targets {
                let state = if !t.enabled {
                    "disabled".to_string()
                } else if let Some(until) = t.paused_until {
                    format!("paused until {}", until.format("%H:%M:%S"))
                } else if t.blocked_now {
                    "blocked".to_string()
                } else {
                    "allowed".to_string()
                };
                println!("{:<30} {}-{}  {}", t.url, t.start_time, t.end_time, state);
            }
        }

        ResponsePayload::TargetAdded(t) => {
            println!(
                "Added {} ({}-{}), currently {}",
                t.url,
                t.start_time,
                t.end_time,
                if t.blocked_now { "blocked" } else { "allowed" }
            );
        }

        ResponsePayload::TargetRemoved => println!("Removed"),

        ResponsePayload::PauseGranted {
            pause_until,
            remaining_pauses,
            remaining_minutes,
        } => {
            println!(
                "Paused until {} ({} pauses, {} minutes left today)",
                pause_until.format("%H:%M:%S"),
                remaining_pauses,
                remaining_minutes
            );
        }

        ResponsePayload::PauseDenied {
            remaining_pauses,
            remaining_minutes,
        } => {
            println!(
                "Pause denied: daily budget exhausted ({} pauses, {} minutes left)",
                remaining_pauses, remaining_minutes
            );
        }

        ResponsePayload::Status(s) => {
            println!("targets:        {}", s.target_count);
            println!("blocked now:    {}", s.blocked_count);
            match s.last_reconcile {
                Some(at) => println!(
                    "last reconcile: {} ({})",
                    at.format("%Y-%m-%d %H:%M:%S"),
                    if s.last_reconcile_ok { "ok" } else { "failed" }
                ),
                None => println!("last reconcile: never"),
            }
        }

        ResponsePayload::Pong => println!("pong"),
    }

    Ok(())
}

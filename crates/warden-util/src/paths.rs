//! Default paths for wardend components
//!
//! Defaults are user-writable so development runs need no root:
//! - Socket: `$XDG_RUNTIME_DIR/wardend/wardend.sock` or `/tmp/wardend-$USER/wardend.sock`
//! - State: `$XDG_STATE_HOME/wardend` or `~/.local/state/wardend`
//!
//! Production deployments running as root point these at `/run/wardend`
//! and `/var/lib/wardend` via flags or the environment.

use std::path::PathBuf;

/// Environment variable for overriding the socket path
pub const WARDEN_SOCKET_ENV: &str = "WARDEN_SOCKET";

/// Environment variable for overriding the state directory
pub const WARDEN_STATE_DIR_ENV: &str = "WARDEN_STATE_DIR";

/// Socket filename within the socket directory
const SOCKET_FILENAME: &str = "wardend.sock";

/// Application subdirectory name
const APP_DIR: &str = "wardend";

/// Get the default socket path.
///
/// Order of precedence:
/// 1. `$WARDEN_SOCKET` environment variable (if set)
/// 2. `$XDG_RUNTIME_DIR/wardend/wardend.sock` (if XDG_RUNTIME_DIR is set)
/// 3. `/tmp/wardend-$USER/wardend.sock` (fallback)
pub fn default_socket_path() -> PathBuf {
    if let Ok(path) = std::env::var(WARDEN_SOCKET_ENV) {
        return PathBuf::from(path);
    }

    socket_path_without_env()
}

/// Get the socket path without checking the WARDEN_SOCKET env var.
/// Used for default values where the env var is checked separately.
pub fn socket_path_without_env() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join(APP_DIR).join(SOCKET_FILENAME);
    }

    let username = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    PathBuf::from(format!("/tmp/{}-{}", APP_DIR, username)).join(SOCKET_FILENAME)
}

/// Get the default state directory (the registry JSON lives here).
///
/// Order of precedence:
/// 1. `$WARDEN_STATE_DIR` environment variable (if set)
/// 2. `$XDG_STATE_HOME/wardend` (if XDG_STATE_HOME is set)
/// 3. `~/.local/state/wardend` (fallback)
pub fn default_state_dir() -> PathBuf {
    if let Ok(path) = std::env::var(WARDEN_STATE_DIR_ENV) {
        return PathBuf::from(path);
    }

    state_dir_without_env()
}

/// Get the state directory without checking the WARDEN_STATE_DIR env var.
pub fn state_dir_without_env() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("state").join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("state")
}

//! Command types for the wardend protocol

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{StatusSnapshot, TargetView, API_VERSION};

/// Request wrapper with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// The command
    pub command: Command,
}

impl Request {
    pub fn new(request_id: u64, command: Command) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            command,
        }
    }
}

/// Response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Corresponding request ID
    pub request_id: u64,
    /// API version
    pub api_version: u32,
    /// Response payload or error
    pub result: ResponseResult,
}

impl Response {
    pub fn success(request_id: u64, payload: ResponsePayload) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Ok(payload),
        }
    }

    pub fn error(request_id: u64, error: ErrorInfo) -> Self {
        Self {
            request_id,
            api_version: API_VERSION,
            result: ResponseResult::Err(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseResult {
    Ok(ResponsePayload),
    Err(ErrorInfo),
}

/// Error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error codes for the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    TargetNotFound,
    DuplicateTarget,
    ValidationError,
    StoreError,
    HostsError,
    PermissionDenied,
    InternalError,
}

/// All possible commands from clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// List targets with their current blocking state
    ListTargets,

    /// Add a target to the registry
    AddTarget {
        url: String,
        enabled: bool,
        /// `HH:MM`
        start_time: String,
        /// `HH:MM`
        end_time: String,
    },

    /// Remove a target by url
    RemoveTarget { url: String },

    /// Request a quota-limited pause for a target
    PauseTarget { url: String, minutes: u32 },

    /// Get daemon status
    GetStatus,

    /// Ping for keepalive
    Ping,
}

/// Response payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Targets(Vec<TargetView>),
    TargetAdded(TargetView),
    TargetRemoved,
    PauseGranted {
        pause_until: DateTime<Local>,
        remaining_pauses: u32,
        remaining_minutes: u32,
    },
    /// Daily pause budget exhausted; not an error
    PauseDenied {
        remaining_pauses: u32,
        remaining_minutes: u32,
    },
    Status(StatusSnapshot),
    Pong,
}

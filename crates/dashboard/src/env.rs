// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the dashboard crate (§6.3).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::DashboardError;

/// Required shared secret agents present in the `register` upgrade request.
pub fn agent_token() -> Result<String, DashboardError> {
    std::env::var("NIXFLEET_AGENT_TOKEN").map_err(|_| DashboardError::MissingEnv("NIXFLEET_AGENT_TOKEN"))
}

/// Signing secret for browser session cookies, owned by the external login
/// collaborator (§1 scope boundary) but validated here at the upgrade.
pub fn session_secret() -> Result<String, DashboardError> {
    std::env::var("NIXFLEET_SESSION_SECRET")
        .map_err(|_| DashboardError::MissingEnv("NIXFLEET_SESSION_SECRET"))
}

/// Database/state directory (§6.4). `NIXFLEET_DATA_DIR` > `XDG_STATE_HOME/nixfleet` > `~/.local/state/nixfleet`.
pub fn data_dir() -> Result<PathBuf, DashboardError> {
    if let Ok(dir) = std::env::var("NIXFLEET_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("nixfleet"));
    }
    let home = std::env::var("HOME").map_err(|_| DashboardError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/nixfleet"))
}

/// Baseline source commit this dashboard build expects agents to run,
/// compared against `Freshness::source_commit` to derive `agent_outdated`
/// (§4.7). `"unknown"` when unset, which per §4.7 forces `agent_outdated = false`.
pub fn expected_source_commit() -> String {
    std::env::var("NIXFLEET_EXPECTED_COMMIT").unwrap_or_else(|_| "unknown".to_string())
}

/// TCP bind address for the Transport Hub's `/ws` endpoint.
pub fn listen_addr() -> String {
    std::env::var("NIXFLEET_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:7878".to_string())
}

/// Retention horizon for terminal commands/pipelines (§4.9, default 30 days).
pub fn command_pipeline_retention() -> Duration {
    std::env::var("NIXFLEET_COMMAND_RETENTION_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30 * 24 * 60 * 60))
}

/// Retention horizon for audit events (§4.9, default 7 days).
pub fn event_retention() -> Duration {
    std::env::var("NIXFLEET_EVENT_RETENTION_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(7 * 24 * 60 * 60))
}

/// How often the retention sweep (§4.9) and the orphan detector (§4.12) run.
pub fn housekeeping_interval() -> Duration {
    std::env::var("NIXFLEET_HOUSEKEEPING_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(300))
}

/// Sync Manager beacon interval (§4.10, default 30s, test floor lower).
pub fn beacon_interval() -> Duration {
    std::env::var("NIXFLEET_BEACON_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30))
}

/// Orphan horizon multiplier (§4.12): a command `EXECUTING` longer than
/// `multiplier * hard_timeout` without activity is forced to `ORPHANED`.
pub fn orphan_horizon_multiplier() -> u64 {
    std::env::var("NIXFLEET_ORPHAN_HORIZON_MULTIPLIER")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2)
}

/// Unix socket path `nixfleet-cli` connects to for the administrative
/// control channel (§10.1). Defaults next to the state directory.
pub fn control_socket_path() -> Result<PathBuf, DashboardError> {
    if let Ok(path) = std::env::var("NIXFLEET_CONTROL_SOCKET") {
        return Ok(PathBuf::from(path));
    }
    Ok(data_dir()?.join("control.sock"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

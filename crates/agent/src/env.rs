// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the agent crate (§6.2).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

/// Dashboard WebSocket endpoint, e.g. `wss://fleet.example.com/ws`.
pub fn url() -> Result<String, AgentError> {
    std::env::var("NIXFLEET_URL").map_err(|_| AgentError::MissingEnv("NIXFLEET_URL"))
}

/// Shared secret presented in the `register` upgrade request.
pub fn token() -> Result<String, AgentError> {
    std::env::var("NIXFLEET_TOKEN").map_err(|_| AgentError::MissingEnv("NIXFLEET_TOKEN"))
}

/// Local checkout the Command Executor (C4) runs ops against.
pub fn repo_dir() -> Result<PathBuf, AgentError> {
    std::env::var("NIXFLEET_REPO_DIR").map(PathBuf::from).map_err(|_| AgentError::MissingEnv("NIXFLEET_REPO_DIR"))
}

/// Remote to clone/fetch from. Its presence selects isolated-repo mode
/// (§10.1 C3): the agent owns the checkout rather than trusting whatever is
/// already on disk at `repo_dir`.
pub fn repo_url() -> Option<String> {
    std::env::var("NIXFLEET_REPO_URL").ok()
}

pub fn branch() -> String {
    std::env::var("NIXFLEET_BRANCH").unwrap_or_else(|_| "main".to_string())
}

/// Heartbeat cadence (§4.3, default 30s).
pub fn heartbeat_interval() -> Duration {
    std::env::var("NIXFLEET_INTERVAL")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30))
}

pub fn ssh_key() -> Option<PathBuf> {
    std::env::var("NIXFLEET_SSH_KEY").ok().map(PathBuf::from)
}

/// Reported hostname, overriding whatever `hostname(1)` would say.
pub fn hostname_override() -> Option<String> {
    std::env::var("NIXFLEET_HOSTNAME").ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

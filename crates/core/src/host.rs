// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Host entity (§3.1) and the external-source-of-truth status values C13 feeds into it.

use serde::{Deserialize, Serialize};

use crate::freshness::Freshness;

/// Declared platform of a fleet member. The agent selects the exact
/// nix-rebuild-equivalent tool per variant; the dashboard never needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostType {
    Nixos,
    Macos,
}

/// A tagged status value produced by the (opaque) external source of truth, C13.
///
/// Every status field on [`Host`] (`git_status`, `lock_status`, `system_status`,
/// `tests_status`) uses this shape so the Command State Machine's pre-condition
/// table (§4.8.1) can match on `status` uniformly regardless of which collaborator
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusValue {
    pub status: StatusKind,
    pub message: String,
    pub checked_at_epoch_ms: u64,
}

impl StatusValue {
    pub fn unknown() -> Self {
        Self {
            status: StatusKind::Unknown,
            message: String::new(),
            checked_at_epoch_ms: 0,
        }
    }
}

impl Default for StatusValue {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Ok,
    Outdated,
    Working,
    Error,
    Unknown,
}

/// Canonical record for one fleet member (§3.1).
///
/// Identified by `hostname`, which is unique and never reused. Created on first
/// successful `register`; never destroyed automatically — removal is an explicit
/// administrative action outside this core (§1 scope boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub hostname: String,
    pub host_type: HostType,
    pub agent_version: String,
    pub freshness: Freshness,
    pub os_version: String,
    /// Short (≥7 hex char) commit id of the deployed configuration at HEAD (§6.5).
    pub generation: String,
    pub heartbeat_interval_s: u64,

    /// Derived: connection open in the Transport Hub's index AND `last_seen`
    /// within 3x `heartbeat_interval_s` (§4.7). Never set directly.
    #[serde(default)]
    pub online: bool,
    pub last_seen_epoch_ms: u64,
    /// Derived from comparing `freshness.source_commit` against the dashboard's
    /// own build-time baseline. `false` whenever either side is `"unknown"` (§4.7).
    #[serde(default)]
    pub agent_outdated: bool,

    pub git_status: StatusValue,
    pub lock_status: StatusValue,
    pub system_status: StatusValue,
    pub tests_status: StatusValue,

    /// Cosmetic fields surfaced by the (opaque) browser UI; carried verbatim.
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

impl Host {
    /// Returns true when `generation` looks like a plausible short commit id (§6.5).
    pub fn has_valid_generation(&self) -> bool {
        self.generation.len() >= 7 && self.generation.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// `online` per §4.7: caller supplies whether a connection is currently
    /// held open for this hostname; this only evaluates the time half of the
    /// conjunction. Kept as a pure function so the derivation is testable
    /// without a live Transport Hub.
    pub fn within_heartbeat_window(&self, now_epoch_ms: u64) -> bool {
        let window_ms = self.heartbeat_interval_s.saturating_mul(3).saturating_mul(1000);
        now_epoch_ms.saturating_sub(self.last_seen_epoch_ms) <= window_ms
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

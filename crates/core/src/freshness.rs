// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three-layer Binary Freshness Detector (§4.6, §4.8.4, P4).

use serde::{Deserialize, Serialize};

/// The three-layer identity of a running agent binary, computed once at
/// startup by the Freshness Reporter (C6) and attached to every `register`
/// and `heartbeat` frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freshness {
    /// Build-time embedded source commit. `"unknown"` when unavailable.
    pub source_commit: String,
    /// Resolved executable path; changes whenever the content-addressed
    /// derivation changes.
    pub store_path: String,
    /// SHA-256 of the binary's on-disk bytes, hex-encoded.
    pub binary_hash: String,
}

impl Freshness {
    pub fn unknown() -> Self {
        Self {
            source_commit: "unknown".to_string(),
            store_path: "unknown".to_string(),
            binary_hash: "unknown".to_string(),
        }
    }
}

/// Outcome of comparing a pre-command snapshot's freshness against the
/// freshness reported on the reconnect following an agent-restarting op
/// (§4.8.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessVerdict {
    /// `store_path` or `binary_hash` changed: the binary genuinely restarted.
    Fresh,
    /// The commit changed but neither artifact identity did — a build that
    /// didn't actually produce a new binary for this host.
    Suspicious,
    /// Nothing changed at all.
    Stale,
    /// Before- or after-data was missing on at least one side; the machine
    /// must wait for the reconnect timer rather than guess (§4.8.4).
    Unknown,
}

/// Pure decision-matrix function implementing the table in §4.8.4. Grounds P4:
/// "if all three are unchanged, verdict is STALE_BINARY; if path or hash
/// changed, verdict is FRESH."
pub fn compare_freshness(before: &Freshness, after: &Freshness) -> FreshnessVerdict {
    if before.source_commit == "unknown"
        || after.source_commit == "unknown"
        || before.store_path == "unknown"
        || after.store_path == "unknown"
        || before.binary_hash == "unknown"
        || after.binary_hash == "unknown"
    {
        return FreshnessVerdict::Unknown;
    }

    let commit_changed = before.source_commit != after.source_commit;
    let path_changed = before.store_path != after.store_path;
    let hash_changed = before.binary_hash != after.binary_hash;

    if path_changed || hash_changed {
        FreshnessVerdict::Fresh
    } else if commit_changed {
        FreshnessVerdict::Suspicious
    } else {
        FreshnessVerdict::Stale
    }
}

#[cfg(test)]
#[path = "freshness_tests.rs"]
mod tests;

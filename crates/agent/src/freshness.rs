// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Freshness Reporter (C6): assembles the three-layer identity
//! (`nixfleet_core::Freshness`) attached to every `register`/`heartbeat`
//! frame (§4.6).
//!
//! `source_commit` is embedded at build time (`build.rs`), so it answers
//! "what commit was this binary built from" even if the on-disk checkout
//! has since moved on. `store_path`/`binary_hash` are computed at runtime
//! from the actual running executable, so a NixOS generation switch that
//! swaps the binary underneath a live agent is visible on the next report.

use std::path::Path;

use nixfleet_core::Freshness;
use sha2::{Digest, Sha256};

use crate::error::AgentError;

/// Commit this binary was built from; baked in by `build.rs`.
pub const SOURCE_COMMIT: &str = env!("NIXFLEET_SOURCE_COMMIT");

/// Reads and hashes the currently running executable off disk.
pub async fn current() -> Result<Freshness, AgentError> {
    let exe = std::env::current_exe()?;
    let store_path = resolve_store_path(&exe);
    let bytes = tokio::fs::read(&exe).await?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let binary_hash = hex_encode(&hasher.finalize());

    Ok(Freshness { source_commit: SOURCE_COMMIT.to_string(), store_path, binary_hash })
}

/// Canonicalizes so a NixOS `/nix/store/<hash>-nixfleet-agent/bin/nixfleet-agent`
/// symlink resolves to its real content-addressed path rather than whatever
/// `/run/current-system` alias pointed at it.
fn resolve_store_path(exe: &Path) -> String {
    std::fs::canonicalize(exe).unwrap_or_else(|_| exe.to_path_buf()).display().to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "freshness_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot schema migration for the State Store (C9). Snapshots are tagged
//! with a `v` field; [`MigrationRegistry`] walks a chain of registered
//! [`Migration`]s from whatever version a snapshot was written with up to
//! the version this binary expects.
//!
//! There are no registered migrations yet — `nixfleet-store`'s snapshot
//! schema hasn't changed since version 1 — but the chain mechanism is wired
//! up so the first schema change doesn't need to invent it under pressure.

use serde_json::Value;
use thiserror::Error;

/// Current on-disk snapshot schema version this binary writes and expects.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("snapshot version {0} is newer than this binary's target version {1}")]
    TooNew(u32, u32),

    #[error("no migration path from version {0} to {1}")]
    NoPath(u32, u32),
}

/// A single schema step: `source_version` snapshots in, `target_version`
/// snapshots out.
pub trait Migration {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError>;
}

#[derive(Default)]
pub struct MigrationRegistry {
    migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self { migrations: Vec::new() }
    }

    pub fn register(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
    }

    /// Walks `snapshot` from its current `v` field up to `target`, applying
    /// one migration per step. A no-op if already at `target`.
    pub fn migrate_to(&self, snapshot: Value, target: u32) -> Result<Value, MigrationError> {
        let current = snapshot.get("v").and_then(Value::as_u64).unwrap_or(0) as u32;

        if current == target {
            return Ok(snapshot);
        }
        if current > target {
            return Err(MigrationError::TooNew(current, target));
        }

        let mut snapshot = snapshot;
        let mut version = current;
        while version != target {
            let step = self
                .migrations
                .iter()
                .find(|m| m.source_version() == version)
                .ok_or(MigrationError::NoPath(current, target))?;
            step.migrate(&mut snapshot)?;
            version = step.target_version();
            if let Some(obj) = snapshot.as_object_mut() {
                obj.insert("v".into(), version.into());
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;

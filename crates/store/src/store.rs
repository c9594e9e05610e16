// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The State Store (C9) proper: write-ahead log, materialized projection,
//! and snapshot persistence wired together behind one handle.
//!
//! Every mutation is appended to the log, folded into the projection, and
//! bumps `version` in a single call — there is no path that updates one
//! without the other two (§4.9 "single atomic update" contract).

use std::path::{Path, PathBuf};

use nixfleet_core::{Command, Mutation, StateVersion};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::migration::{MigrationRegistry, CURRENT_SNAPSHOT_VERSION};
use crate::state::MaterializedState;
use crate::wal::Wal;

const SNAPSHOT_FILE: &str = "snapshot.json";
const WAL_FILE: &str = "store.wal";

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    v: u32,
    wal_seq: u64,
    version: StateVersion,
    state: MaterializedState,
}

pub struct Store {
    wal: Wal,
    state: MaterializedState,
    version: StateVersion,
    snapshot_path: PathBuf,
}

impl Store {
    /// Opens (or creates) the store rooted at `data_dir`: loads the latest
    /// snapshot if one exists, migrating it to the current schema, then
    /// replays every write-ahead log entry the snapshot hadn't captured yet.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        let wal_path = data_dir.join(WAL_FILE);

        let (state, version, wal_seq) = if snapshot_path.exists() {
            let raw = std::fs::read_to_string(&snapshot_path)?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let migrated = MigrationRegistry::new().migrate_to(value, CURRENT_SNAPSHOT_VERSION)?;
            let snapshot: Snapshot = serde_json::from_value(migrated)?;
            (snapshot.state, snapshot.version, snapshot.wal_seq)
        } else {
            (MaterializedState::default(), 0, 0)
        };

        let mut wal = Wal::open(&wal_path, wal_seq)?;
        let mut state = state;
        let mut version = version;
        let mut replayed = 0u64;

        while let Some(entry) = wal.next_unprocessed()? {
            if !matches!(entry.mutation, Mutation::Shutdown | Mutation::Custom) {
                state.apply_mutation(&entry.mutation);
                version += 1;
            }
            wal.mark_processed(entry.seq);
            replayed += 1;
        }

        if replayed > 0 {
            tracing::info!(replayed, version, "replayed write-ahead log entries on open");
        }

        Ok(Self { wal, state, version, snapshot_path })
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    pub fn version(&self) -> StateVersion {
        self.version
    }

    /// Journals `mutation`, folds it into the projection, and increments
    /// `version` — the single atomic update §4.9 requires. Returns the new
    /// version.
    pub fn apply(&mut self, mutation: Mutation) -> Result<StateVersion, StoreError> {
        let seq = self.wal.append(&mutation)?;
        if self.wal.needs_flush() {
            self.wal.flush()?;
        }
        self.state.apply_mutation(&mutation);
        self.wal.mark_processed(seq);
        self.version += 1;
        Ok(self.version)
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.wal.flush()
    }

    /// `GetOrphanedCommands` (§4.9): commands that could not have survived a
    /// restart honestly. The Recovery Supervisor (C12) drives the transition
    /// to `ORPHANED`; this only reports the candidates.
    pub fn orphaned_commands(&self) -> Vec<&Command> {
        self.state
            .commands
            .values()
            .filter(|c| c.status == nixfleet_core::OpStatus::Executing)
            .collect()
    }

    /// Writes a snapshot of the current projection and discards the log
    /// entries it captures (§4.9 `truncate_before`), bounding log growth.
    pub fn snapshot(&mut self) -> Result<(), StoreError> {
        self.wal.flush()?;
        let snapshot = Snapshot {
            v: CURRENT_SNAPSHOT_VERSION,
            wal_seq: self.wal.write_seq(),
            version: self.version,
            state: self.state.clone(),
        };
        let tmp_path = self.snapshot_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serde_json::to_vec_pretty(&snapshot)?)?;
        std::fs::rename(&tmp_path, &self.snapshot_path)?;
        self.wal.truncate_before(self.wal.processed_seq() + 1)?;
        tracing::info!(version = self.version, "wrote state store snapshot");
        Ok(())
    }

    /// Background retention sweep (§4.9): deletes commands and pipelines in
    /// a terminal state older than `command_pipeline_max_age_ms`, and events
    /// older than `event_max_age_ms`. Not journaled — a crash mid-sweep just
    /// means the next scheduled sweep repeats the same, idempotent filter.
    pub fn sweep_retention(&mut self, now_epoch_ms: u64, command_pipeline_max_age_ms: u64, event_max_age_ms: u64) {
        self.state.commands.retain(|_, c| {
            let age = reference_age(c.finished_at_epoch_ms, c.created_at_epoch_ms, now_epoch_ms);
            !(c.status.is_terminal() && age > command_pipeline_max_age_ms)
        });
        self.state.pipelines.retain(|_, p| {
            let age = reference_age(p.finished_at_epoch_ms, p.created_at_epoch_ms, now_epoch_ms);
            !(p.status.is_terminal() && age > command_pipeline_max_age_ms)
        });
        self.state
            .events
            .retain(|e| now_epoch_ms.saturating_sub(e.timestamp_epoch_ms) <= event_max_age_ms);
    }
}

fn reference_age(finished_at: Option<u64>, created_at: u64, now: u64) -> u64 {
    now.saturating_sub(finished_at.unwrap_or(created_at))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

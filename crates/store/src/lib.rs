// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nixfleet-store: the State Store (C9) — write-ahead log, materialized
//! projection, snapshot persistence, and retention — doubling as the
//! durable half of the Host State Index (C7).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod migration;
mod state;
mod store;
mod wal;

pub use error::StoreError;
pub use migration::{Migration, MigrationError, MigrationRegistry, CURRENT_SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use store::Store;
pub use wal::{Entry, Wal};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nixfleet-agent: the per-host agent. Owns the Isolated Repo Manager (C3),
//! the Command Executor (C4), the Heartbeat Loop (C5), the Freshness
//! Reporter (C6), and the transport client that carries all of it to the
//! Dashboard over `/ws`.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod error;
pub mod executor;
pub mod freshness;
pub mod heartbeat;
pub mod repo;
pub mod subprocess;
pub mod transport;

pub use error::AgentError;
pub use executor::CommandExecutor;
pub use repo::RepoManager;

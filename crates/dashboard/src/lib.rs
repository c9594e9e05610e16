// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nixfleet-dashboard: the central coordination kernel. Owns the Transport
//! Hub (C2), the Command State Machine (C8), the State Store's retention and
//! recovery lifecycle, and the Sync Manager (C10) that keeps browser UIs in
//! step with it.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod command_machine;
pub mod control_server;
pub mod env;
pub mod error;
pub mod hub;
pub mod pipeline_runner;
pub mod recovery;
pub mod sync;

pub use error::DashboardError;
pub use hub::{ClientKind, ConnectionId, ConnectionRegistry, Hub};

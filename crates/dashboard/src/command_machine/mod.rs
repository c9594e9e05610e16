// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Command State Machine (C8): the per-command lifecycle from a
//! dispatched op to one of its terminal states (§4.8).
//!
//! Every sub-decision is a pure function in its own submodule so it's
//! testable without a live host, a socket, or the store: [`preconditions`]
//! gates dispatch, [`timeouts`] tables the per-op warning/hard/reconnect
//! windows, [`reconnect`] resolves the freshness comparison after an
//! agent-restarting op's reconnect, [`postconditions`] scores the terminal
//! outcome, and [`reboot`] flags when a command's host dropped out from
//! under it. The module that actually walks a `Command` through the store
//! one mutation at a time is left for the binary's runtime loop to drive;
//! this crate only has to get the decisions right.

pub mod postconditions;
pub mod preconditions;
pub mod reboot;
pub mod reconnect;
pub mod timeouts;

pub use postconditions::PostConditionOutcome;
pub use preconditions::PreconditionRejection;
pub use reconnect::reconnect_outcome;
pub use timeouts::TimeoutTiers;

use nixfleet_core::{Command, Host, HostSnapshot, Mutation, Op, OpStatus};
use nixfleet_store::Store;

use crate::error::DashboardError;

/// Runs the pre-condition check (§4.8.1) and, if it passes, creates the
/// command and snapshots the host (§4.8.2) in one store transaction. Returns
/// the created command; the caller still owns actually sending it over the
/// hub connection and moving the command to `EXECUTING` once the agent acks.
pub fn dispatch(
    store: &mut Store,
    host: &Host,
    op: Op,
    command_pending: bool,
    now_epoch_ms: u64,
) -> Result<Command, DashboardError> {
    preconditions::validate(host, op, command_pending)
        .map_err(|rejection| DashboardError::CommandRejected(rejection.code, rejection.message))?;

    let mut command = Command::new(host.hostname.clone(), op, now_epoch_ms);
    command.status = OpStatus::Validating;
    store.apply(Mutation::CommandCreated { command: Box::new(command.clone()) })?;

    command.status = OpStatus::Queued;
    store.apply(Mutation::CommandStatusChanged {
        id: command.id,
        status: OpStatus::Queued,
        started_at_epoch_ms: None,
        finished_at_epoch_ms: None,
        exit_code: None,
        error: None,
    })?;

    Ok(command)
}

/// Captures the [`HostSnapshot`] the post-condition step will diff against,
/// on entry to `EXECUTING` (§4.8.2).
pub fn snapshot_host(host: &Host) -> HostSnapshot {
    HostSnapshot {
        generation: host.generation.clone(),
        agent_version: host.agent_version.clone(),
        freshness: host.freshness.clone(),
        git_status: host.git_status.clone(),
        system_status: host.system_status.clone(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Recovery Supervisor (C12): startup reconciliation and the runtime
//! orphan detector (§4.12).
//!
//! At startup, every command the store reports as `EXECUTING` could not have
//! survived the restart honestly — no in-process executor is tracking it
//! anymore — so it's forced to `ORPHANED` before anything else runs. At
//! runtime, the same fate eventually catches commands whose agent connection
//! dropped without ever reporting a terminal `status`.

use nixfleet_core::{Event, EventLevel, Mutation, OpStatus};
use nixfleet_store::Store;
use tracing::warn;

use crate::error::DashboardError;

/// Forces every `EXECUTING` command found at startup to `ORPHANED` and
/// journals one audit event per command. Returns the number reconciled.
pub fn reconcile_startup(store: &mut Store, now_epoch_ms: u64) -> Result<usize, DashboardError> {
    let orphaned_ids: Vec<_> = store.orphaned_commands().iter().map(|c| c.id).collect();

    for id in &orphaned_ids {
        store.apply(Mutation::CommandStatusChanged {
            id: *id,
            status: OpStatus::Orphaned,
            started_at_epoch_ms: None,
            finished_at_epoch_ms: Some(now_epoch_ms),
            exit_code: None,
            error: Some("command was executing when the dashboard restarted".to_string()),
        })?;
        store.apply(Mutation::EventLogged {
            event: Box::new(
                Event::new(
                    "recovery",
                    EventLevel::Warn,
                    format!("command {id} orphaned by restart"),
                    now_epoch_ms,
                )
                .with_actor("recovery_supervisor"),
            ),
        })?;
        warn!(command_id = %id, "orphaned command found at startup");
    }

    Ok(orphaned_ids.len())
}

/// The runtime orphan horizon (§4.12): a command `EXECUTING` longer than
/// `multiplier * hard_timeout` without a terminal `status` is declared dead
/// even though its connection never dropped — the agent may be wedged.
pub fn orphan_horizon_ms(hard_timeout_ms: u64, multiplier: u64) -> u64 {
    hard_timeout_ms.saturating_mul(multiplier)
}

/// True once `started_at_epoch_ms` is further in the past than the orphan
/// horizon. Only meaningful for commands already in `EXECUTING` — the caller
/// is responsible for that filter.
pub fn past_orphan_horizon(started_at_epoch_ms: u64, now_epoch_ms: u64, horizon_ms: u64) -> bool {
    now_epoch_ms.saturating_sub(started_at_epoch_ms) > horizon_ms
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;

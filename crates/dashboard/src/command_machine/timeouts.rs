// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout tiers per op (§4.8.3): a warning threshold, a hard threshold, and,
//! for agent-restarting ops, a reconnect window layered on top of the hard
//! threshold.

use std::time::Duration;

use nixfleet_core::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutTiers {
    pub warning: Duration,
    pub hard: Duration,
    pub reconnect: Option<Duration>,
}

impl TimeoutTiers {
    /// Returns a copy with `extra` added to both thresholds, per the
    /// **Extend** action (§4.8.3): cumulative, affects only this command.
    pub fn extended_by(self, extra: Duration) -> Self {
        Self { warning: self.warning + extra, hard: self.hard + extra, reconnect: self.reconnect }
    }
}

const MINUTE: u64 = 60;

/// Default tiers for `op`, or `None` for ops the timeout machinery doesn't
/// track (the control ops: `stop`, the `refresh-*` family).
pub fn timeout_tiers(op: Op) -> Option<TimeoutTiers> {
    match op {
        Op::Pull => Some(TimeoutTiers {
            warning: Duration::from_secs(2 * MINUTE),
            hard: Duration::from_secs(5 * MINUTE),
            reconnect: None,
        }),
        Op::Switch => Some(TimeoutTiers {
            warning: Duration::from_secs(10 * MINUTE),
            hard: Duration::from_secs(30 * MINUTE),
            reconnect: Some(Duration::from_secs(90)),
        }),
        Op::PullSwitch => Some(TimeoutTiers {
            warning: Duration::from_secs(12 * MINUTE),
            hard: Duration::from_secs(35 * MINUTE),
            reconnect: Some(Duration::from_secs(90)),
        }),
        Op::Test => Some(TimeoutTiers {
            warning: Duration::from_secs(5 * MINUTE),
            hard: Duration::from_secs(10 * MINUTE),
            reconnect: None,
        }),
        Op::Rollback => Some(TimeoutTiers {
            warning: Duration::from_secs(5 * MINUTE),
            hard: Duration::from_secs(10 * MINUTE),
            reconnect: Some(Duration::from_secs(90)),
        }),
        Op::Stop | Op::RefreshLock | Op::RefreshSystem | Op::RefreshAll => None,
    }
}

#[cfg(test)]
#[path = "timeouts_tests.rs"]
mod tests;

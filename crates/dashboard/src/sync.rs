// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Sync Manager (C10): keeps every browser connection's view converged
//! on the State Store's projection via `init` on connect, `delta` on every
//! mutation, and a `sync` beacon as the drift-recovery rail (§4.10).

use nixfleet_core::{Command, Event, Host, Pipeline, StateVersion};
use nixfleet_wire::{Change, FullState, Message};

use crate::hub::ConnectionId;

/// Builds the `init` frame sent to a browser the instant its connection
/// upgrades. `full_state` is the caller's already-filtered view (active +
/// recent commands/pipelines, last N events per §4.9) — this function only
/// shapes the envelope.
pub fn init_message(version: StateVersion, hosts: Vec<Host>, pipelines: Vec<Pipeline>) -> Message {
    Message::Init { version, full_state: Box::new(FullState { hosts, pipelines }) }
}

/// Builds the `delta` frame broadcast to every connected browser after one
/// mutation lands in the store.
pub fn delta_message(version: StateVersion, change: Change) -> Message {
    Message::Delta { version, change }
}

/// Builds the periodic `sync` beacon (§4.10, default 30s): carries only the
/// current version, never a payload — browsers compare it against their own
/// and request `get_state` on mismatch.
pub fn beacon_message(version: StateVersion) -> Message {
    Message::Sync { version }
}

/// Builds the `full_state` response to a browser's `get_state` request.
pub fn full_state_message(version: StateVersion, hosts: Vec<Host>, pipelines: Vec<Pipeline>) -> Message {
    Message::FullState { version, full_state: Box::new(FullState { hosts, pipelines }) }
}

pub fn host_added(host: Host) -> Change {
    Change::HostAdded { host: Box::new(host) }
}

pub fn host_removed(hostname: impl Into<String>) -> Change {
    Change::HostRemoved { id: hostname.into() }
}

pub fn command_updated(command: Command) -> Change {
    Change::CommandUpdated { command: Box::new(command) }
}

pub fn pipeline_updated(pipeline: Pipeline) -> Change {
    Change::PipelineUpdated { pipeline: Box::new(pipeline) }
}

pub fn event_logged(event: Event) -> Change {
    Change::EventLogged { event: Box::new(event) }
}

/// A delta at or below a browser's last known version carries nothing new —
/// the browser safely ignores it (§4.10 ordering rule). Exposed here too so
/// the broadcaster can skip waking an already-converged connection.
pub fn should_apply_delta(browser_known_version: StateVersion, delta_version: StateVersion) -> bool {
    delta_version > browser_known_version
}

/// Per-browser bookkeeping: the version last shipped to each connection, so
/// the broadcaster knows which connections are behind when deciding whether
/// a beacon round-trip is actually needed.
#[derive(Default)]
pub struct SyncTracker {
    last_version_sent: std::collections::HashMap<ConnectionId, StateVersion>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&mut self, id: ConnectionId, version: StateVersion) {
        self.last_version_sent.insert(id, version);
    }

    pub fn forget(&mut self, id: ConnectionId) {
        self.last_version_sent.remove(&id);
    }

    pub fn last_sent(&self, id: ConnectionId) -> Option<StateVersion> {
        self.last_version_sent.get(&id).copied()
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;

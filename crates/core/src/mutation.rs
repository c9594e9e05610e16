// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutations that trigger state transitions in the State Store (C9, §4.9).
//!
//! Serializes with `{"type": "mutation:name", ...fields}` format. Unknown
//! type tags deserialize to `Custom` so a newer dashboard build's write-ahead
//! log stays readable by an older one during a rolling upgrade.
//!
//! This is the durable half of every change to [`crate::Host`], [`Command`](crate::Command),
//! [`Pipeline`](crate::Pipeline), and the audit [`Event`](crate::Event) — the write-ahead
//! log is a sequence of these, and the Host State Index / command and pipeline
//! tables are projections folded from them with [apply semantics the store
//! defines](https://en.wikipedia.org/wiki/Event_sourcing). Applying the same
//! mutation twice must be a no-op beyond the first application (§4.9
//! idempotency requirement) — every handler is written as an upsert, never a
//! delta-from-previous computation.

use serde::{Deserialize, Serialize};

use crate::command::{CommandId, OpStatus};
use crate::event::Event as AuditEvent;
use crate::freshness::Freshness;
use crate::host::{HostType, StatusValue};
use crate::pipeline::{Pipeline, PipelineId, PipelineStatus};
use crate::Command;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    #[serde(rename = "host:registered")]
    HostRegistered {
        hostname: String,
        host_type: HostType,
        agent_version: String,
        os_version: String,
        generation: String,
        heartbeat_interval_s: u64,
        freshness: Freshness,
        now_epoch_ms: u64,
    },

    #[serde(rename = "host:heartbeat")]
    HostHeartbeat {
        hostname: String,
        generation: String,
        freshness: Freshness,
        now_epoch_ms: u64,
    },

    #[serde(rename = "host:status_updated")]
    HostStatusUpdated {
        hostname: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        git_status: Option<StatusValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lock_status: Option<StatusValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_status: Option<StatusValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tests_status: Option<StatusValue>,
    },

    #[serde(rename = "host:removed")]
    HostRemoved { hostname: String },

    #[serde(rename = "command:created")]
    CommandCreated { command: Box<Command> },

    #[serde(rename = "command:status_changed")]
    CommandStatusChanged {
        id: CommandId,
        status: OpStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        started_at_epoch_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finished_at_epoch_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    #[serde(rename = "command:output_file_set")]
    CommandOutputFileSet { id: CommandId, output_file: String },

    #[serde(rename = "pipeline:created")]
    PipelineCreated { pipeline: Box<Pipeline> },

    #[serde(rename = "pipeline:stage_advanced")]
    PipelineStageAdvanced { id: PipelineId, current_stage: usize },

    #[serde(rename = "pipeline:status_changed")]
    PipelineStatusChanged {
        id: PipelineId,
        status: PipelineStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finished_at_epoch_ms: Option<u64>,
    },

    #[serde(rename = "event:logged")]
    EventLogged { event: Box<AuditEvent> },

    /// Control mutation: persisted so the write-ahead log records a clean
    /// shutdown point, but the store's replay loop skips it rather than
    /// folding it into the projection.
    #[serde(rename = "system:shutdown")]
    Shutdown,

    /// Catch-all for unknown mutation types (forward compatibility).
    #[serde(other, skip_serializing)]
    Custom,
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Command entity and the Command State Machine's state enum (§3.1, §4.8).

use serde::{Deserialize, Serialize};

use crate::freshness::Freshness;
use crate::host::StatusValue;
use crate::{define_id, PipelineId};

define_id! {
    /// Opaque unique command identifier (§6.5). Lexicographic comparison is
    /// never meaningful.
    pub struct CommandId("cmd-");
}

/// Operations dispatchable against a host (§4.1, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    Pull,
    Switch,
    PullSwitch,
    Test,
    Stop,
    Rollback,
    RefreshLock,
    RefreshSystem,
    RefreshAll,
}

impl Op {
    /// Ops that restart the agent process and therefore require reconnect
    /// verification (§4.8.3, §4.8.4) rather than an in-band terminal `status`.
    pub fn restarts_agent(self) -> bool {
        matches!(self, Op::Switch | Op::PullSwitch | Op::Rollback)
    }

    pub fn as_wire_str(self) -> &'static str {
        match self {
            Op::Pull => "pull",
            Op::Switch => "switch",
            Op::PullSwitch => "pull-switch",
            Op::Test => "test",
            Op::Stop => "stop",
            Op::Rollback => "rollback",
            Op::RefreshLock => "refresh-lock",
            Op::RefreshSystem => "refresh-system",
            Op::RefreshAll => "refresh-all",
        }
    }
}

/// Every state the Command State Machine can report for a command (§4.8).
///
/// `status` is monotonic across the chain documented on [`Command`]; terminal
/// variants (see [`OpStatus::is_terminal`]) never transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpStatus {
    Created,
    Validating,
    Queued,
    Executing,
    AwaitingReconnect,
    TimeoutPending,
    Killing,
    AbortedByReboot,

    Success,
    Error,
    Timeout,
    Skipped,
    Blocked,
    Killed,
    KillFailed,
    StaleBinary,
    Suspicious,
    Ignored,
    Orphaned,
    Cleanup,
}

impl OpStatus {
    /// Terminal states never transition further (§3.1 invariant).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OpStatus::Success
                | OpStatus::Error
                | OpStatus::Timeout
                | OpStatus::Skipped
                | OpStatus::Blocked
                | OpStatus::Killed
                | OpStatus::KillFailed
                | OpStatus::StaleBinary
                | OpStatus::Suspicious
                | OpStatus::Ignored
                | OpStatus::Orphaned
                | OpStatus::Cleanup
        )
    }
}

/// A command against one host, owned by the State Store (§3.2); C8/C11 hold
/// references by id and mutate only through the store so every change
/// increments `StateVersion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    pub host_id: String,
    pub op: Op,
    #[serde(default)]
    pub pipeline_id: Option<PipelineId>,
    pub status: OpStatus,
    pub created_at_epoch_ms: u64,
    #[serde(default)]
    pub started_at_epoch_ms: Option<u64>,
    #[serde(default)]
    pub finished_at_epoch_ms: Option<u64>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
}

impl Command {
    pub fn new(host_id: impl Into<String>, op: Op, created_at_epoch_ms: u64) -> Self {
        Self {
            id: CommandId::new(),
            host_id: host_id.into(),
            op,
            pipeline_id: None,
            status: OpStatus::Created,
            created_at_epoch_ms,
            started_at_epoch_ms: None,
            finished_at_epoch_ms: None,
            exit_code: None,
            error: None,
            output_file: None,
        }
    }
}

/// Frozen host state captured the instant a command enters `EXECUTING`
/// (§4.8.2). The only source of truth for post-conditions — reading "current"
/// host state after a reconnect is unreliable, since the reconnect itself may
/// be the event under evaluation.
///
/// `git_status`/`system_status` are the pre-command halves of the combined
/// "update_status" this snapshot freezes; post-conditions (§4.8.5) diff the
/// post-command host record against these two fields rather than a single
/// opaque blob, since `pull` only cares about the former and `switch` only
/// about the latter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub generation: String,
    pub agent_version: String,
    pub freshness: Freshness,
    pub git_status: StatusValue,
    pub system_status: StatusValue,
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-condition validators for the Command State Machine (§4.8.1): pure
//! functions of a `Host` snapshot and an `Op` that never mutate state and
//! always return the same verdict for identical inputs.

use nixfleet_core::{Host, Op, StatusKind};

/// One of the reject codes named in the pre-condition table (§4.8.1), plus a
/// human-readable message for the command's `error` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreconditionRejection {
    pub code: &'static str,
    pub message: String,
}

fn reject(code: &'static str, message: impl Into<String>) -> PreconditionRejection {
    PreconditionRejection { code, message: message.into() }
}

fn pull_valid(host: &Host) -> bool {
    matches!(host.git_status.status, StatusKind::Outdated | StatusKind::Unknown)
}

fn switch_valid(host: &Host) -> bool {
    host.git_status.status == StatusKind::Ok
        && (host.system_status.status == StatusKind::Outdated || host.agent_outdated)
}

/// Validates `op` against `host`, given whether a command is already pending
/// for it. `Ok(())` means dispatch may proceed to the snapshot+execute step
/// (§4.8.2); `Err` carries the reject code the caller journals verbatim.
pub fn validate(host: &Host, op: Op, command_pending: bool) -> Result<(), PreconditionRejection> {
    if !host.online {
        return Err(reject("host_offline", format!("{} is not online", host.hostname)));
    }
    if command_pending {
        return Err(reject("command_pending", format!("{} already has a command pending", host.hostname)));
    }

    match op {
        Op::Pull => {
            if pull_valid(host) {
                Ok(())
            } else {
                Err(reject("already_current", "git is already up to date"))
            }
        }
        Op::Switch => {
            if switch_valid(host) {
                Ok(())
            } else if host.git_status.status != StatusKind::Ok {
                Err(reject("git_outdated", "git must be pulled before switching"))
            } else {
                Err(reject("already_current", "system is already up to date"))
            }
        }
        Op::PullSwitch => {
            if pull_valid(host) || switch_valid(host) {
                Ok(())
            } else {
                Err(reject("already_current", "nothing to pull or switch"))
            }
        }
        Op::Test | Op::Rollback | Op::Stop | Op::RefreshLock | Op::RefreshSystem | Op::RefreshAll => Ok(()),
    }
}

#[cfg(test)]
#[path = "preconditions_tests.rs"]
mod tests;

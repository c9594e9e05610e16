// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-condition evaluation after a command's terminal `status` (§4.8.5).
//! The snapshot taken at `EXECUTING` entry (§4.8.2) is the only source of
//! truth to diff against — host state observed after a reconnect may itself
//! be the thing under evaluation.

use nixfleet_core::{HostSnapshot, Op, StatusKind, StatusValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostConditionOutcome {
    Success,
    /// `pull`: generation advanced but `git_status` still isn't `ok` (stale
    /// cache); `switch`/`pull-switch`: the op's one-sided goal didn't land.
    SuccessPartial,
    /// `pull-switch` only: git landed, system didn't.
    SuccessPartialGitOnly,
    /// `pull-switch` only: system landed, git didn't.
    SuccessPartialSystemOnly,
    Error,
}

/// Evaluates the post-condition for `op` given its exit code and the fresh
/// host state observed after terminal `status`. `generation_changed` is
/// `pre.generation != post host generation`, passed in rather than recomputed
/// here since the caller already holds both generations.
pub fn evaluate(
    op: Op,
    exit_code: i32,
    pre: &HostSnapshot,
    post_git_status: &StatusValue,
    post_system_status: &StatusValue,
    generation_changed: bool,
) -> PostConditionOutcome {
    let _ = pre;
    if exit_code != 0 {
        return PostConditionOutcome::Error;
    }

    let git_ok = post_git_status.status == StatusKind::Ok;
    let system_ok = post_system_status.status == StatusKind::Ok;

    match op {
        Op::Pull => {
            if git_ok && generation_changed {
                PostConditionOutcome::Success
            } else {
                PostConditionOutcome::SuccessPartial
            }
        }
        Op::Switch => {
            if system_ok {
                PostConditionOutcome::Success
            } else {
                PostConditionOutcome::SuccessPartial
            }
        }
        Op::PullSwitch => match (git_ok, system_ok) {
            (true, true) => PostConditionOutcome::Success,
            (true, false) => PostConditionOutcome::SuccessPartialGitOnly,
            (false, true) => PostConditionOutcome::SuccessPartialSystemOnly,
            (false, false) => PostConditionOutcome::SuccessPartial,
        },
        Op::Test | Op::Stop | Op::Rollback | Op::RefreshLock | Op::RefreshSystem | Op::RefreshAll => {
            PostConditionOutcome::Success
        }
    }
}

#[cfg(test)]
#[path = "postconditions_tests.rs"]
mod tests;

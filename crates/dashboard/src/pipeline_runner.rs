// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Pipeline Runner (C11): stage-by-stage dispatch across many hosts
//! (§4.11). Like the Command State Machine, the decision of what to do next
//! is a pure function; walking a live `Pipeline` through the store one
//! mutation at a time is left to the binary's runtime loop.

use nixfleet_core::{OnStageFailure, PipelineStatus};

/// What the runner does after a stage finishes dispatching, given whether
/// every host in that stage reached a successful terminal command state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDecision {
    /// Advance to the named (0-based) stage index and dispatch it.
    Advance(usize),
    /// No more stages remain and nothing ever failed.
    Terminal(PipelineStatus),
}

/// Decides the next step after stage `current_stage` (0-based, out of
/// `total_stages`) finishes, given whether every host in it succeeded and
/// whether an earlier stage in this pipeline already failed.
///
/// `on_stage_failure = Stop` ends the pipeline at the first failing stage
/// regardless of position; `Continue` keeps dispatching remaining stages but
/// the pipeline can never reach `COMPLETE` once any stage has failed — it
/// settles on `PARTIAL` instead (§4.11, §9 Open Question).
pub fn decide(
    current_stage: usize,
    total_stages: usize,
    stage_all_succeeded: bool,
    had_failure_so_far: bool,
    on_stage_failure: OnStageFailure,
) -> StageDecision {
    let had_failure_so_far = had_failure_so_far || !stage_all_succeeded;

    if !stage_all_succeeded && on_stage_failure == OnStageFailure::Stop {
        return StageDecision::Terminal(PipelineStatus::Failed);
    }

    let is_last_stage = current_stage + 1 >= total_stages;
    if is_last_stage {
        let status = if had_failure_so_far { PipelineStatus::Partial } else { PipelineStatus::Complete };
        StageDecision::Terminal(status)
    } else {
        StageDecision::Advance(current_stage + 1)
    }
}

#[cfg(test)]
#[path = "pipeline_runner_tests.rs"]
mod tests;

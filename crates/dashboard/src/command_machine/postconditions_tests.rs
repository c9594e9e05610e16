// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nixfleet_core::Freshness;

fn snapshot() -> HostSnapshot {
    HostSnapshot {
        generation: "abc1234".to_string(),
        agent_version: "1.0.0".to_string(),
        freshness: Freshness::unknown(),
        git_status: status(StatusKind::Outdated),
        system_status: status(StatusKind::Outdated),
    }
}

fn status(kind: StatusKind) -> StatusValue {
    StatusValue { status: kind, message: String::new(), checked_at_epoch_ms: 0 }
}

#[test]
fn nonzero_exit_is_always_error() {
    let outcome = evaluate(Op::Pull, 1, &snapshot(), &status(StatusKind::Ok), &status(StatusKind::Ok), true);
    assert_eq!(outcome, PostConditionOutcome::Error);
}

#[test]
fn pull_full_success_requires_ok_status_and_new_generation() {
    let outcome = evaluate(Op::Pull, 0, &snapshot(), &status(StatusKind::Ok), &status(StatusKind::Outdated), true);
    assert_eq!(outcome, PostConditionOutcome::Success);
}

#[test]
fn pull_partial_when_generation_moved_but_status_still_outdated() {
    let outcome =
        evaluate(Op::Pull, 0, &snapshot(), &status(StatusKind::Outdated), &status(StatusKind::Outdated), true);
    assert_eq!(outcome, PostConditionOutcome::SuccessPartial);
}

#[test]
fn switch_success_requires_system_ok() {
    let outcome = evaluate(Op::Switch, 0, &snapshot(), &status(StatusKind::Ok), &status(StatusKind::Ok), false);
    assert_eq!(outcome, PostConditionOutcome::Success);
}

#[test]
fn switch_partial_when_system_not_ok() {
    let outcome =
        evaluate(Op::Switch, 0, &snapshot(), &status(StatusKind::Ok), &status(StatusKind::Outdated), false);
    assert_eq!(outcome, PostConditionOutcome::SuccessPartial);
}

#[yare::parameterized(
    both_ok = { StatusKind::Ok, StatusKind::Ok, PostConditionOutcome::Success },
    git_only = { StatusKind::Ok, StatusKind::Outdated, PostConditionOutcome::SuccessPartialGitOnly },
    system_only = { StatusKind::Outdated, StatusKind::Ok, PostConditionOutcome::SuccessPartialSystemOnly },
    neither = { StatusKind::Outdated, StatusKind::Outdated, PostConditionOutcome::SuccessPartial },
)]
fn pull_switch_reports_which_half_landed(git: StatusKind, system: StatusKind, expected: PostConditionOutcome) {
    let outcome = evaluate(Op::PullSwitch, 0, &snapshot(), &status(git), &status(system), true);
    assert_eq!(outcome, expected);
}

#[test]
fn test_op_succeeds_on_zero_exit() {
    let outcome = evaluate(Op::Test, 0, &snapshot(), &status(StatusKind::Ok), &status(StatusKind::Ok), false);
    assert_eq!(outcome, PostConditionOutcome::Success);
}

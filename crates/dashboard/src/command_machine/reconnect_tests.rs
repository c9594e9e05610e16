// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    fresh = { FreshnessVerdict::Fresh, OpStatus::Success },
    suspicious = { FreshnessVerdict::Suspicious, OpStatus::Suspicious },
    stale = { FreshnessVerdict::Stale, OpStatus::StaleBinary },
)]
fn decisive_verdicts_resolve_regardless_of_timer(verdict: FreshnessVerdict, expected: OpStatus) {
    assert_eq!(reconnect_outcome(verdict, false), Some(expected));
    assert_eq!(reconnect_outcome(verdict, true), Some(expected));
}

#[test]
fn unknown_verdict_waits_for_the_reconnect_timer() {
    assert_eq!(reconnect_outcome(FreshnessVerdict::Unknown, false), None);
}

#[test]
fn unknown_verdict_resolves_to_success_once_the_timer_elapses() {
    assert_eq!(reconnect_outcome(FreshnessVerdict::Unknown, true), Some(OpStatus::Success));
}

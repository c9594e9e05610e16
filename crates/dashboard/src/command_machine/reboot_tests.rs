// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn indicator_alone_is_sufficient() {
    assert!(detected_reboot(Some(true), Duration::from_secs(1), DEFAULT_REBOOT_THRESHOLD));
}

#[test]
fn elapsed_gap_alone_is_sufficient() {
    assert!(detected_reboot(None, DEFAULT_REBOOT_THRESHOLD + Duration::from_secs(1), DEFAULT_REBOOT_THRESHOLD));
}

#[test]
fn neither_condition_means_no_reboot() {
    assert!(!detected_reboot(Some(false), Duration::from_secs(1), DEFAULT_REBOOT_THRESHOLD));
}

#[test]
fn gap_exactly_at_threshold_does_not_count() {
    assert!(!detected_reboot(None, DEFAULT_REBOOT_THRESHOLD, DEFAULT_REBOOT_THRESHOLD));
}

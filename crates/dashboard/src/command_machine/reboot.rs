// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reboot detection (§4.8.6, Open Question 2). A reboot is detected either by
//! an explicit indicator in the first post-reboot heartbeat or by a heartbeat
//! gap past `reboot_threshold` on its own — the indicator only shortens
//! detection, it's never required.

use std::time::Duration;

pub const DEFAULT_REBOOT_THRESHOLD: Duration = Duration::from_secs(180);

pub fn detected_reboot(rebooted_indicator: Option<bool>, heartbeat_gap: Duration, reboot_threshold: Duration) -> bool {
    rebooted_indicator == Some(true) || heartbeat_gap > reboot_threshold
}

#[cfg(test)]
#[path = "reboot_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nixfleet_core::{Freshness, HostType, StatusKind, StatusValue};
use tempfile::tempdir;

fn status(kind: StatusKind) -> StatusValue {
    StatusValue { status: kind, message: String::new(), checked_at_epoch_ms: 0 }
}

fn online_host() -> Host {
    Host {
        hostname: "box1".to_string(),
        host_type: HostType::Nixos,
        agent_version: "1.0.0".to_string(),
        freshness: Freshness::unknown(),
        os_version: "24.05".to_string(),
        generation: "abc1234".to_string(),
        heartbeat_interval_s: 30,
        online: true,
        last_seen_epoch_ms: 0,
        agent_outdated: false,
        git_status: status(StatusKind::Outdated),
        lock_status: status(StatusKind::Ok),
        system_status: status(StatusKind::Ok),
        tests_status: status(StatusKind::Ok),
        theme_color: None,
        location: None,
        device_type: None,
    }
}

#[test]
fn dispatch_creates_and_queues_a_valid_command() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(dir.path()).unwrap();
    let host = online_host();

    let command = dispatch(&mut store, &host, Op::Pull, false, 1_000).unwrap();

    assert_eq!(command.status, OpStatus::Queued);
    assert_eq!(store.state().commands.get(&command.id).unwrap().status, OpStatus::Queued);
}

#[test]
fn dispatch_rejects_an_invalid_op_without_touching_the_store() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(dir.path()).unwrap();
    let mut host = online_host();
    host.git_status = status(StatusKind::Ok);

    let err = dispatch(&mut store, &host, Op::Pull, false, 1_000).unwrap_err();
    assert!(matches!(err, DashboardError::CommandRejected("already_current", _)));
    assert!(store.state().commands.is_empty());
}

#[test]
fn snapshot_host_captures_the_pre_command_fields() {
    let host = online_host();
    let snapshot = snapshot_host(&host);
    assert_eq!(snapshot.generation, host.generation);
    assert_eq!(snapshot.git_status, host.git_status);
}

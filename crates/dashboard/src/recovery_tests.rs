// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nixfleet_core::{Command, Op};
use tempfile::tempdir;

#[test]
fn reconcile_startup_orphans_every_executing_command() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(dir.path()).unwrap();

    let mut running = Command::new("box1", Op::Switch, 0);
    running.status = OpStatus::Executing;
    let running_id = running.id;
    store.apply(Mutation::CommandCreated { command: Box::new(running) }).unwrap();

    let mut done = Command::new("box2", Op::Pull, 0);
    done.status = OpStatus::Success;
    store.apply(Mutation::CommandCreated { command: Box::new(done) }).unwrap();

    let reconciled = reconcile_startup(&mut store, 1_000).unwrap();
    assert_eq!(reconciled, 1);
    assert_eq!(store.state().commands.get(&running_id).unwrap().status, OpStatus::Orphaned);
}

#[test]
fn reconcile_startup_is_a_no_op_when_nothing_was_executing() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(dir.path()).unwrap();
    assert_eq!(reconcile_startup(&mut store, 1_000).unwrap(), 0);
}

#[test]
fn orphan_horizon_is_hard_timeout_times_multiplier() {
    assert_eq!(orphan_horizon_ms(300_000, 2), 600_000);
}

#[test]
fn past_orphan_horizon_respects_the_boundary() {
    assert!(!past_orphan_horizon(0, 600_000, 600_000));
    assert!(past_orphan_horizon(0, 600_001, 600_000));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nixfleet_core::{Event, EventLevel, Freshness, HostType, Op, OpStatus};

fn freshness() -> Freshness {
    Freshness {
        source_commit: "abc1234".to_string(),
        store_path: "/nix/store/abc-nixfleet-agent".to_string(),
        binary_hash: "deadbeef".to_string(),
    }
}

fn register(hostname: &str) -> Mutation {
    Mutation::HostRegistered {
        hostname: hostname.to_string(),
        host_type: HostType::Nixos,
        agent_version: "1.0.0".to_string(),
        os_version: "24.05".to_string(),
        generation: "abc1234".to_string(),
        heartbeat_interval_s: 30,
        freshness: freshness(),
        now_epoch_ms: 1000,
    }
}

#[test]
fn host_registered_twice_is_idempotent() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&register("box1"));
    state.apply_mutation(&register("box1"));

    assert_eq!(state.hosts.len(), 1);
    assert_eq!(state.get_host("box1").unwrap().generation, "abc1234");
}

#[test]
fn host_registered_preserves_status_fields_on_reregister() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&register("box1"));
    state.apply_mutation(&Mutation::HostStatusUpdated {
        hostname: "box1".to_string(),
        git_status: Some(nixfleet_core::StatusValue {
            status: nixfleet_core::StatusKind::Ok,
            message: "clean".to_string(),
            checked_at_epoch_ms: 2000,
        }),
        lock_status: None,
        system_status: None,
        tests_status: None,
    });

    // Agent restarts and re-registers; the status the checker set must survive.
    state.apply_mutation(&register("box1"));

    assert_eq!(state.get_host("box1").unwrap().git_status.status, nixfleet_core::StatusKind::Ok);
}

#[test]
fn host_heartbeat_updates_freshness_and_online() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&register("box1"));
    state.apply_mutation(&Mutation::HostHeartbeat {
        hostname: "box1".to_string(),
        generation: "def5678".to_string(),
        freshness: freshness(),
        now_epoch_ms: 5000,
    });

    let host = state.get_host("box1").unwrap();
    assert_eq!(host.generation, "def5678");
    assert_eq!(host.last_seen_epoch_ms, 5000);
    assert!(host.online);
}

#[test]
fn host_heartbeat_for_unknown_host_is_ignored() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&Mutation::HostHeartbeat {
        hostname: "ghost".to_string(),
        generation: "def5678".to_string(),
        freshness: freshness(),
        now_epoch_ms: 5000,
    });
    assert!(state.hosts.is_empty());
}

#[test]
fn host_removed_drops_the_row() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&register("box1"));
    state.apply_mutation(&Mutation::HostRemoved { hostname: "box1".to_string() });
    assert!(state.get_host("box1").is_none());
}

#[test]
fn command_created_is_idempotent_by_id() {
    let command = Box::new(nixfleet_core::Command::new("box1", Op::Pull, 1000));
    let id = command.id;
    let mutation = Mutation::CommandCreated { command };

    let mut state = MaterializedState::default();
    state.apply_mutation(&mutation);
    state.apply_mutation(&mutation);

    assert_eq!(state.commands.len(), 1);
    assert_eq!(state.get_command(&id.to_string()).unwrap().status, OpStatus::Created);
}

#[test]
fn command_status_changed_sets_terminal_fields() {
    let command = Box::new(nixfleet_core::Command::new("box1", Op::Pull, 1000));
    let id = command.id;
    let mut state = MaterializedState::default();
    state.apply_mutation(&Mutation::CommandCreated { command });

    state.apply_mutation(&Mutation::CommandStatusChanged {
        id,
        status: OpStatus::Success,
        started_at_epoch_ms: Some(1001),
        finished_at_epoch_ms: Some(1050),
        exit_code: Some(0),
        error: None,
    });

    let command = state.commands.get(&id).unwrap();
    assert_eq!(command.status, OpStatus::Success);
    assert_eq!(command.finished_at_epoch_ms, Some(1050));
    assert_eq!(command.exit_code, Some(0));
}

#[test]
fn command_lookup_by_unique_prefix() {
    let command = Box::new(nixfleet_core::Command::new("box1", Op::Pull, 1000));
    let id = command.id;
    let mut state = MaterializedState::default();
    state.apply_mutation(&Mutation::CommandCreated { command });

    let prefix = &id.to_string()[..8];
    assert_eq!(state.get_command(prefix).unwrap().id, id);
}

#[test]
fn pipeline_stage_advanced_and_status_changed() {
    let pipeline = Box::new(nixfleet_core::Pipeline::new(
        "rollout",
        vec![nixfleet_core::Stage { hosts: vec!["box1".to_string()], op: Op::Pull }],
        1000,
    ));
    let id = pipeline.id;
    let mut state = MaterializedState::default();
    state.apply_mutation(&Mutation::PipelineCreated { pipeline });
    state.apply_mutation(&Mutation::PipelineStageAdvanced { id, current_stage: 1 });
    state.apply_mutation(&Mutation::PipelineStatusChanged {
        id,
        status: nixfleet_core::PipelineStatus::Complete,
        finished_at_epoch_ms: Some(2000),
    });

    let pipeline = state.pipelines.get(&id).unwrap();
    assert_eq!(pipeline.current_stage, 1);
    assert_eq!(pipeline.status, nixfleet_core::PipelineStatus::Complete);
}

#[test]
fn event_logged_is_append_only_and_deduplicates_by_id() {
    let event = Box::new(Event::new("host", EventLevel::Info, "registered", 1000));
    let mutation = Mutation::EventLogged { event };

    let mut state = MaterializedState::default();
    state.apply_mutation(&mutation);
    state.apply_mutation(&mutation);

    assert_eq!(state.events.len(), 1);
}

#[test]
fn shutdown_and_custom_mutations_never_touch_state() {
    let mut state = MaterializedState::default();
    state.apply_mutation(&Mutation::Shutdown);
    state.apply_mutation(&Mutation::Custom);
    assert!(state.hosts.is_empty());
    assert!(state.commands.is_empty());
}

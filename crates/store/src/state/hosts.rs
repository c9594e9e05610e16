// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host table mutations (§3.1, §4.7). Every handler is an upsert: replaying
//! the same mutation twice must leave the table exactly as it was after the
//! first application.

use nixfleet_core::{Host, Mutation, StatusValue};

use super::MaterializedState;

pub fn apply(state: &mut MaterializedState, mutation: &Mutation) {
    match mutation {
        Mutation::HostRegistered {
            hostname,
            host_type,
            agent_version,
            os_version,
            generation,
            heartbeat_interval_s,
            freshness,
            now_epoch_ms,
        } => {
            let existing = state.hosts.remove(hostname);
            let host = Host {
                hostname: hostname.clone(),
                host_type: *host_type,
                agent_version: agent_version.clone(),
                freshness: freshness.clone(),
                os_version: os_version.clone(),
                generation: generation.clone(),
                heartbeat_interval_s: *heartbeat_interval_s,
                online: true,
                last_seen_epoch_ms: *now_epoch_ms,
                agent_outdated: false,
                git_status: existing.as_ref().map(|h| h.git_status.clone()).unwrap_or_else(StatusValue::unknown),
                lock_status: existing.as_ref().map(|h| h.lock_status.clone()).unwrap_or_else(StatusValue::unknown),
                system_status: existing.as_ref().map(|h| h.system_status.clone()).unwrap_or_else(StatusValue::unknown),
                tests_status: existing.as_ref().map(|h| h.tests_status.clone()).unwrap_or_else(StatusValue::unknown),
                theme_color: existing.as_ref().and_then(|h| h.theme_color.clone()),
                location: existing.as_ref().and_then(|h| h.location.clone()),
                device_type: existing.and_then(|h| h.device_type.clone()),
            };
            state.hosts.insert(hostname.clone(), host);
        }

        Mutation::HostHeartbeat { hostname, generation, freshness, now_epoch_ms } => {
            if let Some(host) = state.hosts.get_mut(hostname) {
                host.generation = generation.clone();
                host.freshness = freshness.clone();
                host.last_seen_epoch_ms = *now_epoch_ms;
                host.online = true;
            }
        }

        Mutation::HostStatusUpdated { hostname, git_status, lock_status, system_status, tests_status } => {
            if let Some(host) = state.hosts.get_mut(hostname) {
                if let Some(value) = git_status {
                    host.git_status = value.clone();
                }
                if let Some(value) = lock_status {
                    host.lock_status = value.clone();
                }
                if let Some(value) = system_status {
                    host.system_status = value.clone();
                }
                if let Some(value) = tests_status {
                    host.tests_status = value.clone();
                }
            }
        }

        Mutation::HostRemoved { hostname } => {
            state.hosts.remove(hostname);
        }

        _ => {}
    }
}

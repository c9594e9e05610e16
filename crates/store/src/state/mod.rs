// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized projection folded from [`Mutation`] replay (§4.9): the
//! durable half of the Host State Index (C7) plus the commands, pipelines,
//! and audit log tables the State Store owns.

mod commands;
mod events;
mod helpers;
mod hosts;
mod pipelines;

use std::collections::HashMap;

use nixfleet_core::{Command, CommandId, Event, Host, Mutation, Pipeline, PipelineId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub hosts: HashMap<String, Host>,
    pub commands: HashMap<CommandId, Command>,
    pub pipelines: HashMap<PipelineId, Pipeline>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl MaterializedState {
    pub fn get_host(&self, hostname: &str) -> Option<&Host> {
        self.hosts.get(hostname)
    }

    /// Looks a command up by id or unique id prefix (§6.5: ids are opaque,
    /// but a CLI operator may still only type a few characters of one).
    pub fn get_command(&self, id: &str) -> Option<&Command> {
        helpers::find_by_prefix(&self.commands, id)
    }

    pub fn get_pipeline(&self, id: &str) -> Option<&Pipeline> {
        helpers::find_by_prefix(&self.pipelines, id)
    }

    /// Folds `mutation` into the projection.
    ///
    /// # Idempotency requirement
    ///
    /// Every handler below must leave the projection unchanged if the same
    /// mutation is applied twice in a row — replaying the tail of the
    /// write-ahead log against a snapshot taken at an uncertain commit point
    /// (§4.9) depends on it. Handlers assign fields rather than accumulate
    /// them, and guard inserts with `entry`/existence checks rather than
    /// blind pushes.
    pub fn apply_mutation(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::HostRegistered { .. }
            | Mutation::HostHeartbeat { .. }
            | Mutation::HostStatusUpdated { .. }
            | Mutation::HostRemoved { .. } => hosts::apply(self, mutation),

            Mutation::CommandCreated { .. }
            | Mutation::CommandStatusChanged { .. }
            | Mutation::CommandOutputFileSet { .. } => commands::apply(self, mutation),

            Mutation::PipelineCreated { .. }
            | Mutation::PipelineStageAdvanced { .. }
            | Mutation::PipelineStatusChanged { .. } => pipelines::apply(self, mutation),

            Mutation::EventLogged { .. } => events::apply(self, mutation),

            // Control mutation; the replay loop in Store::open skips it too,
            // but a defensive match arm here costs nothing.
            Mutation::Shutdown | Mutation::Custom => {}
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command table mutations (§3.1, §4.8).

use nixfleet_core::Mutation;

use super::MaterializedState;

pub fn apply(state: &mut MaterializedState, mutation: &Mutation) {
    match mutation {
        Mutation::CommandCreated { command } => {
            state.commands.entry(command.id).or_insert_with(|| (**command).clone());
        }

        Mutation::CommandStatusChanged { id, status, started_at_epoch_ms, finished_at_epoch_ms, exit_code, error } => {
            if let Some(command) = state.commands.get_mut(id) {
                command.status = *status;
                if let Some(v) = started_at_epoch_ms {
                    command.started_at_epoch_ms = Some(*v);
                }
                if let Some(v) = finished_at_epoch_ms {
                    command.finished_at_epoch_ms = Some(*v);
                }
                if let Some(v) = exit_code {
                    command.exit_code = Some(*v);
                }
                if let Some(v) = error {
                    command.error = Some(v.clone());
                }
            }
        }

        Mutation::CommandOutputFileSet { id, output_file } => {
            if let Some(command) = state.commands.get_mut(id) {
                command.output_file = Some(output_file.clone());
            }
        }

        _ => {}
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline table mutations (§3.1, §4.11).

use nixfleet_core::Mutation;

use super::MaterializedState;

pub fn apply(state: &mut MaterializedState, mutation: &Mutation) {
    match mutation {
        Mutation::PipelineCreated { pipeline } => {
            state.pipelines.entry(pipeline.id).or_insert_with(|| (**pipeline).clone());
        }

        Mutation::PipelineStageAdvanced { id, current_stage } => {
            if let Some(pipeline) = state.pipelines.get_mut(id) {
                pipeline.current_stage = *current_stage;
            }
        }

        Mutation::PipelineStatusChanged { id, status, finished_at_epoch_ms } => {
            if let Some(pipeline) = state.pipelines.get_mut(id) {
                pipeline.status = *status;
                if let Some(v) = finished_at_epoch_ms {
                    pipeline.finished_at_epoch_ms = Some(*v);
                }
            }
        }

        _ => {}
    }
}

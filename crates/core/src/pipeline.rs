// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Pipeline entity (§3.1, §4.11).

use serde::{Deserialize, Serialize};

use crate::command::Op;
use crate::define_id;

define_id! {
    /// Opaque unique pipeline identifier (§6.5).
    pub struct PipelineId("pln-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    Running,
    Complete,
    Partial,
    Failed,
    Cancelled,
}

impl PipelineStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PipelineStatus::Running)
    }
}

/// Resolves the "PARTIAL pipeline continuation" open question (§9, §10.5):
/// whether a stage failure stops the whole pipeline or lets remaining hosts
/// in that stage, and subsequent stages, continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnStageFailure {
    Continue,
    Stop,
}

impl Default for OnStageFailure {
    fn default() -> Self {
        OnStageFailure::Stop
    }
}

/// One `(hosts[], op)` step of a pipeline (§4.11).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub hosts: Vec<String>,
    pub op: Op,
}

/// A named ordered sequence of stages run across many hosts, owned by the
/// State Store; the runner (C11) holds only a reference by id (§3.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineId,
    pub name: String,
    pub stages: Vec<Stage>,
    pub current_stage: usize,
    pub status: PipelineStatus,
    #[serde(default)]
    pub on_stage_failure: OnStageFailure,
    pub created_at_epoch_ms: u64,
    #[serde(default)]
    pub finished_at_epoch_ms: Option<u64>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, stages: Vec<Stage>, created_at_epoch_ms: u64) -> Self {
        Self {
            id: PipelineId::new(),
            name: name.into(),
            stages,
            current_stage: 0,
            status: PipelineStatus::Running,
            on_stage_failure: OnStageFailure::default(),
            created_at_epoch_ms,
            finished_at_epoch_ms: None,
        }
    }

    /// All hosts referenced by the ordered stage list, in first-seen order.
    pub fn hosts(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for stage in &self.stages {
            for host in &stage.hosts {
                if seen.insert(host.clone()) {
                    out.push(host.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

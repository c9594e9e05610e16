// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response types for `nixfleet-cli`'s administrative control
//! channel (§1 scope: host removal and pipeline submission are the only
//! operator actions the core exposes outside the browser UI).

use nixfleet_core::{Host, Pipeline, PipelineId, Stage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    ListHosts,
    GetHost { hostname: String },
    RemoveHost { hostname: String },
    ListPipelines,
    GetPipeline { id: PipelineId },
    CancelPipeline { id: PipelineId },
    SubmitPipeline {
        name: String,
        stages: Vec<Stage>,
        #[serde(default)]
        continue_on_stage_failure: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Error { message: String },
    Hosts { hosts: Vec<Host> },
    Host { host: Option<Box<Host>> },
    Pipelines { pipelines: Vec<Pipeline> },
    Pipeline { pipeline: Option<Box<Pipeline>> },
    PipelineSubmitted { id: PipelineId },
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;

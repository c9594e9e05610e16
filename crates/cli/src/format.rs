// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a [`Response`] into the text `nixfleet` prints on stdout.

use anyhow::{bail, Result};
use nixfleet_core::{Host, Pipeline};
use nixfleet_wire::Response;

fn host_line(host: &Host) -> String {
    format!(
        "{:<24} {:<8} {:<10} gen={} online={}",
        host.hostname,
        format!("{:?}", host.host_type),
        host.agent_version,
        host.generation,
        host.online,
    )
}

fn pipeline_line(pipeline: &Pipeline) -> String {
    format!(
        "{:<16} {:<10} stage {}/{} {}",
        pipeline.id.as_ref(),
        format!("{:?}", pipeline.status),
        pipeline.current_stage,
        pipeline.stages.len(),
        pipeline.name,
    )
}

/// Renders a successful response as text, or turns a wire-level `Error`
/// response into an `Err` so the process exits non-zero.
pub fn render(response: Response) -> Result<String> {
    match response {
        Response::Ok => Ok("ok".to_string()),
        Response::Error { message } => bail!(message),
        Response::Hosts { hosts } => {
            Ok(hosts.iter().map(host_line).collect::<Vec<_>>().join("\n"))
        }
        Response::Host { host: Some(host) } => Ok(host_line(&host)),
        Response::Host { host: None } => bail!("no such host"),
        Response::Pipelines { pipelines } => {
            Ok(pipelines.iter().map(pipeline_line).collect::<Vec<_>>().join("\n"))
        }
        Response::Pipeline { pipeline: Some(pipeline) } => Ok(pipeline_line(&pipeline)),
        Response::Pipeline { pipeline: None } => bail!("no such pipeline"),
        Response::PipelineSubmitted { id } => Ok(id.as_ref().to_string()),
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;

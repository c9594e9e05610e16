// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nixfleet`: the thin operator CLI. Sends one request at a time to
//! `nixfleetd`'s administrative control socket and prints the response.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod format;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use nixfleet_core::{Op, Stage};
use nixfleet_wire::Request;

#[derive(Parser)]
#[command(name = "nixfleet", version, about = "Operator CLI for a nixfleet dashboard")]
struct Cli {
    /// Path to nixfleetd's administrative Unix socket.
    #[arg(long, env = "NIXFLEET_CONTROL_SOCKET")]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or remove registered hosts.
    Hosts {
        #[command(subcommand)]
        cmd: HostsCmd,
    },
    /// Inspect, submit, or cancel pipelines.
    Pipelines {
        #[command(subcommand)]
        cmd: PipelinesCmd,
    },
}

#[derive(Subcommand)]
enum HostsCmd {
    /// List every host the dashboard knows about.
    List,
    /// Show one host by hostname.
    Get { hostname: String },
    /// Remove a host that is no longer part of the fleet.
    Remove { hostname: String },
}

#[derive(Subcommand)]
enum PipelinesCmd {
    /// List every pipeline the dashboard has run or is running.
    List,
    /// Show one pipeline by id (or id prefix).
    Get { id: String },
    /// Cancel a running pipeline.
    Cancel { id: String },
    /// Submit a new pipeline. Repeat `--stage host1,host2=op` per stage.
    Submit {
        name: String,
        #[arg(long = "stage", value_parser = parse_stage)]
        stages: Vec<Stage>,
        #[arg(long)]
        continue_on_stage_failure: bool,
    },
}

fn parse_op(s: &str) -> Result<Op, String> {
    match s {
        "pull" => Ok(Op::Pull),
        "switch" => Ok(Op::Switch),
        "pull-switch" => Ok(Op::PullSwitch),
        "test" => Ok(Op::Test),
        "stop" => Ok(Op::Stop),
        "rollback" => Ok(Op::Rollback),
        "refresh-lock" => Ok(Op::RefreshLock),
        "refresh-system" => Ok(Op::RefreshSystem),
        "refresh-all" => Ok(Op::RefreshAll),
        other => Err(format!("unknown op {other:?}")),
    }
}

/// Parses one `--stage` argument of the form `host1,host2=op`.
fn parse_stage(s: &str) -> Result<Stage, String> {
    let (hosts, op) = s.split_once('=').ok_or_else(|| format!("expected hosts=op, got {s:?}"))?;
    let hosts = hosts.split(',').map(str::to_string).collect::<Vec<_>>();
    if hosts.is_empty() || hosts.iter().any(|h| h.is_empty()) {
        return Err(format!("no hosts given in stage {s:?}"));
    }
    Ok(Stage { hosts, op: parse_op(op)? })
}

fn default_socket_path() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("NIXFLEET_DATA_DIR") {
        return Ok(PathBuf::from(dir).join("control.sock"));
    }
    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("set NIXFLEET_CONTROL_SOCKET or HOME"))?;
    Ok(PathBuf::from(home).join(".local/state/nixfleet/control.sock"))
}

fn into_request(command: Command) -> Result<Request> {
    Ok(match command {
        Command::Hosts { cmd: HostsCmd::List } => Request::ListHosts,
        Command::Hosts { cmd: HostsCmd::Get { hostname } } => Request::GetHost { hostname },
        Command::Hosts { cmd: HostsCmd::Remove { hostname } } => Request::RemoveHost { hostname },
        Command::Pipelines { cmd: PipelinesCmd::List } => Request::ListPipelines,
        Command::Pipelines { cmd: PipelinesCmd::Get { id } } => {
            Request::GetPipeline { id: nixfleet_core::PipelineId::from_string(id) }
        }
        Command::Pipelines { cmd: PipelinesCmd::Cancel { id } } => {
            Request::CancelPipeline { id: nixfleet_core::PipelineId::from_string(id) }
        }
        Command::Pipelines { cmd: PipelinesCmd::Submit { name, stages, continue_on_stage_failure } } => {
            if stages.is_empty() {
                bail!("at least one --stage is required");
            }
            Request::SubmitPipeline { name, stages, continue_on_stage_failure }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket = match cli.socket {
        Some(path) => path,
        None => default_socket_path()?,
    };

    let request = into_request(cli.command)?;
    let response = client::send(&socket, request).await?;
    println!("{}", format::render(response)?);
    Ok(())
}

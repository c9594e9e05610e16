// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent binary: resolves config from the environment (§6.2), registers
//! with the Dashboard, then runs the Heartbeat Loop (C5) and the Command
//! Executor (C4) off whatever the transport client (connect/reconnect loop)
//! delivers.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use nixfleet_agent::executor::CommandExecutor;
use nixfleet_agent::repo::RepoManager;
use nixfleet_agent::{env, freshness, heartbeat, transport, AgentError};
use nixfleet_core::{HostType, Op};
use nixfleet_wire::Message;
use tokio::sync::mpsc;

fn resolve_hostname() -> String {
    env::hostname_override().unwrap_or_else(|| {
        std::process::Command::new("hostname")
            .output()
            .ok()
            .and_then(|o| o.status.success().then(|| String::from_utf8_lossy(&o.stdout).trim().to_string()))
            .unwrap_or_else(|| "unknown-host".to_string())
    })
}

fn host_type() -> HostType {
    if cfg!(target_os = "macos") {
        HostType::Macos
    } else {
        HostType::Nixos
    }
}

fn parse_op(command: &str) -> Option<Op> {
    match command {
        "pull" => Some(Op::Pull),
        "switch" => Some(Op::Switch),
        "pull-switch" => Some(Op::PullSwitch),
        "test" => Some(Op::Test),
        "stop" => Some(Op::Stop),
        "rollback" => Some(Op::Rollback),
        "refresh-lock" => Some(Op::RefreshLock),
        "refresh-system" => Some(Op::RefreshSystem),
        "refresh-all" => Some(Op::RefreshAll),
        _ => None,
    }
}

/// Dispatches one inbound `command` frame, special-casing `stop` so it
/// reaches whatever is currently running rather than going through the
/// busy-check every other op goes through (§4.4).
async fn handle_command(
    command: Message,
    executor: &Arc<CommandExecutor>,
    repo: Option<&RepoManager>,
    repo_dir: &std::path::Path,
    hostname: &str,
    tx: &mpsc::Sender<Message>,
) {
    let Message::Command { command, .. } = command else { return };
    let Some(op) = parse_op(&command) else {
        tracing::warn!(command = %command, "dropping unrecognized command");
        return;
    };

    if op == Op::Stop {
        let status = executor.stop().await;
        let _ = tx.send(status).await;
        return;
    }

    executor.dispatch(op, repo, repo_dir, hostname, tx.clone()).await;
}

async fn run() -> Result<(), AgentError> {
    let url = env::url()?;
    let repo_dir = env::repo_dir()?;
    let hostname = resolve_hostname();
    let generation = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string());

    let repo = match env::repo_url() {
        Some(repo_url) => {
            let manager = RepoManager::new(repo_dir.clone(), repo_url, env::branch(), env::ssh_key());
            manager.ensure_synced().await?;
            Some(manager)
        }
        None => None,
    };

    let executor = Arc::new(CommandExecutor::new());
    let heartbeat_interval = env::heartbeat_interval();

    loop {
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(32);
        let (inbound_tx, mut inbound_rx) = mpsc::channel::<Message>(32);

        let freshness = freshness::current().await.unwrap_or_else(|_| nixfleet_core::Freshness::unknown());
        let register = Message::Register {
            hostname: hostname.clone(),
            host_type: host_type(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            os_version: std::env::consts::OS.to_string(),
            nixpkgs_version: String::new(),
            generation: generation.clone(),
            heartbeat_interval: heartbeat_interval.as_secs(),
            freshness,
        };
        if outbound_tx.send(register).await.is_err() {
            continue;
        }

        heartbeat::spawn(
            heartbeat_interval,
            {
                let generation = generation.clone();
                move || generation.clone()
            },
            Arc::clone(&executor),
            outbound_tx.clone(),
        );

        let transport_handle = {
            let url = url.clone();
            tokio::spawn(async move { transport::run_once(&url, &mut outbound_rx, &inbound_tx).await })
        };

        while let Some(message) = inbound_rx.recv().await {
            match &message {
                Message::Command { .. } => {
                    handle_command(message, &executor, repo.as_ref(), &repo_dir, &hostname, &outbound_tx).await;
                }
                Message::GetState => {}
                other => tracing::debug!(?other, "ignoring frame not meant for the agent"),
            }
        }

        match transport_handle.await {
            Ok(Ok(())) => tracing::warn!("dashboard connection closed, reconnecting"),
            Ok(Err(e)) => tracing::warn!(error = %e, "transport loop failed, reconnecting"),
            Err(e) => tracing::warn!(error = %e, "transport task panicked, reconnecting"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    tracing_subscriber::fmt().with_target(false).init();
    run().await
}

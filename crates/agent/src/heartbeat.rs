// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Heartbeat Loop (C5): emits periodic state snapshots independent of
//! whatever the Command Executor is doing (§4.5).

use std::sync::Arc;
use std::time::Duration;

use nixfleet_core::Freshness;
use nixfleet_wire::Message;
use tokio::sync::mpsc;

use crate::executor::CommandExecutor;

/// Spawns the background heartbeat task. Runs until `tx` is dropped.
pub fn spawn(
    interval: Duration,
    generation: impl Fn() -> String + Send + Sync + 'static,
    executor: Arc<CommandExecutor>,
    tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            let freshness = crate::freshness::current().await.unwrap_or_else(|_| Freshness::unknown());
            let message = Message::Heartbeat {
                generation: generation(),
                nixpkgs_version: String::new(),
                pending_command: None,
                command_pid: None,
                metrics: None,
                freshness,
            };
            let busy = executor.is_busy();
            let message = if busy {
                match message {
                    Message::Heartbeat { generation, nixpkgs_version, metrics, freshness, .. } => {
                        Message::Heartbeat {
                            generation,
                            nixpkgs_version,
                            pending_command: Some("executing".to_string()),
                            command_pid: None,
                            metrics,
                            freshness,
                        }
                    }
                    other => other,
                }
            } else {
                message
            };

            if tx.send(message).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;

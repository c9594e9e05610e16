// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Command Executor (C4): runs at most one op at a time, streaming
//! `output` lines and a terminal `status` back over the transport (§4.4).
//!
//! Everything here is host-type-selected shell: `nixos-rebuild` on NixOS,
//! `darwin-rebuild` on macOS. The child runs in its own process group
//! (`process_group(0)`) so `stop` can signal the whole tree rather than just
//! the immediate child.

use std::path::Path;
use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use nixfleet_core::Op;
use nixfleet_wire::{Message, StatusOutcome, StreamKind};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::repo::RepoManager;

const STOP_GRACE: Duration = Duration::from_secs(10);

struct Running {
    label: String,
    pgid: i32,
}

/// Enforces the "at most one command in flight" contract (§4.4) and owns
/// the process group of whatever is currently running, so `stop` has
/// something to signal.
pub struct CommandExecutor {
    running: Mutex<Option<Running>>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self { running: Mutex::new(None) }
    }

    pub fn is_busy(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Dispatches `op`, streaming `output`/`test_progress` messages over
    /// `tx` and finishing with a terminal `status`. If a command is already
    /// running, emits `command_rejected` immediately instead.
    pub async fn dispatch(
        &self,
        op: Op,
        repo: Option<&RepoManager>,
        repo_dir: &Path,
        hostname: &str,
        tx: mpsc::Sender<Message>,
    ) {
        if let Some(running) = self.running.lock().as_ref() {
            let _ = tx
                .send(Message::CommandRejected {
                    reason: "command already in progress".to_string(),
                    current_command: running.label.clone(),
                    current_pid: running.pgid.unsigned_abs(),
                })
                .await;
            return;
        }

        let result = self.run(op, repo, repo_dir, hostname, &tx).await;
        self.running.lock().take();

        let status = match result {
            Ok((exit_code, message)) => Message::Status {
                status: if exit_code == 0 { StatusOutcome::Ok } else { StatusOutcome::Error },
                exit_code,
                generation: None,
                message,
            },
            Err(message) => Message::Status {
                status: StatusOutcome::Error,
                exit_code: -1,
                generation: None,
                message,
            },
        };
        let _ = tx.send(status).await;
    }

    /// Sends SIGTERM to the running command's process group, then SIGKILL
    /// after [`STOP_GRACE`] if it hasn't exited.
    pub async fn stop(&self) -> Message {
        let pgid = { self.running.lock().as_ref().map(|r| r.pgid) };
        let Some(pgid) = pgid else {
            return Message::Status {
                status: StatusOutcome::Ok,
                exit_code: 0,
                generation: None,
                message: "no running command to stop".to_string(),
            };
        };

        let _ = kill(Pid::from_raw(-pgid), Signal::SIGTERM);
        tokio::time::sleep(STOP_GRACE).await;
        if self.running.lock().is_some() {
            let _ = kill(Pid::from_raw(-pgid), Signal::SIGKILL);
        }

        Message::Status {
            status: StatusOutcome::Ok,
            exit_code: 143,
            generation: None,
            message: "command stopped".to_string(),
        }
    }

    async fn run(
        &self,
        op: Op,
        repo: Option<&RepoManager>,
        repo_dir: &Path,
        hostname: &str,
        tx: &mpsc::Sender<Message>,
    ) -> Result<(i32, String), String> {
        match op {
            Op::Pull => self.run_pull(repo).await,
            Op::Switch => {
                self.run_shell(op, rebuild_command(repo_dir, hostname, "switch"), repo_dir, tx).await
            }
            Op::PullSwitch => {
                let (code, message) = self.run_pull(repo).await?;
                if code != 0 {
                    return Ok((code, message));
                }
                self.run_shell(op, rebuild_command(repo_dir, hostname, "switch"), repo_dir, tx).await
            }
            Op::Rollback => {
                self.run_shell(op, rebuild_command(repo_dir, hostname, "switch --rollback"), repo_dir, tx).await
            }
            Op::Test => self.run_tests(repo_dir, hostname, tx).await,
            Op::Stop => Ok((0, "no running command to stop".to_string())),
            Op::RefreshLock | Op::RefreshSystem | Op::RefreshAll => {
                Ok((0, "refreshed cached status".to_string()))
            }
        }
    }

    async fn run_pull(&self, repo: Option<&RepoManager>) -> Result<(i32, String), String> {
        let Some(repo) = repo else {
            return Ok((0, "not in isolated-repo mode, nothing to pull".to_string()));
        };
        match repo.ensure_synced().await {
            Ok(()) => Ok((0, "pulled".to_string())),
            Err(e) => Ok((1, e.to_string())),
        }
    }

    async fn run_shell(
        &self,
        op: Op,
        (program, args): (&str, Vec<String>),
        dir: &Path,
        tx: &mpsc::Sender<Message>,
    ) -> Result<(i32, String), String> {
        self.spawn_streamed(op.as_wire_str(), program, &args, dir, tx).await
    }

    async fn run_tests(&self, repo_dir: &Path, hostname: &str, tx: &mpsc::Sender<Message>) -> Result<(i32, String), String> {
        let tests_dir = repo_dir.join("hosts").join(hostname).join("tests");
        let mut scripts = match tokio::fs::read_dir(&tests_dir).await {
            Ok(mut entries) => {
                let mut names = Vec::new();
                while let Ok(Some(entry)) = entries.next_entry().await {
                    let name = entry.file_name().to_string_lossy().to_string();
                    if name.starts_with('T') && name.ends_with(".sh") {
                        names.push(name);
                    }
                }
                names
            }
            Err(_) => Vec::new(),
        };
        scripts.sort();

        let total = scripts.len() as u32;
        let mut passed = 0u32;
        let mut any_failed = false;

        for (i, script) in scripts.iter().enumerate() {
            let current = i as u32 + 1;
            let _ = tx
                .send(Message::TestProgress { current, total, passed, running: script.clone(), result: None })
                .await;

            let (exit_code, _) = self
                .spawn_streamed("test", "sh", &[tests_dir.join(script).display().to_string()], repo_dir, tx)
                .await?;
            let ok = exit_code == 0;
            if ok {
                passed += 1;
            } else {
                any_failed = true;
            }
            let _ = tx
                .send(Message::TestProgress { current, total, passed, running: script.clone(), result: Some(ok) })
                .await;
        }

        let message = format!("{passed}/{total} tests passed");
        Ok((if any_failed { 1 } else { 0 }, message))
    }

    async fn spawn_streamed(
        &self,
        label: &str,
        program: &str,
        args: &[String],
        dir: &Path,
        tx: &mpsc::Sender<Message>,
    ) -> Result<(i32, String), String> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(dir)
            .process_group(0)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| format!("failed to spawn {program}: {e}"))?;
        let pgid = child.id().ok_or_else(|| "child exited before pid was available".to_string())? as i32;
        *self.running.lock() = Some(Running { label: label.to_string(), pgid });

        let stdout = child.stdout.take().ok_or_else(|| "missing stdout pipe".to_string())?;
        let stderr = child.stderr.take().ok_or_else(|| "missing stderr pipe".to_string())?;

        let out_tx = tx.clone();
        let command_label = label.to_string();
        let stdout_task = tokio::spawn(stream_lines(stdout, StreamKind::Stdout, command_label.clone(), out_tx));
        let err_tx = tx.clone();
        let stderr_task = tokio::spawn(stream_lines(stderr, StreamKind::Stderr, command_label, err_tx));

        let status = child.wait().await.map_err(|e| format!("failed waiting for {program}: {e}"))?;
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        Ok((status.code().unwrap_or(-1), format!("{program} exited with {status}")))
    }
}

async fn stream_lines<R: tokio::io::AsyncRead + Unpin>(
    reader: R,
    stream: StreamKind,
    command: String,
    tx: mpsc::Sender<Message>,
) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(Message::Output { line, stream, command: command.clone() }).await.is_err() {
            break;
        }
    }
}

fn rebuild_command(repo_dir: &Path, hostname: &str, subcommand: &str) -> (&'static str, Vec<String>) {
    let flake = format!("{}#{}", repo_dir.display(), hostname);
    let program = if cfg!(target_os = "macos") { "darwin-rebuild" } else { "nixos-rebuild" };
    let mut args: Vec<String> = subcommand.split_whitespace().map(str::to_string).collect();
    args.push("--flake".to_string());
    args.push(flake);
    (program, args)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

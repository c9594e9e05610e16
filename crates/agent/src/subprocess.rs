// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout wrapper around `tokio::process::Command`, shared by the Isolated
//! Repo Manager (C3) and the Command Executor (C4) so a hung `git` or
//! `nixos-rebuild` invocation can't wedge the agent forever.

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use crate::error::AgentError;

pub const GIT_TIMEOUT: Duration = Duration::from_secs(120);
pub const EXEC_TIMEOUT: Duration = Duration::from_secs(60 * 30);

/// Runs `cmd` to completion, killing it if it outlives `timeout`.
/// `description` is only used for error messages.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, AgentError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(AgentError::Io(e)),
        Err(_) => Err(AgentError::SubprocessTimeout {
            description: description.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;

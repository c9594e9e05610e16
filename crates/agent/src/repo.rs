// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Isolated Repo Manager (C3): keeps one host-local git checkout in
//! lockstep with a remote, discarding any local drift rather than merging
//! it (§4.2). Only active when `NIXFLEET_REPO_URL` is set; otherwise the
//! Command Executor runs directly against whatever is already at
//! `repo_dir` (§10.1, §6.2).

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::AgentError;
use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};

pub struct RepoManager {
    repo_dir: PathBuf,
    repo_url: String,
    branch: String,
    ssh_key: Option<PathBuf>,
}

impl RepoManager {
    pub fn new(repo_dir: PathBuf, repo_url: String, branch: String, ssh_key: Option<PathBuf>) -> Self {
        Self { repo_dir, repo_url, branch, ssh_key }
    }

    fn git(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.repo_dir);
        if let Some(key) = &self.ssh_key {
            cmd.env("GIT_SSH_COMMAND", format!("ssh -i {} -o IdentitiesOnly=yes", key.display()));
        }
        cmd
    }

    /// Clones if `repo_dir` has no checkout yet, then runs [`sync`] so a
    /// freshly cloned repo and a re-synced one leave the worktree in the
    /// same state on exit.
    pub async fn ensure_synced(&self) -> Result<(), AgentError> {
        if !self.repo_dir.join(".git").exists() {
            self.clone().await?;
        }
        self.sync().await
    }

    async fn clone(&self) -> Result<(), AgentError> {
        if let Some(parent) = self.repo_dir.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut cmd = Command::new("git");
        cmd.args([
            "clone",
            "--branch",
            &self.branch,
            &self.repo_url,
            &self.repo_dir.display().to_string(),
        ]);
        if let Some(key) = &self.ssh_key {
            cmd.env("GIT_SSH_COMMAND", format!("ssh -i {} -o IdentitiesOnly=yes", key.display()));
        }
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git clone").await?;
        check(output, "git clone")
    }

    /// Fetches the tracked branch and forces the worktree to match it
    /// exactly: `reset --hard` for tracked files, `clean -fd` for anything
    /// untracked a prior command run may have left behind.
    async fn sync(&self) -> Result<(), AgentError> {
        let fetch = run_with_timeout(
            self.git(&["fetch", "origin", &self.branch]),
            GIT_TIMEOUT,
            "git fetch",
        )
        .await?;
        check(fetch, "git fetch")?;

        let reset = run_with_timeout(
            self.git(&["reset", "--hard", &format!("origin/{}", self.branch)]),
            GIT_TIMEOUT,
            "git reset --hard",
        )
        .await?;
        check(reset, "git reset --hard")?;

        let clean =
            run_with_timeout(self.git(&["clean", "-fd"]), GIT_TIMEOUT, "git clean -fd").await?;
        check(clean, "git clean -fd")
    }

    pub fn checkout_path(&self) -> &Path {
        &self.repo_dir
    }

    /// Current commit of the checkout, used as the Freshness Reporter's
    /// running-source signal alongside the build-time baseline (§4.6).
    pub async fn head_commit(&self) -> Result<String, AgentError> {
        let output =
            run_with_timeout(self.git(&["rev-parse", "--short", "HEAD"]), GIT_TIMEOUT, "git rev-parse").await?;
        if !output.status.success() {
            return Err(AgentError::SubprocessFailed {
                description: "git rev-parse".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn check(output: std::process::Output, description: &str) -> Result<(), AgentError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(AgentError::SubprocessFailed {
            description: description.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;

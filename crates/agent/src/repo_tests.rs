// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::process::Command as StdCommand;
use tempfile::tempdir;

fn git(dir: &Path, args: &[&str]) -> std::process::Output {
    StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .output()
        .unwrap()
}

fn init_bare_remote(dir: &Path) {
    assert!(git(dir, &["init"]).status.success());
    assert!(git(dir, &["checkout", "-b", "main"]).status.success());
    assert!(git(dir, &["config", "user.email", "agent@nixfleet.test"]).status.success());
    assert!(git(dir, &["config", "user.name", "nixfleet-agent-tests"]).status.success());
    std::fs::write(dir.join("flake.nix"), "{ }\n").unwrap();
    assert!(git(dir, &["add", "."]).status.success());
    assert!(git(dir, &["commit", "-m", "init"]).status.success());
}

#[tokio::test]
async fn ensure_synced_clones_a_fresh_checkout() {
    let tmp = tempdir().unwrap();
    let remote = tmp.path().join("remote");
    std::fs::create_dir_all(&remote).unwrap();
    init_bare_remote(&remote);

    let checkout = tmp.path().join("checkout");
    let manager =
        RepoManager::new(checkout.clone(), remote.display().to_string(), "main".to_string(), None);

    manager.ensure_synced().await.unwrap();

    assert!(checkout.join("flake.nix").exists());
}

#[tokio::test]
async fn ensure_synced_discards_local_drift_on_resync() {
    let tmp = tempdir().unwrap();
    let remote = tmp.path().join("remote");
    std::fs::create_dir_all(&remote).unwrap();
    init_bare_remote(&remote);

    let checkout = tmp.path().join("checkout");
    let manager =
        RepoManager::new(checkout.clone(), remote.display().to_string(), "main".to_string(), None);
    manager.ensure_synced().await.unwrap();

    std::fs::write(checkout.join("untracked.txt"), "drift").unwrap();
    std::fs::write(checkout.join("flake.nix"), "{ edited = true; }\n").unwrap();

    manager.ensure_synced().await.unwrap();

    assert!(!checkout.join("untracked.txt").exists());
    assert_eq!(std::fs::read_to_string(checkout.join("flake.nix")).unwrap(), "{ }\n");
}

#[tokio::test]
async fn head_commit_matches_the_remote_after_sync() {
    let tmp = tempdir().unwrap();
    let remote = tmp.path().join("remote");
    std::fs::create_dir_all(&remote).unwrap();
    init_bare_remote(&remote);
    let expected = String::from_utf8_lossy(&git(&remote, &["rev-parse", "--short", "HEAD"]).stdout)
        .trim()
        .to_string();

    let checkout = tmp.path().join("checkout");
    let manager =
        RepoManager::new(checkout, remote.display().to_string(), "main".to_string(), None);
    manager.ensure_synced().await.unwrap();

    assert_eq!(manager.head_commit().await.unwrap(), expected);
}

//! Test helpers for the `nixfleet`/`nixfleetd` behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output};
use std::time::{Duration, Instant};

/// Resolves a workspace binary's path, checking llvm-cov's target directory
/// first so this also works under coverage runs, and falling back to a path
/// relative to this test binary itself when `CARGO_MANIFEST_DIR` doesn't
/// point at a fresh `target/` (e.g. a shared `target/` from another checkout).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn nixfleet_binary() -> PathBuf {
    binary_path("nixfleet")
}

fn nixfleetd_binary() -> PathBuf {
    binary_path("nixfleetd")
}

/// Fluent builder for one `nixfleet` invocation.
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

pub fn nixfleet() -> CliBuilder {
    CliBuilder { args: Vec::new(), envs: Vec::new() }
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn socket(mut self, path: impl AsRef<Path>) -> Self {
        self.envs.push(("NIXFLEET_CONTROL_SOCKET".to_string(), path.as_ref().to_string_lossy().into_owned()));
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::new(nixfleet_binary());
        cmd.args(&self.args).env_remove("NIXFLEET_DATA_DIR").env_remove("HOME");
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn run(self) -> RunAssert {
        let output = self.command().output().expect("nixfleet should run");
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn succeeds(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected nixfleet to exit 0, got {:?}\nstdout: {}\nstderr: {}",
            self.output.status.code(),
            self.stdout(),
            self.stderr()
        );
        self
    }

    pub fn fails(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected nixfleet to exit nonzero, but it passed\nstdout: {}",
            self.stdout()
        );
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain {expected:?}\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain {expected:?}\nstderr: {stderr}");
        self
    }
}

/// A running `nixfleetd` bound to a throwaway state dir and an ephemeral
/// `/ws` port, killed on drop. Tests talk to it only through the control
/// socket; the `/ws` listener is given port 0 since none of these specs
/// connect an agent.
pub struct Dashboard {
    _data_dir: tempfile::TempDir,
    control_socket: PathBuf,
    child: Child,
}

impl Dashboard {
    pub fn start() -> Self {
        let data_dir = tempfile::tempdir().expect("tempdir");
        let control_socket = data_dir.path().join("control.sock");

        let child = Command::new(nixfleetd_binary())
            .env("NIXFLEET_DATA_DIR", data_dir.path())
            .env("NIXFLEET_CONTROL_SOCKET", &control_socket)
            .env("NIXFLEET_LISTEN_ADDR", "127.0.0.1:0")
            .env("NIXFLEET_AGENT_TOKEN", "test-token")
            .env("NIXFLEET_SESSION_SECRET", "test-session-secret")
            .env("NIXFLEET_LOG_LEVEL", "warn")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .expect("nixfleetd should spawn");

        let dashboard = Self { _data_dir: data_dir, control_socket, child };
        dashboard.wait_for_socket();
        dashboard
    }

    fn wait_for_socket(&self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if self.control_socket.exists() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("nixfleetd never created its control socket at {}", self.control_socket.display());
    }

    pub fn cli(&self) -> CliBuilder {
        nixfleet().socket(&self.control_socket)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

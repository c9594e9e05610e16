// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-crate-boundary error enum for the agent (§10.2).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] nixfleet_wire::WireError),

    #[error("subprocess {description} timed out after {timeout_secs}s")]
    SubprocessTimeout { description: String, timeout_secs: u64 },

    #[error("subprocess {description} failed: {stderr}")]
    SubprocessFailed { description: String, stderr: String },

    #[error("websocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("connection closed by dashboard")]
    ConnectionClosed,
}

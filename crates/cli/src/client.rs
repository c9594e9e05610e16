// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connects to `nixfleetd`'s administrative Unix socket and runs one
//! request/response exchange over it (§10.1).

use std::path::Path;

use anyhow::{Context, Result};
use nixfleet_wire::{encode_frame, decode_frame, read_message, write_message, Request, Response};
use tokio::net::UnixStream;

pub async fn send(socket_path: &Path, request: Request) -> Result<Response> {
    let mut stream = UnixStream::connect(socket_path)
        .await
        .with_context(|| format!("connecting to {}", socket_path.display()))?;

    let payload = encode_frame(&request).context("encoding request")?;
    write_message(&mut stream, &payload).await.context("writing request")?;

    let bytes = read_message(&mut stream).await.context("reading response")?;
    decode_frame(&bytes).context("decoding response")
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed framing for the local control channel between
//! `nixfleet-cli` and `nixfleetd`'s administrative Unix socket.
//!
//! This is a separate, simpler transport from the Transport Hub's WebSocket:
//! a local operator CLI has no need for the browser sync protocol, just a
//! one-shot request/response exchange. Wire format: 4-byte big-endian length
//! prefix, followed by a JSON payload.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::WireError;

/// Frames larger than this are rejected rather than allocated, so a
/// corrupted or malicious length prefix can't exhaust memory.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Serializes `value` to JSON with no length prefix.
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(value)?)
}

/// Parses a raw JSON payload (as produced by [`encode`] or read by [`read_message`]).
pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub async fn write_message<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), WireError> {
    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_message<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Vec<u8>, WireError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(WireError::FrameTooLarge { max: MAX_FRAME_BYTES, got: len });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;

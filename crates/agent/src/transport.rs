// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transport client half of §10.1: a persistent WebSocket connection to
//! the Dashboard's `/ws` endpoint carrying the wire Message Codec (C1).
//!
//! Grounded on the daemon's own container WebSocket bridge: a bounded retry
//! loop on connect, then a `tokio::select!` pump between an outbound channel
//! (heartbeats, output, status) and whatever the dashboard sends down
//! (`command`/`get_state`).

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use nixfleet_wire::Message as WireMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::error::AgentError;

const CONNECT_ATTEMPTS: u32 = 20;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Connects to `url`, retrying up to [`CONNECT_ATTEMPTS`] times so the
/// agent survives the dashboard restarting underneath it.
async fn connect_with_retry(
    url: &str,
) -> Result<tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>, AgentError>
{
    let mut last_err = None;
    for attempt in 0..CONNECT_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(CONNECT_RETRY_DELAY).await;
        }
        match tokio_tungstenite::connect_async(url).await {
            Ok((stream, _response)) => return Ok(stream),
            Err(e) => {
                tracing::warn!(attempt, error = %e, "agent websocket connect failed");
                last_err = Some(e);
            }
        }
    }
    Err(last_err.map(AgentError::Transport).unwrap_or(AgentError::ConnectionClosed))
}

/// Runs one connection's lifetime: pumps `outbound` to the socket and
/// decoded frames to `inbound`. Returns once the connection closes, so the
/// caller can reconnect and keep calling this in a loop.
pub async fn run_once(
    url: &str,
    outbound: &mut mpsc::Receiver<WireMessage>,
    inbound: &mpsc::Sender<WireMessage>,
) -> Result<(), AgentError> {
    let stream = connect_with_retry(url).await?;
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            outgoing = outbound.recv() => {
                let Some(message) = outgoing else { return Ok(()) };
                let text = nixfleet_wire::encode(&message)?;
                write.send(WsMessage::Text(text.into())).await?;
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        match nixfleet_wire::decode(&text) {
                            Ok(message) => {
                                if inbound.send(message).await.is_err() {
                                    return Ok(());
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "dropping undecodable frame"),
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(AgentError::Transport(e)),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

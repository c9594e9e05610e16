// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The administrative control channel `nixfleet-cli` talks to: a Unix
//! socket accepting one length-prefixed [`Request`]/[`Response`] exchange
//! per connection (§10.1, `nixfleet-wire::frame`).

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use nixfleet_core::{Mutation, Pipeline, PipelineStatus};
use nixfleet_store::Store;
use nixfleet_wire::{read_message, write_message, Request, Response};
use parking_lot::Mutex;
use tokio::net::{UnixListener, UnixStream};
use tracing::warn;

fn now_epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Handles one already-framed request against the store, producing the
/// response to write back. Pure with respect to the socket (given a
/// timestamp): testable without binding anything.
pub fn handle(store: &Mutex<Store>, request: Request, now_epoch_ms: u64) -> Response {
    match request {
        Request::ListHosts => {
            let store = store.lock();
            Response::Hosts { hosts: store.state().hosts.values().cloned().collect() }
        }
        Request::GetHost { hostname } => {
            let store = store.lock();
            Response::Host { host: store.state().get_host(&hostname).cloned().map(Box::new) }
        }
        Request::RemoveHost { hostname } => {
            let mut store = store.lock();
            match store.apply(Mutation::HostRemoved { hostname }) {
                Ok(_) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
        Request::ListPipelines => {
            let store = store.lock();
            Response::Pipelines { pipelines: store.state().pipelines.values().cloned().collect() }
        }
        Request::GetPipeline { id } => {
            let store = store.lock();
            Response::Pipeline { pipeline: store.state().get_pipeline(id.as_ref()).cloned().map(Box::new) }
        }
        Request::CancelPipeline { id } => {
            let mut store = store.lock();
            let Some(pipeline) = store.state().pipelines.get(&id) else {
                return Response::Error { message: format!("no such pipeline: {id}") };
            };
            if pipeline.status.is_terminal() {
                return Response::Error { message: "pipeline already finished".to_string() };
            }
            match store.apply(Mutation::PipelineStatusChanged {
                id,
                status: PipelineStatus::Cancelled,
                finished_at_epoch_ms: Some(now_epoch_ms),
            }) {
                Ok(_) => Response::Ok,
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
        Request::SubmitPipeline { name, stages, continue_on_stage_failure } => {
            let mut store = store.lock();
            let mut pipeline = Pipeline::new(name, stages, now_epoch_ms);
            pipeline.on_stage_failure = if continue_on_stage_failure {
                nixfleet_core::OnStageFailure::Continue
            } else {
                nixfleet_core::OnStageFailure::Stop
            };
            let id = pipeline.id;
            match store.apply(Mutation::PipelineCreated { pipeline: Box::new(pipeline) }) {
                Ok(_) => Response::PipelineSubmitted { id },
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
    }
}

async fn serve_one(mut stream: UnixStream, store: &Mutex<Store>) -> Result<(), nixfleet_wire::WireError> {
    let bytes = read_message(&mut stream).await?;
    let request: Request = nixfleet_wire::decode_frame(&bytes)?;
    let response = handle(store, request, now_epoch_ms());
    let payload = nixfleet_wire::encode_frame(&response)?;
    write_message(&mut stream, &payload).await
}

/// Accept loop for the control socket. One request per connection; the CLI
/// never holds a connection open.
pub async fn run(socket_path: &Path, store: std::sync::Arc<Mutex<Store>>) -> std::io::Result<()> {
    let _ = std::fs::remove_file(socket_path);
    let listener = UnixListener::bind(socket_path)?;

    loop {
        let (stream, _addr) = listener.accept().await?;
        let store = std::sync::Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = serve_one(stream, &store).await {
                warn!(error = %e, "control connection ended with error");
            }
        });
    }
}

#[cfg(test)]
#[path = "control_server_tests.rs"]
mod tests;

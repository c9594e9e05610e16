// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nixfleetd`: the dashboard binary. Wires environment config, the State
//! Store, the Recovery Supervisor's startup pass, and the Transport Hub's
//! accept loop together, then hands off to the housekeeping loops.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use nixfleet_dashboard::hub::{self, Hub};
use nixfleet_dashboard::{control_server, env, recovery};
use nixfleet_store::Store;
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

fn now_epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_millis() as u64
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env("NIXFLEET_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data_dir = env::data_dir()?;
    let mut store = Store::open(&data_dir)?;

    let reconciled = recovery::reconcile_startup(&mut store, now_epoch_ms())?;
    if reconciled > 0 {
        tracing::info!(reconciled, "recovery supervisor orphaned stale commands from a prior run");
    }

    let store = Arc::new(Mutex::new(store));
    let control_socket_path = env::control_socket_path()?;

    let hub = Hub::new();
    let listen_addr = env::listen_addr();

    tokio::select! {
        result = hub::run(&listen_addr, hub) => result?,
        result = control_server::run(&control_socket_path, store) => result?,
    }

    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-crate-boundary error enum for the dashboard (§10.2).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("command rejected ({0}): {1}")]
    CommandRejected(&'static str, String),

    #[error("could not determine a state directory; set NIXFLEET_DATA_DIR or HOME")]
    NoStateDir,

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] nixfleet_wire::WireError),

    #[error(transparent)]
    Store(#[from] nixfleet_store::StoreError),
}

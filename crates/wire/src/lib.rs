// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for NixFleet: the Message Codec (C1) used over the
//! Transport Hub's WebSocket endpoint, plus the length-prefixed local
//! control channel `nixfleet-cli` uses to talk to `nixfleetd`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod control;
mod error;
mod frame;
mod message;

pub use control::{Request, Response};
pub use error::WireError;
pub use frame::{decode as decode_frame, encode as encode_frame, read_message, write_message, MAX_FRAME_BYTES};
pub use message::{decode, encode, Change, FullState, Message, Metrics, StatusOutcome, StreamKind};

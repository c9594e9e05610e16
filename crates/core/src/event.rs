// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The append-only Event (audit-log) entity (§3.1, §4.9 `event_log`).
//!
//! Not to be confused with [`crate::mutation::Mutation`], the internal
//! write-ahead-log record that drives State Store projections — this is the
//! externally-visible, human-readable record a browser renders in its
//! activity feed.

use serde::{Deserialize, Serialize};

use crate::define_id;

define_id! {
    /// Opaque unique event identifier.
    pub struct EventId("evt-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp_epoch_ms: u64,
    pub category: String,
    pub level: EventLevel,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub host_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details_json: Option<serde_json::Value>,
}

impl Event {
    pub fn new(
        category: impl Into<String>,
        level: EventLevel,
        message: impl Into<String>,
        timestamp_epoch_ms: u64,
    ) -> Self {
        Self {
            id: EventId::new(),
            timestamp_epoch_ms,
            category: category.into(),
            level,
            actor: None,
            host_id: None,
            action: None,
            message: message.into(),
            details_json: None,
        }
    }

    pub fn with_host(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = Some(host_id.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

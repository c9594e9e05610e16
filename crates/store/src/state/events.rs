// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit log mutations (§3.1, §4.9 `event_log`). Append-only: nothing here
//! ever edits or removes a logged event.

use nixfleet_core::Mutation;

use super::MaterializedState;

pub fn apply(state: &mut MaterializedState, mutation: &Mutation) {
    if let Mutation::EventLogged { event } = mutation {
        if state.events.iter().any(|e| e.id == event.id) {
            return;
        }
        state.events.push((**event).clone());
    }
}

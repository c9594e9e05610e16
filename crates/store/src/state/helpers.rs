// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Looks `id` up as an exact key first, then as a unique prefix match (like
/// git commit hashes). Returns `None` if no key matches, or if more than one
/// key shares the prefix — an ambiguous prefix is not a match.
pub fn find_by_prefix<'a, K, V>(map: &'a HashMap<K, V>, id: &str) -> Option<&'a V>
where
    K: Eq + Hash + Borrow<str>,
{
    if let Some(value) = map.get(id) {
        return Some(value);
    }

    let mut found = None;
    for (key, value) in map {
        if key.borrow().starts_with(id) {
            if found.is_some() {
                return None;
            }
            found = Some(value);
        }
    }
    found
}

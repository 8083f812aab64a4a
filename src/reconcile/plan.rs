// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The find-or-create-or-update decision and the whole-collection merges
//! applied to the mirror afterwards.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::Resource;

/// What an `ensure` call has to do with the current collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No item with the natural key (or only ones without a server id).
    Create,
    /// Item at this index already matches.
    Keep(usize),
    /// Item at this index has drifted and must be rewritten.
    Update { index: usize, id: String },
}

/// Decide how to reconcile `collection` against the desired state.
///
/// The first item satisfying `key_matches` and carrying a server id is the
/// existing one; `membership_matches` then picks between keep and update.
pub fn decide<T, K, M>(collection: &[T], key_matches: K, membership_matches: M) -> Decision
where
    T: Resource,
    K: Fn(&T) -> bool,
    M: Fn(&T) -> bool,
{
    let existing = collection
        .iter()
        .enumerate()
        .find_map(|(index, item)| match item.id() {
            Some(id) if key_matches(item) => Some((index, id)),
            _ => None,
        });

    match existing {
        None => Decision::Create,
        Some((index, _)) if membership_matches(&collection[index]) => Decision::Keep(index),
        Some((index, id)) => Decision::Update {
            index,
            id: id.to_string(),
        },
    }
}

/// `collection` followed by `item`.
pub fn appended<T: Clone>(collection: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(collection.len() + 1);
    next.extend_from_slice(collection);
    next.push(item);
    next
}

/// `collection` with the element at `index` swapped for `item`.
pub fn replaced<T: Clone>(collection: &[T], index: usize, item: T) -> Vec<T> {
    let mut next = collection.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = item;
    }
    next
}

/// Union keeping the first occurrence of every key, in input order.
pub fn dedup_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

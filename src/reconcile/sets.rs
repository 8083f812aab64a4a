// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order- and duplicate-insensitive membership comparison.

use std::collections::HashSet;
use std::hash::Hash;

/// True when both sequences hold the same distinct elements.
pub fn set_equal<T, L, R>(left: L, right: R) -> bool
where
    T: Eq + Hash,
    L: IntoIterator<Item = T>,
    R: IntoIterator<Item = T>,
{
    let left: HashSet<T> = left.into_iter().collect();
    let right: HashSet<T> = right.into_iter().collect();
    left.len() == right.len() && left.iter().all(|item| right.contains(item))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service-granted roles and the local authorization gate.

use std::collections::BTreeSet;

use crate::error::{NotifiError, NotifiResult};

/// Roles the client gates operations on.
///
/// The service may grant other roles; those are kept in [`RoleSet`] as raw
/// strings and never checked locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// May list broadcast topics.
    UserMessenger,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::UserMessenger => "UserMessenger",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles granted by the last login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(role.as_str())
    }

    /// Fail locally with `Unauthorized` unless `role` was granted.
    pub fn require(&self, role: Role) -> NotifiResult<()> {
        if self.contains(role) {
            Ok(())
        } else {
            Err(NotifiError::Unauthorized(format!(
                "role {role} is required for this operation"
            )))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RoleSet(iter.into_iter().map(Into::into).collect())
    }
}

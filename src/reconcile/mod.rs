// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Resource Reconciliation
//!
//! "Ensure X exists and matches" for sources, source groups, targets and
//! target groups, composed into alert create/update/delete.
//!
//! Every `ensure` follows the same steps:
//!
//! 1. fetch the full remote collection
//! 2. look the desired item up by its natural key
//! 3. create it, keep it, or update its membership ([`plan::decide`])
//! 4. write the resulting collection back to the mirror in one replace
//!
//! A failure before step 4 leaves the mirror untouched. Concurrent ensures
//! on the same collection race on step 4 (last writer wins); callers that
//! care must serialize them.

mod alerts;
pub mod plan;
pub mod sets;
mod sources;
mod targets;

use std::sync::Arc;

use crate::context::ClientContext;

pub use alerts::CreateAlertRequest;

/// Find-or-create-or-update engine over the remote service.
#[derive(Clone)]
pub struct ResourceReconciler {
    ctx: Arc<ClientContext>,
}

impl ResourceReconciler {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }
}

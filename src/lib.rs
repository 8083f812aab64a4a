// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notifi Alerts - Wallet-Authenticated Notification Client
//!
//! Logs a wallet in to the Notifi notification service and declaratively
//! manages its alerts without ever duplicating remote resources.
//!
//! ## Modules
//!
//! - `auth` - Challenge/response and direct wallet login, roles
//! - `client` - [`NotifiClient`] entry point and signed broadcasts
//! - `reconcile` - Find-or-create-or-update of sources, targets and alerts
//! - `service` - Remote service boundary and its GraphQL transport
//! - `store` - Local mirror of remote collections
//! - `config` / `logging` - Environment configuration and tracing setup

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub use client::{BroadcastRequest, NotifiClient};
pub use error::{NotifiError, NotifiResult};
pub use reconcile::{CreateAlertRequest, ResourceReconciler};
pub use store::{Collection, MirrorData, MirrorStrategy};

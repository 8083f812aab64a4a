// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Wallet-identified login against the notification service.
//!
//! ## Login Flows
//!
//! 1. **Challenge/response**: the service issues a nonce, the client pairs it
//!    with a random client nonce and displays `Notifi Auth: 0x<sha256>`; the
//!    wallet's transaction signature completes the login.
//! 2. **Direct**: the wallet signs a timestamped consent message.
//!
//! Either way the service returns a bearer token (absent when rejected) and
//! a role set. The token is handed to the service client for all later
//! calls and the mirror is refreshed.
//!
//! ## Authorization
//!
//! Privileged operations check the current [`RoleSet`] locally and fail with
//! `Unauthorized` before any remote call.

pub mod challenge;
pub mod roles;
pub mod session;
pub mod signing;

pub use roles::{Role, RoleSet};
pub use session::{AuthPhase, AuthSession, SessionState};
pub use signing::{MessageSigner, SignerError};

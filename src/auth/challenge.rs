// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login-by-transaction challenge.
//!
//! The server issues a nonce; the client pairs it with a random client nonce
//! and shows the wallet a line derived from both. The client nonce is what
//! gets sent back on completion.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const LOG_VALUE_PREFIX: &str = "Notifi Auth: 0x";

/// One outstanding challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub client_nonce: String,
    pub log_value: String,
}

impl Challenge {
    /// Pair `server_nonce` with a fresh random v4 UUID.
    pub fn new(server_nonce: &str) -> Self {
        let client_nonce = Uuid::new_v4().to_string();
        let log_value = log_value(server_nonce, &client_nonce);
        Self {
            client_nonce,
            log_value,
        }
    }
}

/// `"Notifi Auth: 0x" + hex(SHA256(server_nonce ‖ client_nonce))`.
pub fn log_value(server_nonce: &str, client_nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_nonce.as_bytes());
    hasher.update(client_nonce.as_bytes());
    format!("{LOG_VALUE_PREFIX}{}", hex::encode(hasher.finalize()))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared signing primitive for dapp login and broadcasts.
//!
//! The wallet always signs the same consent text followed by the wallet
//! address, dapp address and a unix-second timestamp. The raw signature is
//! sent base64-encoded.

use async_trait::async_trait;
use base64ct::{Base64, Encoding};

use crate::error::{NotifiError, NotifiResult};

/// Consent statement shown by the wallet on every signature request.
pub const SIGNING_MESSAGE: &str = "Sign in with Notifi \n
    No password needed or gas is needed. \n
    Clicking “Approve” only means you have proved this wallet is owned by you! \n
    This request will not trigger any transaction or cost any gas fees. \n
    Use of our website and service is subject to our terms of service and privacy policy. \n";

pub type SignerError = Box<dyn std::error::Error + Send + Sync>;

/// Wallet capability that signs arbitrary bytes.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// The exact text handed to the signer.
pub fn signing_message(wallet_address: &str, dapp_address: &str, timestamp: i64) -> String {
    format!("{SIGNING_MESSAGE} \n 'Nonce:' {wallet_address}{dapp_address}{timestamp}")
}

/// Sign the timestamped consent message and base64-encode the signature.
pub async fn sign(
    signer: &dyn MessageSigner,
    wallet_address: &str,
    dapp_address: &str,
    timestamp: i64,
) -> NotifiResult<String> {
    let message = signing_message(wallet_address, dapp_address, timestamp);
    let signature = signer
        .sign_message(message.as_bytes())
        .await
        .map_err(|e| NotifiError::SigningFailed(e.to_string()))?;
    Ok(Base64::encode_string(&signature))
}

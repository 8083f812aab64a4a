// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge/response and direct wallet login.
//!
//! ```text
//! Anonymous --begin_challenge--> ChallengeIssued --complete_challenge--> Authenticated
//! Anonymous --direct_login-----------------------------------------------> Authenticated
//! ```
//!
//! Only one challenge may be outstanding: beginning a new one replaces the
//! pending client nonce. Completing consumes it whether or not the service
//! accepts the signature.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::challenge::Challenge;
use super::roles::{Role, RoleSet};
use super::signing::{sign, MessageSigner};
use crate::context::ClientContext;
use crate::error::{NotifiError, NotifiResult};
use crate::models::{User, WalletBlockchain};
use crate::service::{
    BeginLoginViaTransactionInput, CompleteLoginViaTransactionInput, LogInFromDappInput,
};
use crate::store::MirrorData;

/// Session fields kept alongside the mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Client nonce of the outstanding challenge, single use.
    pub pending_nonce: Option<String>,
    pub token: Option<String>,
    pub roles: RoleSet,
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    ChallengeIssued,
    Authenticated,
}

impl SessionState {
    pub fn phase(&self) -> AuthPhase {
        match (&self.token, &self.pending_nonce) {
            (Some(_), _) => AuthPhase::Authenticated,
            (None, Some(_)) => AuthPhase::ChallengeIssued,
            (None, None) => AuthPhase::Anonymous,
        }
    }
}

/// Login flows and the derived session state.
#[derive(Clone)]
pub struct AuthSession {
    ctx: Arc<ClientContext>,
}

impl AuthSession {
    pub fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }

    pub fn state(&self) -> SessionState {
        self.ctx.session.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().phase() == AuthPhase::Authenticated
    }

    /// Fail with `Unauthorized` unless the current session holds `role`.
    pub fn require_role(&self, role: Role) -> NotifiResult<()> {
        self.state().roles.require(role)
    }

    /// Ask the service for a nonce and issue a new challenge.
    ///
    /// Returns the line the wallet UI should display.
    pub async fn begin_challenge(&self) -> NotifiResult<String> {
        let result = self
            .ctx
            .service
            .begin_log_in_by_transaction(BeginLoginViaTransactionInput {
                wallet_address: self.ctx.wallet_address.to_string(),
                wallet_blockchain: WalletBlockchain::Solana,
                dapp_address: self.ctx.dapp_address.clone(),
            })
            .await?;

        let server_nonce = result.and_then(|r| r.nonce).ok_or_else(|| {
            NotifiError::Protocol("service returned no login nonce".to_string())
        })?;

        let challenge = Challenge::new(&server_nonce);
        let mut state = self.ctx.session.get();
        if state.pending_nonce.is_some() {
            info!(wallet = %self.ctx.wallet_address, "replacing outstanding login challenge");
        }
        state.pending_nonce = Some(challenge.client_nonce);
        self.ctx.session.replace(state);

        info!(wallet = %self.ctx.wallet_address, "login challenge issued");
        Ok(challenge.log_value)
    }

    /// Finish the outstanding challenge with the wallet's transaction signature.
    pub async fn complete_challenge(&self, transaction_signature: &str) -> NotifiResult<User> {
        let pending = self.ctx.session.get().pending_nonce.ok_or_else(|| {
            NotifiError::Sequence(
                "begin_challenge must be called before complete_challenge".to_string(),
            )
        })?;

        let result = self
            .ctx
            .service
            .complete_log_in_by_transaction(CompleteLoginViaTransactionInput {
                wallet_address: self.ctx.wallet_address.to_string(),
                wallet_blockchain: WalletBlockchain::Solana,
                dapp_address: self.ctx.dapp_address.clone(),
                random_uuid: pending,
                transaction_signature: transaction_signature.to_string(),
            })
            .await;

        let mut state = self.ctx.session.get();
        state.pending_nonce = None;
        self.ctx.session.replace(state);

        let user = result?;
        self.handle_login_result(&user).await?;
        Ok(user)
    }

    /// Log in by signing the consent message directly.
    pub async fn direct_login(&self, signer: Option<&dyn MessageSigner>) -> NotifiResult<User> {
        let signer = signer
            .ok_or_else(|| NotifiError::InvalidArgument("signer cannot be absent".to_string()))?;

        let timestamp = Utc::now().timestamp();
        let wallet_address = self.ctx.wallet_address.to_string();
        let signature = sign(signer, &wallet_address, &self.ctx.dapp_address, timestamp).await?;

        let user = self
            .ctx
            .service
            .log_in_from_dapp(LogInFromDappInput {
                wallet_public_key: wallet_address,
                dapp_address: self.ctx.dapp_address.clone(),
                timestamp,
                signature,
            })
            .await?;

        self.handle_login_result(&user).await?;
        Ok(user)
    }

    /// Drop the token, the roles and the whole mirror.
    pub fn logout(&self) {
        self.ctx.service.set_jwt(None);
        self.ctx.mirror.clear();

        let mut state = self.ctx.session.get();
        state.token = None;
        state.roles = RoleSet::default();
        self.ctx.session.replace(state);

        info!(wallet = %self.ctx.wallet_address, "logged out");
    }

    /// Refetch every collection and replace the mirror with the result.
    pub async fn refresh(&self) -> NotifiResult<MirrorData> {
        let data = self.ctx.fetch_internal_data().await?;
        self.ctx.mirror.replace(Some(data.clone()));
        Ok(data)
    }

    async fn handle_login_result(&self, user: &User) -> NotifiResult<()> {
        let token = user.token().map(str::to_string);
        let roles: RoleSet = user.roles.iter().flatten().cloned().collect();

        match &token {
            Some(_) => info!(
                wallet = %self.ctx.wallet_address,
                roles = ?roles.iter().collect::<Vec<_>>(),
                "login accepted"
            ),
            None => warn!(wallet = %self.ctx.wallet_address, "login returned no token"),
        }

        let mut state = self.ctx.session.get();
        state.token = token.clone();
        state.roles = roles;
        self.ctx.session.replace(state);
        self.ctx.service.set_jwt(token);

        self.refresh().await?;
        Ok(())
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Notifi Client
//!
//! Entry point tying one wallet and one dapp to the remote service.
//!
//! ## Surfaces
//!
//! - [`NotifiClient::auth`]: login, logout and session state
//! - [`NotifiClient::resources`]: idempotent source/target/alert management
//! - [`NotifiClient::mirror`]: the local copy of remote collections
//!
//! plus a handful of pass-through reads and the signed broadcast.

mod broadcast;

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthSession, Role, SessionState};
use crate::config::NotifiConfig;
use crate::context::ClientContext;
use crate::error::{NotifiError, NotifiResult};
use crate::models::{ClientConfiguration, Source, UserTopic, WalletAddress};
use crate::reconcile::ResourceReconciler;
use crate::service::{CreateSourceInput, GraphQlService, NotifiService};
use crate::store::{Container, Mirror, MirrorData, MirrorStrategy};

pub use broadcast::BroadcastRequest;

pub struct NotifiClient {
    ctx: Arc<ClientContext>,
    auth: AuthSession,
    resources: ResourceReconciler,
}

impl NotifiClient {
    pub fn new(
        dapp_address: impl Into<String>,
        wallet_address: impl Into<WalletAddress>,
        service: Arc<dyn NotifiService>,
        strategy: MirrorStrategy,
    ) -> Self {
        let ctx = Arc::new(ClientContext {
            dapp_address: dapp_address.into(),
            wallet_address: wallet_address.into(),
            service,
            session: Arc::new(Container::new(SessionState::default())),
            mirror: Arc::new(Mirror::new(strategy)),
        });

        Self {
            auth: AuthSession::new(ctx.clone()),
            resources: ResourceReconciler::new(ctx.clone()),
            ctx,
        }
    }

    /// Client over the GraphQL transport described by `config`.
    pub fn from_config(
        config: &NotifiConfig,
        wallet_address: impl Into<WalletAddress>,
        strategy: MirrorStrategy,
    ) -> NotifiResult<Self> {
        let service = GraphQlService::from_config(config)?;
        info!(
            environment = ?config.environment,
            endpoint = %service.endpoint(),
            "notifi client configured"
        );
        Ok(Self::new(
            config.dapp_address.clone(),
            wallet_address,
            Arc::new(service),
            strategy,
        ))
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn resources(&self) -> &ResourceReconciler {
        &self.resources
    }

    pub fn mirror(&self) -> &Mirror {
        &self.ctx.mirror
    }

    pub fn state(&self) -> SessionState {
        self.auth.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn wallet_address(&self) -> &WalletAddress {
        &self.ctx.wallet_address
    }

    /// Refetch every collection into the mirror without a login transition.
    pub async fn fetch_data(&self) -> NotifiResult<MirrorData> {
        self.auth.refresh().await
    }

    /// Find the named source or create it. See [`ResourceReconciler::ensure_source`].
    pub async fn create_source(&self, input: CreateSourceInput) -> NotifiResult<Source> {
        self.resources.ensure_source(input).await
    }

    pub async fn get_configuration(&self) -> NotifiResult<ClientConfiguration> {
        Ok(self
            .ctx
            .service
            .get_configuration_for_dapp(&self.ctx.dapp_address)
            .await?)
    }

    /// Broadcast topics of the dapp. Requires [`Role::UserMessenger`].
    pub async fn get_topics(&self) -> NotifiResult<Vec<UserTopic>> {
        self.auth.require_role(Role::UserMessenger)?;
        Ok(self.ctx.service.get_topics().await?)
    }

    /// Ask the service to (re)send the confirmation email of a target.
    pub async fn send_email_target_verification(&self, target_id: &str) -> NotifiResult<String> {
        let result = self
            .ctx
            .service
            .send_email_target_verification_request(target_id)
            .await?;

        let id = result.and_then(|result| result.id).ok_or_else(|| {
            NotifiError::Protocol(format!("no verification id returned for target {target_id}"))
        })?;
        info!(target_id, "email verification requested");
        Ok(id)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! State shared by the session and the reconciler.

use std::sync::Arc;

use tracing::debug;

use crate::auth::SessionState;
use crate::error::NotifiResult;
use crate::models::WalletAddress;
use crate::reconcile::plan::dedup_by_key;
use crate::service::NotifiService;
use crate::store::{Container, Mirror, MirrorData};

pub struct ClientContext {
    pub dapp_address: String,
    pub wallet_address: WalletAddress,
    pub service: Arc<dyn NotifiService>,
    pub session: Arc<Container<SessionState>>,
    pub mirror: Arc<Mirror>,
}

impl ClientContext {
    /// Fetch every top-level collection concurrently. Any failure fails the
    /// whole refresh.
    pub async fn fetch_internal_data(&self) -> NotifiResult<MirrorData> {
        let service = &self.service;
        let (
            alerts,
            sources,
            source_groups,
            target_groups,
            email_targets,
            sms_targets,
            telegram_targets,
        ) = tokio::try_join!(
            service.get_alerts(),
            service.get_sources(),
            service.get_source_groups(),
            service.get_target_groups(),
            service.get_email_targets(),
            service.get_sms_targets(),
            service.get_telegram_targets(),
        )?;

        let filters = dedup_by_key(
            sources
                .iter()
                .flat_map(|source| source.applicable_filters.iter().cloned()),
            |filter| filter.id.clone(),
        );

        debug!(
            alerts = alerts.len(),
            sources = sources.len(),
            filters = filters.len(),
            "fetched notifi data"
        );

        Ok(MirrorData {
            alerts,
            filters,
            sources,
            source_groups,
            target_groups,
            email_targets,
            sms_targets,
            telegram_targets,
        })
    }
}

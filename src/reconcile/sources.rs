// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sources and source groups.

use tracing::{debug, info};

use super::plan::{appended, decide, replaced, Decision};
use super::sets::set_equal;
use super::ResourceReconciler;
use crate::error::{NotifiError, NotifiResult};
use crate::models::{Source, SourceGroup, SourceType};
use crate::service::{CreateSourceInput, SourceGroupInput};

/// Separator between the display part and the on-chain part of an auction
/// source's address.
const AUCTION_ADDRESS_SEPARATOR: &str = ":;:";

impl ResourceReconciler {
    /// Find a source by name or create it. Sources are never updated: a
    /// same-named source with another address or type is a `Conflict`.
    pub async fn ensure_source(&self, input: CreateSourceInput) -> NotifiResult<Source> {
        let sources = self.ctx.service.get_sources().await?;

        let position = sources
            .iter()
            .position(|source| source.name.as_deref() == Some(input.name.as_str()));

        if let Some(index) = position {
            let existing = sources[index].clone();
            if existing.blockchain_address.as_deref() != Some(input.blockchain_address.as_str())
                || existing.source_type != input.source_type
            {
                return Err(NotifiError::Conflict(format!(
                    "source {} already exists with a different address or type",
                    input.name
                )));
            }

            debug!(source = %input.name, "source already exists");
            self.ctx.mirror.write_back(|data| data.sources = sources);
            return Ok(existing);
        }

        let created = self.ctx.service.create_source(input).await?;
        info!(source_id = ?created.id, name = ?created.name, "created source");

        let next = appended(&sources, created.clone());
        self.ctx.mirror.write_back(|data| data.sources = next);
        Ok(created)
    }

    /// Source watching a Metaplex auction, named by the auction address.
    pub async fn create_metaplex_auction_source(
        &self,
        auction_address: &str,
        auction_web_url: &str,
    ) -> NotifiResult<Source> {
        self.ensure_source(CreateSourceInput {
            name: auction_address.to_string(),
            blockchain_address: format!(
                "{auction_web_url}{AUCTION_ADDRESS_SEPARATOR}{auction_address}"
            ),
            source_type: SourceType::SolanaMetaplexAuction,
        })
        .await
    }

    /// Source watching a Bonfida auction, named by the auction address.
    pub async fn create_bonfida_auction_source(
        &self,
        auction_address: &str,
        auction_name: &str,
    ) -> NotifiResult<Source> {
        self.ensure_source(CreateSourceInput {
            name: auction_address.to_string(),
            blockchain_address: format!(
                "{auction_name}{AUCTION_ADDRESS_SEPARATOR}{auction_address}"
            ),
            source_type: SourceType::SolanaBonfidaAuction,
        })
        .await
    }

    /// Make the source group `name` hold exactly `source_ids`.
    pub async fn ensure_source_group(
        &self,
        name: &str,
        source_ids: &[String],
    ) -> NotifiResult<SourceGroup> {
        let groups = self.ctx.service.get_source_groups().await?;

        let decision = decide(
            &groups,
            |group| group.name.as_deref() == Some(name),
            |group| set_equal(source_ids.iter().map(String::as_str), group.source_ids()),
        );

        match decision {
            Decision::Create => {
                let created = self
                    .ctx
                    .service
                    .create_source_group(SourceGroupInput {
                        id: None,
                        name: name.to_string(),
                        source_ids: source_ids.to_vec(),
                    })
                    .await?;
                info!(source_group_id = ?created.id, name, "created source group");

                let next = appended(&groups, created.clone());
                self.ctx.mirror.write_back(|data| data.source_groups = next);
                Ok(created)
            }
            Decision::Keep(index) => {
                debug!(name, "source group already up to date");
                let existing = groups[index].clone();
                self.ctx.mirror.write_back(|data| data.source_groups = groups);
                Ok(existing)
            }
            Decision::Update { index, id } => {
                let updated = self
                    .ctx
                    .service
                    .update_source_group(SourceGroupInput {
                        id: Some(id.clone()),
                        name: name.to_string(),
                        source_ids: source_ids.to_vec(),
                    })
                    .await?;
                info!(source_group_id = %id, name, "updated source group membership");

                let next = replaced(&groups, index, updated.clone());
                self.ctx.mirror.write_back(|data| data.source_groups = next);
                Ok(updated)
            }
        }
    }
}

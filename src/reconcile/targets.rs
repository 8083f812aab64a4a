// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Delivery targets and target groups.
//!
//! Targets are keyed by their address (email compared case-insensitively,
//! phone number and Telegram id exactly) and are only ever found or created.

use std::future::Future;

use tracing::{debug, info};

use super::plan::{appended, decide, replaced, Decision};
use super::sets::set_equal;
use super::ResourceReconciler;
use crate::error::NotifiResult;
use crate::models::{EmailTarget, Resource, SmsTarget, TargetGroup, TargetSpec, TelegramTarget};
use crate::service::{CreateTargetInput, ServiceResult, TargetGroupInput};
use crate::store::MirrorData;

impl ResourceReconciler {
    pub async fn ensure_email_target(&self, email_address: &str) -> NotifiResult<EmailTarget> {
        let targets = self.ctx.service.get_email_targets().await?;
        let wanted = email_address.to_lowercase();
        self.find_or_create_target(
            "email",
            targets,
            |target: &EmailTarget| {
                target
                    .email_address
                    .as_deref()
                    .is_some_and(|address| address.to_lowercase() == wanted)
            },
            || {
                self.ctx
                    .service
                    .create_email_target(target_input(email_address))
            },
            |data, targets| data.email_targets = targets,
        )
        .await
    }

    pub async fn ensure_sms_target(&self, phone_number: &str) -> NotifiResult<SmsTarget> {
        let targets = self.ctx.service.get_sms_targets().await?;
        self.find_or_create_target(
            "sms",
            targets,
            |target: &SmsTarget| target.phone_number.as_deref() == Some(phone_number),
            || self.ctx.service.create_sms_target(target_input(phone_number)),
            |data, targets| data.sms_targets = targets,
        )
        .await
    }

    pub async fn ensure_telegram_target(&self, telegram_id: &str) -> NotifiResult<TelegramTarget> {
        let targets = self.ctx.service.get_telegram_targets().await?;
        self.find_or_create_target(
            "telegram",
            targets,
            |target: &TelegramTarget| target.telegram_id.as_deref() == Some(telegram_id),
            || {
                self.ctx
                    .service
                    .create_telegram_target(target_input(telegram_id))
            },
            |data, targets| data.telegram_targets = targets,
        )
        .await
    }

    /// Make the target group `name` hold exactly the targets in `spec`,
    /// creating any missing target first.
    pub async fn ensure_target_group(
        &self,
        name: &str,
        spec: &TargetSpec,
    ) -> NotifiResult<TargetGroup> {
        let email_target_ids = match &spec.email_address {
            Some(address) => ids(self.ensure_email_target(address).await?),
            None => Vec::new(),
        };
        let sms_target_ids = match &spec.phone_number {
            Some(number) => ids(self.ensure_sms_target(number).await?),
            None => Vec::new(),
        };
        let telegram_target_ids = match &spec.telegram_id {
            Some(telegram_id) => ids(self.ensure_telegram_target(telegram_id).await?),
            None => Vec::new(),
        };

        let groups = self.ctx.service.get_target_groups().await?;

        let decision = decide(
            &groups,
            |group| group.name.as_deref() == Some(name),
            |group| {
                same_members(&group.email_targets, &email_target_ids)
                    && same_members(&group.sms_targets, &sms_target_ids)
                    && same_members(&group.telegram_targets, &telegram_target_ids)
            },
        );

        let mut input = TargetGroupInput {
            id: None,
            name: name.to_string(),
            email_target_ids,
            sms_target_ids,
            telegram_target_ids,
        };

        match decision {
            Decision::Create => {
                let created = self.ctx.service.create_target_group(input).await?;
                info!(target_group_id = ?created.id, name, "created target group");

                let next = appended(&groups, created.clone());
                self.ctx.mirror.write_back(|data| data.target_groups = next);
                Ok(created)
            }
            Decision::Keep(index) => {
                debug!(name, "target group already up to date");
                let existing = groups[index].clone();
                self.ctx.mirror.write_back(|data| data.target_groups = groups);
                Ok(existing)
            }
            Decision::Update { index, id } => {
                input.id = Some(id.clone());
                let updated = self.ctx.service.update_target_group(input).await?;
                info!(target_group_id = %id, name, "updated target group membership");

                let next = replaced(&groups, index, updated.clone());
                self.ctx.mirror.write_back(|data| data.target_groups = next);
                Ok(updated)
            }
        }
    }

    /// `create` is only called when no target matches.
    async fn find_or_create_target<T, M, C, F>(
        &self,
        kind: &'static str,
        targets: Vec<T>,
        matches: M,
        create: C,
        store: fn(&mut MirrorData, Vec<T>),
    ) -> NotifiResult<T>
    where
        T: Clone + Resource,
        M: Fn(&T) -> bool,
        C: FnOnce() -> F,
        F: Future<Output = ServiceResult<T>>,
    {
        if let Some(index) = targets.iter().position(matches) {
            debug!(kind, "target already exists");
            let existing = targets[index].clone();
            self.ctx.mirror.write_back(|data| store(data, targets));
            return Ok(existing);
        }

        let created = create().await?;
        info!(kind, target_id = ?created.id(), "created target");

        let next = appended(&targets, created.clone());
        self.ctx.mirror.write_back(|data| store(data, next));
        Ok(created)
    }
}

/// Targets are named after the address they deliver to.
fn target_input(value: &str) -> CreateTargetInput {
    CreateTargetInput {
        name: value.to_string(),
        value: value.to_string(),
    }
}

fn ids<T: Resource>(target: T) -> Vec<String> {
    target.id().map(str::to_string).into_iter().collect()
}

fn same_members<T: Resource>(members: &[T], wanted: &[String]) -> bool {
    set_equal(
        members.iter().filter_map(Resource::id),
        wanted.iter().map(String::as_str),
    )
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Alert create/update/delete, composed from the group ensures.

use tracing::{debug, info};

use super::plan::{appended, replaced};
use super::ResourceReconciler;
use crate::error::{NotifiError, NotifiResult};
use crate::models::{Alert, FilterOptions, TargetSpec};
use crate::service::CreateAlertInput;

/// Group name used when the caller does not supply one.
const DEFAULT_ALERT_GROUP: &str = "default";

/// Desired state of a new alert.
#[derive(Debug, Clone, Default)]
pub struct CreateAlertRequest {
    /// Unique among the user's alerts; also names both groups.
    pub name: String,
    pub source_id: String,
    pub filter_id: String,
    pub filter_options: Option<FilterOptions>,
    pub targets: TargetSpec,
    pub group_name: Option<String>,
}

impl ResourceReconciler {
    /// Create an alert plus its source and target groups.
    ///
    /// Fails with `DuplicateName` before touching any group when an alert of
    /// the same name exists.
    pub async fn create_alert(&self, request: CreateAlertRequest) -> NotifiResult<Alert> {
        let alerts = self.ctx.service.get_alerts().await?;
        if alerts
            .iter()
            .any(|alert| alert.name.as_deref() == Some(request.name.as_str()))
        {
            return Err(NotifiError::DuplicateName(format!(
                "an alert named {} already exists",
                request.name
            )));
        }

        let source_ids = [request.source_id.clone()];
        let (source_group, target_group) = tokio::try_join!(
            self.ensure_source_group(&request.name, &source_ids),
            self.ensure_target_group(&request.name, &request.targets),
        )?;

        let (source_group_id, target_group_id) = match (source_group.id, target_group.id) {
            (Some(source_group_id), Some(target_group_id)) => (source_group_id, target_group_id),
            _ => {
                return Err(NotifiError::InvariantViolation(format!(
                    "groups for alert {} were returned without ids",
                    request.name
                )))
            }
        };

        let filter_options = request
            .filter_options
            .as_ref()
            .map(FilterOptions::pack)
            .unwrap_or_else(|| FilterOptions::default().pack());

        let created = self
            .ctx
            .service
            .create_alert(CreateAlertInput {
                name: request.name.clone(),
                source_group_id,
                filter_id: request.filter_id,
                filter_options,
                target_group_id,
                group_name: request
                    .group_name
                    .unwrap_or_else(|| DEFAULT_ALERT_GROUP.to_string()),
            })
            .await?;
        info!(alert_id = ?created.id, name = %request.name, "created alert");

        let next = appended(&alerts, created.clone());
        self.ctx.mirror.write_back(|data| data.alerts = next);
        Ok(created)
    }

    /// Change the delivery targets of an alert.
    ///
    /// Only the membership of the alert's current target group may change;
    /// resolving to any other group is `ImmutableReference`.
    pub async fn update_alert(&self, alert_id: &str, targets: &TargetSpec) -> NotifiResult<Alert> {
        let alerts = self.ctx.service.get_alerts().await?;

        let index = alerts
            .iter()
            .position(|alert| alert.id.as_deref() == Some(alert_id))
            .ok_or_else(|| NotifiError::NotFound(format!("alert {alert_id}")))?;
        let alert = &alerts[index];

        let group_name = alert.target_group.name.clone().ok_or_else(|| {
            NotifiError::NotFound(format!("target group name of alert {alert_id}"))
        })?;

        let ensured = self.ensure_target_group(&group_name, targets).await?;
        if ensured.id != alert.target_group.id {
            return Err(NotifiError::ImmutableReference(format!(
                "alert {alert_id} references target group {:?}, not {:?}",
                alert.target_group.id, ensured.id
            )));
        }

        let updated = Alert {
            target_group: ensured,
            ..alert.clone()
        };
        debug!(alert_id, group = %group_name, "alert targets reconciled");

        let next = replaced(&alerts, index, updated.clone());
        self.ctx.mirror.write_back(|data| data.alerts = next);
        Ok(updated)
    }

    /// Delete an alert and, unless kept, its source and target groups.
    ///
    /// Returns the deleted alert's id.
    pub async fn delete_alert(
        &self,
        alert_id: &str,
        keep_source_group: bool,
        keep_target_group: bool,
    ) -> NotifiResult<String> {
        let alerts = self.ctx.service.get_alerts().await?;
        let alert = alerts
            .iter()
            .find(|alert| alert.id.as_deref() == Some(alert_id))
            .cloned()
            .ok_or_else(|| NotifiError::NotFound(format!("alert {alert_id}")))?;

        let result = self.ctx.service.delete_alert(alert_id).await?;
        info!(alert_id, "deleted alert");

        let source_groups = match (keep_source_group, alert.source_group.id.as_deref()) {
            (false, Some(id)) => {
                self.ctx.service.delete_source_group(id).await?;
                info!(source_group_id = id, "deleted source group");
                Some(self.ctx.service.get_source_groups().await?)
            }
            _ => None,
        };

        let target_groups = match (keep_target_group, alert.target_group.id.as_deref()) {
            (false, Some(id)) => {
                self.ctx.service.delete_target_group(id).await?;
                info!(target_group_id = id, "deleted target group");
                Some(self.ctx.service.get_target_groups().await?)
            }
            _ => None,
        };

        let remaining: Vec<Alert> = alerts
            .into_iter()
            .filter(|alert| alert.id.as_deref() != Some(alert_id))
            .collect();

        self.ctx.mirror.write_back(|data| {
            data.alerts = remaining;
            if let Some(groups) = source_groups {
                data.source_groups = groups;
            }
            if let Some(groups) = target_groups {
                data.target_groups = groups;
            }
        });

        Ok(result.id.unwrap_or_else(|| alert_id.to_string()))
    }
}

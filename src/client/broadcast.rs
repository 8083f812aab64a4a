// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed broadcast to a topic's subscribers.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use super::NotifiClient;
use crate::auth::signing::sign;
use crate::auth::MessageSigner;
use crate::error::{NotifiError, NotifiResult};
use crate::models::{UserTopic, WalletBlockchain};
use crate::service::{BroadcastMessageInput, KeyValue};

const MESSAGE_VARIABLE: &str = "message";
const SUBJECT_VARIABLE: &str = "subject";
const TARGET_COLLECTION_VARIABLE: &str = "TargetCollection";

const RESERVED_VARIABLES: [&str; 3] = [
    MESSAGE_VARIABLE,
    SUBJECT_VARIABLE,
    TARGET_COLLECTION_VARIABLE,
];

/// Channels a topic's target template fans out to.
const TEMPLATE_CHANNELS: [&str; 3] = ["EMAIL", "SMS", "TELEGRAM"];

/// A message for every subscriber of `topic`.
#[derive(Debug, Clone, Default)]
pub struct BroadcastRequest {
    pub topic: UserTopic,
    pub subject: String,
    pub message: String,
    /// Restrict delivery to holders of the topic's target collections.
    pub is_holder_only: bool,
    /// Extra template variables. Reserved names are ignored.
    pub variables: BTreeMap<String, String>,
}

impl BroadcastRequest {
    fn build_variables(&self) -> NotifiResult<Vec<KeyValue>> {
        let mut variables = vec![
            KeyValue::new(MESSAGE_VARIABLE, self.message.as_str()),
            KeyValue::new(SUBJECT_VARIABLE, self.subject.as_str()),
        ];

        if self.is_holder_only {
            if let Some(collections) = &self.topic.target_collections {
                let encoded = serde_json::to_string(collections).map_err(|e| {
                    NotifiError::InvalidArgument(format!("cannot encode target collections: {e}"))
                })?;
                variables.push(KeyValue::new(TARGET_COLLECTION_VARIABLE, encoded));
            }
        }

        variables.extend(
            self.variables
                .iter()
                .filter(|(key, _)| !RESERVED_VARIABLES.contains(&key.as_str()))
                .map(|(key, value)| KeyValue::new(key.as_str(), value.as_str())),
        );
        Ok(variables)
    }

    fn target_templates(&self) -> Option<Vec<KeyValue>> {
        self.topic.target_template.as_ref().map(|template| {
            TEMPLATE_CHANNELS
                .iter()
                .map(|channel| KeyValue::new(*channel, template.as_str()))
                .collect()
        })
    }
}

impl NotifiClient {
    /// Sign and send a broadcast. Returns the server-assigned message id.
    pub async fn broadcast_message(
        &self,
        request: &BroadcastRequest,
        signer: &dyn MessageSigner,
    ) -> NotifiResult<Option<String>> {
        let topic_name = request
            .topic
            .topic_name
            .clone()
            .ok_or_else(|| NotifiError::InvalidTopic("topic has no name".to_string()))?;

        let variables = request.build_variables()?;
        let target_templates = request.target_templates();

        let timestamp = Utc::now().timestamp();
        let signature = sign(
            signer,
            self.ctx.wallet_address.as_ref(),
            &self.ctx.dapp_address,
            timestamp,
        )
        .await?;

        let result = self
            .ctx
            .service
            .broadcast_message(BroadcastMessageInput {
                topic_name: topic_name.clone(),
                target_templates,
                timestamp,
                variables,
                wallet_blockchain: WalletBlockchain::OffChain,
                signature,
            })
            .await?;

        info!(topic = %topic_name, message_id = ?result.id, "broadcast sent");
        Ok(result.id)
    }
}

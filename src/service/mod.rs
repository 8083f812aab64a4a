// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote notification service boundary.
//!
//! The client only needs request/response CRUD per resource kind, the two
//! login flows, a bearer-token setter and a broadcast call. [`NotifiService`]
//! captures exactly that; [`GraphQlService`] is the HTTP implementation.

pub mod graphql;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{
    Alert, ClientConfiguration, EmailTarget, SmsTarget, Source, SourceGroup, SourceType,
    TargetGroup, TelegramTarget, User, UserTopic, WalletBlockchain,
};

pub use graphql::GraphQlService;

/// Failures of the remote call itself.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service request failed: {0}")]
    Request(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service request could not be encoded: {0}")]
    InvalidRequest(String),

    #[error("service response was invalid: {0}")]
    InvalidResponse(String),

    #[error("service rejected the operation: {0}")]
    GraphQl(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Login Inputs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginLoginViaTransactionInput {
    pub wallet_address: String,
    pub wallet_blockchain: WalletBlockchain,
    pub dapp_address: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeginLoginViaTransactionResult {
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLoginViaTransactionInput {
    pub wallet_address: String,
    pub wallet_blockchain: WalletBlockchain,
    pub dapp_address: String,
    pub random_uuid: String,
    pub transaction_signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInFromDappInput {
    pub wallet_public_key: String,
    pub dapp_address: String,
    pub timestamp: i64,
    pub signature: String,
}

// =============================================================================
// Resource Inputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceInput {
    pub name: String,
    pub blockchain_address: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroupInput {
    /// Set on update, absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub source_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email_target_ids: Vec<String>,
    pub sms_target_ids: Vec<String>,
    pub telegram_target_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTargetInput {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertInput {
    pub name: String,
    pub source_group_id: String,
    pub filter_id: String,
    pub filter_options: String,
    pub target_group_id: String,
    pub group_name: String,
}

/// Id echoed back by delete and fire-and-forget operations.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct IdResult {
    pub id: Option<String>,
}

// =============================================================================
// Broadcast Inputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessageInput {
    pub topic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_templates: Option<Vec<KeyValue>>,
    pub timestamp: i64,
    pub variables: Vec<KeyValue>,
    pub wallet_blockchain: WalletBlockchain,
    pub signature: String,
}

/// Operations the client needs from the remote notification service.
#[async_trait]
pub trait NotifiService: Send + Sync {
    /// Bearer token attached to every subsequent call; `None` clears it.
    fn set_jwt(&self, token: Option<String>);

    async fn begin_log_in_by_transaction(
        &self,
        input: BeginLoginViaTransactionInput,
    ) -> ServiceResult<Option<BeginLoginViaTransactionResult>>;

    async fn complete_log_in_by_transaction(
        &self,
        input: CompleteLoginViaTransactionInput,
    ) -> ServiceResult<User>;

    async fn log_in_from_dapp(&self, input: LogInFromDappInput) -> ServiceResult<User>;

    async fn get_alerts(&self) -> ServiceResult<Vec<Alert>>;
    async fn create_alert(&self, input: CreateAlertInput) -> ServiceResult<Alert>;
    async fn delete_alert(&self, id: &str) -> ServiceResult<IdResult>;

    async fn get_sources(&self) -> ServiceResult<Vec<Source>>;
    async fn create_source(&self, input: CreateSourceInput) -> ServiceResult<Source>;

    async fn get_source_groups(&self) -> ServiceResult<Vec<SourceGroup>>;
    async fn create_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup>;
    async fn update_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup>;
    async fn delete_source_group(&self, id: &str) -> ServiceResult<IdResult>;

    async fn get_target_groups(&self) -> ServiceResult<Vec<TargetGroup>>;
    async fn create_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup>;
    async fn update_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup>;
    async fn delete_target_group(&self, id: &str) -> ServiceResult<IdResult>;

    async fn get_email_targets(&self) -> ServiceResult<Vec<EmailTarget>>;
    async fn create_email_target(&self, input: CreateTargetInput) -> ServiceResult<EmailTarget>;
    async fn get_sms_targets(&self) -> ServiceResult<Vec<SmsTarget>>;
    async fn create_sms_target(&self, input: CreateTargetInput) -> ServiceResult<SmsTarget>;
    async fn get_telegram_targets(&self) -> ServiceResult<Vec<TelegramTarget>>;
    async fn create_telegram_target(
        &self,
        input: CreateTargetInput,
    ) -> ServiceResult<TelegramTarget>;

    async fn send_email_target_verification_request(
        &self,
        target_id: &str,
    ) -> ServiceResult<Option<IdResult>>;

    async fn get_topics(&self) -> ServiceResult<Vec<UserTopic>>;
    async fn broadcast_message(&self, input: BroadcastMessageInput) -> ServiceResult<IdResult>;

    async fn get_configuration_for_dapp(
        &self,
        dapp_address: &str,
    ) -> ServiceResult<ClientConfiguration>;
}

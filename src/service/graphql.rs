// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL-over-HTTP implementation of [`NotifiService`].
//!
//! Every operation is one named document POSTed to the configured endpoint.
//! Responses are unwrapped from `{"data": {"<field>": ...}}`; a non-empty
//! `errors` array fails the call even when partial data is present.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{
    BeginLoginViaTransactionInput, BeginLoginViaTransactionResult, BroadcastMessageInput,
    CompleteLoginViaTransactionInput, CreateAlertInput, CreateSourceInput, CreateTargetInput,
    IdResult, LogInFromDappInput, NotifiService, ServiceError, ServiceResult, SourceGroupInput,
    TargetGroupInput,
};
use crate::config::NotifiConfig;
use crate::models::{
    Alert, ClientConfiguration, EmailTarget, SmsTarget, Source, SourceGroup, TargetGroup,
    TelegramTarget, User, UserTopic,
};

// =============================================================================
// Documents
// =============================================================================

const FILTER_FIELDS: &str = "id name filterType";
const SOURCE_FIELDS: &str =
    "id name blockchainAddress type applicableFilters { id name filterType }";
const EMAIL_TARGET_FIELDS: &str = "id name emailAddress isConfirmed";
const SMS_TARGET_FIELDS: &str = "id name phoneNumber isConfirmed";
const TELEGRAM_TARGET_FIELDS: &str = "id name telegramId isConfirmed confirmationUrl";
const USER_FIELDS: &str = "email emailConfirmed authorization { token expiry } roles";

fn source_group_fields() -> String {
    format!("id name sources {{ {SOURCE_FIELDS} }}")
}

fn target_group_fields() -> String {
    format!(
        "id name emailTargets {{ {EMAIL_TARGET_FIELDS} }} smsTargets {{ {SMS_TARGET_FIELDS} }} \
         telegramTargets {{ {TELEGRAM_TARGET_FIELDS} }}"
    )
}

fn alert_fields() -> String {
    format!(
        "id name groupName filterOptions filter {{ {FILTER_FIELDS} }} \
         sourceGroup {{ {} }} targetGroup {{ {} }}",
        source_group_fields(),
        target_group_fields()
    )
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// HTTP client for the Notifi GraphQL API.
#[derive(Debug)]
pub struct GraphQlService {
    endpoint: Url,
    http: Client,
    jwt: RwLock<Option<String>>,
}

impl GraphQlService {
    pub fn new(endpoint: Url, timeout: Duration) -> ServiceResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            http,
            jwt: RwLock::new(None),
        })
    }

    pub fn from_config(config: &NotifiConfig) -> ServiceResult<Self> {
        Self::new(config.gql_url.clone(), config.http_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn bearer(&self) -> Option<String> {
        self.jwt
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run one document and decode `data.<field>`.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        document: String,
        variables: Value,
        field: &str,
    ) -> ServiceResult<T> {
        debug!(operation, "notifi request");

        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .header("X-Gql-Operation-Name", operation)
            .json(&json!({
                "operationName": operation,
                "query": document,
                "variables": variables,
            }));
        if let Some(token) = self.bearer() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Request(format!("{operation} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = error_body(operation, response.text().await);
            return Err(ServiceError::Status { status, body });
        }

        let body: GraphQlResponse = response.json().await.map_err(|e| {
            ServiceError::InvalidResponse(format!("{operation} invalid JSON: {e}"))
        })?;

        decode_field(operation, body, field)
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        field: &str,
        selection: &str,
    ) -> ServiceResult<T> {
        let document = format!("query {operation} {{ {field} {{ {selection} }} }}");
        self.execute(operation, document, json!({}), field).await
    }

    async fn mutate<T: DeserializeOwned>(
        &self,
        operation: &str,
        field: &str,
        input_type: &str,
        input: Value,
        selection: &str,
    ) -> ServiceResult<T> {
        let document = format!(
            "mutation {operation}($input: {input_type}!) {{ {field}(input: $input) {{ {selection} }} }}"
        );
        self.execute(operation, document, json!({ "input": input }), field)
            .await
    }
}

/// Body of a non-2xx response; a failed read is reported in its place.
fn error_body<E: std::fmt::Display>(operation: &str, body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        debug!(operation, error = %e, "failed to read error response body");
        format!("<unreadable body: {e}>")
    })
}

fn to_value<T: serde::Serialize>(input: &T) -> ServiceResult<Value> {
    serde_json::to_value(input)
        .map_err(|e| ServiceError::InvalidRequest(format!("serialize input failed: {e}")))
}

fn decode_field<T: DeserializeOwned>(
    operation: &str,
    body: GraphQlResponse,
    field: &str,
) -> ServiceResult<T> {
    if !body.errors.is_empty() {
        let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
        return Err(ServiceError::GraphQl(messages.join("; ")));
    }

    let value = body
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .unwrap_or(Value::Null);

    serde_json::from_value(value).map_err(|e| {
        ServiceError::InvalidResponse(format!("{operation} returned unexpected {field}: {e}"))
    })
}

#[async_trait]
impl NotifiService for GraphQlService {
    fn set_jwt(&self, token: Option<String>) {
        *self.jwt.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn begin_log_in_by_transaction(
        &self,
        input: BeginLoginViaTransactionInput,
    ) -> ServiceResult<Option<BeginLoginViaTransactionResult>> {
        self.mutate(
            "beginLogInByTransaction",
            "beginLogInByTransaction",
            "BeginLogInByTransactionInput",
            to_value(&input)?,
            "nonce",
        )
        .await
    }

    async fn complete_log_in_by_transaction(
        &self,
        input: CompleteLoginViaTransactionInput,
    ) -> ServiceResult<User> {
        self.mutate(
            "completeLogInByTransaction",
            "completeLogInByTransaction",
            "CompleteLogInByTransactionInput",
            to_value(&input)?,
            USER_FIELDS,
        )
        .await
    }

    async fn log_in_from_dapp(&self, input: LogInFromDappInput) -> ServiceResult<User> {
        self.mutate(
            "logInFromDapp",
            "logInFromDapp",
            "LogInFromDappInput",
            to_value(&input)?,
            USER_FIELDS,
        )
        .await
    }

    async fn get_alerts(&self) -> ServiceResult<Vec<Alert>> {
        self.query("getAlerts", "alert", &alert_fields()).await
    }

    async fn create_alert(&self, input: CreateAlertInput) -> ServiceResult<Alert> {
        self.mutate(
            "createAlert",
            "createAlert",
            "CreateAlertInput",
            to_value(&input)?,
            &alert_fields(),
        )
        .await
    }

    async fn delete_alert(&self, id: &str) -> ServiceResult<IdResult> {
        let document = "mutation deleteAlert($id: String!) { deleteAlert(alertId: $id) { id } }";
        self.execute("deleteAlert", document.to_string(), json!({ "id": id }), "deleteAlert")
            .await
    }

    async fn get_sources(&self) -> ServiceResult<Vec<Source>> {
        self.query("getSources", "source", SOURCE_FIELDS).await
    }

    async fn create_source(&self, input: CreateSourceInput) -> ServiceResult<Source> {
        self.mutate(
            "createSource",
            "createSource",
            "CreateSourceInput",
            to_value(&input)?,
            SOURCE_FIELDS,
        )
        .await
    }

    async fn get_source_groups(&self) -> ServiceResult<Vec<SourceGroup>> {
        self.query("getSourceGroups", "sourceGroup", &source_group_fields())
            .await
    }

    async fn create_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup> {
        self.mutate(
            "createSourceGroup",
            "createSourceGroup",
            "CreateSourceGroupInput",
            to_value(&input)?,
            &source_group_fields(),
        )
        .await
    }

    async fn update_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup> {
        self.mutate(
            "updateSourceGroup",
            "updateSourceGroup",
            "UpdateSourceGroupInput",
            to_value(&input)?,
            &source_group_fields(),
        )
        .await
    }

    async fn delete_source_group(&self, id: &str) -> ServiceResult<IdResult> {
        self.mutate(
            "deleteSourceGroup",
            "deleteSourceGroup",
            "DeleteSourceGroupInput",
            json!({ "id": id }),
            "id",
        )
        .await
    }

    async fn get_target_groups(&self) -> ServiceResult<Vec<TargetGroup>> {
        self.query("getTargetGroups", "targetGroup", &target_group_fields())
            .await
    }

    async fn create_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup> {
        self.mutate(
            "createTargetGroup",
            "createTargetGroup",
            "CreateTargetGroupInput",
            to_value(&input)?,
            &target_group_fields(),
        )
        .await
    }

    async fn update_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup> {
        self.mutate(
            "updateTargetGroup",
            "updateTargetGroup",
            "UpdateTargetGroupInput",
            to_value(&input)?,
            &target_group_fields(),
        )
        .await
    }

    async fn delete_target_group(&self, id: &str) -> ServiceResult<IdResult> {
        self.mutate(
            "deleteTargetGroup",
            "deleteTargetGroup",
            "DeleteTargetGroupInput",
            json!({ "id": id }),
            "id",
        )
        .await
    }

    async fn get_email_targets(&self) -> ServiceResult<Vec<EmailTarget>> {
        self.query("getEmailTargets", "emailTarget", EMAIL_TARGET_FIELDS)
            .await
    }

    async fn create_email_target(&self, input: CreateTargetInput) -> ServiceResult<EmailTarget> {
        self.mutate(
            "createEmailTarget",
            "createEmailTarget",
            "CreateEmailTargetInput",
            to_value(&input)?,
            EMAIL_TARGET_FIELDS,
        )
        .await
    }

    async fn get_sms_targets(&self) -> ServiceResult<Vec<SmsTarget>> {
        self.query("getSmsTargets", "smsTarget", SMS_TARGET_FIELDS).await
    }

    async fn create_sms_target(&self, input: CreateTargetInput) -> ServiceResult<SmsTarget> {
        self.mutate(
            "createSmsTarget",
            "createSmsTarget",
            "CreateSmsTargetInput",
            to_value(&input)?,
            SMS_TARGET_FIELDS,
        )
        .await
    }

    async fn get_telegram_targets(&self) -> ServiceResult<Vec<TelegramTarget>> {
        self.query("getTelegramTargets", "telegramTarget", TELEGRAM_TARGET_FIELDS)
            .await
    }

    async fn create_telegram_target(
        &self,
        input: CreateTargetInput,
    ) -> ServiceResult<TelegramTarget> {
        self.mutate(
            "createTelegramTarget",
            "createTelegramTarget",
            "CreateTelegramTargetInput",
            to_value(&input)?,
            TELEGRAM_TARGET_FIELDS,
        )
        .await
    }

    async fn send_email_target_verification_request(
        &self,
        target_id: &str,
    ) -> ServiceResult<Option<IdResult>> {
        self.mutate(
            "sendEmailTargetVerificationRequest",
            "sendEmailTargetVerificationRequest",
            "SendEmailTargetVerificationRequestInput",
            json!({ "targetId": target_id }),
            "id",
        )
        .await
    }

    async fn get_topics(&self) -> ServiceResult<Vec<UserTopic>> {
        self.query(
            "getTopics",
            "topics",
            "topicName targetCollections targetTemplate",
        )
        .await
    }

    async fn broadcast_message(&self, input: BroadcastMessageInput) -> ServiceResult<IdResult> {
        self.mutate(
            "broadcastMessage",
            "broadcastMessage",
            "BroadcastMessageInput",
            to_value(&input)?,
            "id",
        )
        .await
    }

    async fn get_configuration_for_dapp(
        &self,
        dapp_address: &str,
    ) -> ServiceResult<ClientConfiguration> {
        let document = "query getConfigurationForDapp($dappAddress: String!) { \
             configurationForDapp(dappAddress: $dappAddress) { \
             supportedSmsCountryCodes supportedTargetTypes } }";
        self.execute(
            "getConfigurationForDapp",
            document.to_string(),
            json!({ "dappAddress": dapp_address }),
            "configurationForDapp",
        )
        .await
    }
}

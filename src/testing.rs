// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory service and signer for unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::auth::{MessageSigner, SignerError};
use crate::client::NotifiClient;
use crate::models::{
    Alert, Authorization, ClientConfiguration, EmailTarget, Filter, SmsTarget, Source,
    SourceGroup, SourceType, TargetGroup, TelegramTarget, User, UserTopic,
};
use crate::service::{
    BeginLoginViaTransactionInput, BeginLoginViaTransactionResult, BroadcastMessageInput,
    CompleteLoginViaTransactionInput, CreateAlertInput, CreateSourceInput, CreateTargetInput,
    IdResult, LogInFromDappInput, NotifiService, ServiceError, ServiceResult, SourceGroupInput,
    TargetGroupInput,
};
use crate::store::MirrorStrategy;

pub const DAPP: &str = "dapp-address";
pub const WALLET: &str = "wallet-address";

struct FakeState {
    calls: Vec<&'static str>,
    failures: HashSet<&'static str>,
    next_id: u64,
    jwt: Option<String>,
    nonce: Option<String>,
    token: Option<String>,
    roles: Vec<String>,
    last_random_uuid: Option<String>,
    verification_id: bool,
    omit_group_ids: bool,
    alerts: Vec<Alert>,
    sources: Vec<Source>,
    source_groups: Vec<SourceGroup>,
    target_groups: Vec<TargetGroup>,
    email_targets: Vec<EmailTarget>,
    sms_targets: Vec<SmsTarget>,
    telegram_targets: Vec<TelegramTarget>,
    topics: Vec<UserTopic>,
    broadcasts: Vec<BroadcastMessageInput>,
    configuration: ClientConfiguration,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            failures: HashSet::new(),
            next_id: 0,
            jwt: None,
            nonce: Some("server-nonce".to_string()),
            token: Some("jwt-token".to_string()),
            roles: Vec::new(),
            last_random_uuid: None,
            verification_id: true,
            omit_group_ids: false,
            alerts: Vec::new(),
            sources: Vec::new(),
            source_groups: Vec::new(),
            target_groups: Vec::new(),
            email_targets: Vec::new(),
            sms_targets: Vec::new(),
            telegram_targets: Vec::new(),
            topics: Vec::new(),
            broadcasts: Vec::new(),
            configuration: ClientConfiguration::default(),
        }
    }
}

impl FakeState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn user(&self) -> User {
        User {
            email: None,
            email_confirmed: false,
            authorization: self.token.clone().map(|token| Authorization {
                token: Some(token),
                expiry: None,
            }),
            roles: Some(self.roles.clone()),
        }
    }

    fn source_group(&self, id: String, input: SourceGroupInput) -> SourceGroup {
        let sources = input
            .source_ids
            .iter()
            .map(|source_id| {
                self.sources
                    .iter()
                    .find(|source| source.id.as_deref() == Some(source_id))
                    .cloned()
                    .unwrap_or_else(|| placeholder_source(source_id))
            })
            .collect();
        SourceGroup {
            id: Some(id),
            name: Some(input.name),
            sources,
        }
    }

    fn target_group(&self, id: String, input: TargetGroupInput) -> TargetGroup {
        TargetGroup {
            id: Some(id),
            name: Some(input.name),
            email_targets: resolve(&self.email_targets, &input.email_target_ids, |id| {
                EmailTarget {
                    id: Some(id.to_string()),
                    ..EmailTarget::default()
                }
            }),
            sms_targets: resolve(&self.sms_targets, &input.sms_target_ids, |id| SmsTarget {
                id: Some(id.to_string()),
                ..SmsTarget::default()
            }),
            telegram_targets: resolve(&self.telegram_targets, &input.telegram_target_ids, |id| {
                TelegramTarget {
                    id: Some(id.to_string()),
                    ..TelegramTarget::default()
                }
            }),
        }
    }
}

fn placeholder_source(id: &str) -> Source {
    Source {
        id: Some(id.to_string()),
        name: None,
        blockchain_address: None,
        source_type: SourceType::SolanaWallet,
        applicable_filters: Vec::new(),
    }
}

fn resolve<T: Clone + crate::models::Resource>(
    known: &[T],
    ids: &[String],
    placeholder: impl Fn(&str) -> T,
) -> Vec<T> {
    ids.iter()
        .map(|id| {
            known
                .iter()
                .find(|item| item.id() == Some(id.as_str()))
                .cloned()
                .unwrap_or_else(|| placeholder(id))
        })
        .collect()
}

/// Records every call by its GraphQL operation name.
#[derive(Default)]
pub struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn call(&self, operation: &'static str) -> ServiceResult<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(operation);
        if state.failures.remove(operation) {
            return Err(ServiceError::Request(format!("{operation} failed")));
        }
        Ok(state)
    }

    pub fn count(&self, operation: &str) -> usize {
        self.lock().calls.iter().filter(|call| **call == operation).count()
    }

    /// The next call to `operation` fails with a transport error.
    pub fn fail_next(&self, operation: &'static str) {
        self.lock().failures.insert(operation);
    }

    pub fn jwt(&self) -> Option<String> {
        self.lock().jwt.clone()
    }

    pub fn last_random_uuid(&self) -> Option<String> {
        self.lock().last_random_uuid.clone()
    }

    pub fn set_nonce(&self, nonce: Option<&str>) {
        self.lock().nonce = nonce.map(str::to_string);
    }

    pub fn set_token(&self, token: Option<&str>) {
        self.lock().token = token.map(str::to_string);
    }

    pub fn set_roles(&self, roles: &[&str]) {
        self.lock().roles = roles.iter().map(|role| role.to_string()).collect();
    }

    pub fn set_topics(&self, topics: Vec<UserTopic>) {
        self.lock().topics = topics;
    }

    pub fn set_configuration(&self, configuration: ClientConfiguration) {
        self.lock().configuration = configuration;
    }

    /// Verification requests answer with no id from now on.
    pub fn drop_verification_ids(&self) {
        self.lock().verification_id = false;
    }

    pub fn seed_source(&self, id: &str) -> String {
        self.seed_source_with_filters(id, &[])
    }

    pub fn seed_source_with_filters(&self, id: &str, filter_ids: &[&str]) -> String {
        let source = Source {
            name: Some(id.to_string()),
            blockchain_address: Some(format!("{id}-address")),
            applicable_filters: filter_ids
                .iter()
                .map(|filter_id| Filter {
                    id: Some(filter_id.to_string()),
                    name: Some(filter_id.to_string()),
                    filter_type: None,
                })
                .collect(),
            ..placeholder_source(id)
        };
        self.lock().sources.push(source);
        id.to_string()
    }

    /// Add an empty target group ahead of every existing one.
    pub fn insert_target_group_first(&self, name: &str) -> String {
        let mut state = self.lock();
        let id = state.id("tg");
        state.target_groups.insert(
            0,
            TargetGroup {
                id: Some(id.clone()),
                name: Some(name.to_string()),
                ..TargetGroup::default()
            },
        );
        id
    }

    /// Groups created from now on come back without a server id.
    pub fn omit_created_group_ids(&self) {
        self.lock().omit_group_ids = true;
    }

    /// Forget the target group name of every stored alert.
    pub fn clear_alert_target_group_names(&self) {
        for alert in self.lock().alerts.iter_mut() {
            alert.target_group.name = None;
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    pub fn email_targets(&self) -> Vec<EmailTarget> {
        self.lock().email_targets.clone()
    }

    pub fn broadcasts(&self) -> Vec<BroadcastMessageInput> {
        self.lock().broadcasts.clone()
    }
}

#[async_trait]
impl NotifiService for FakeService {
    fn set_jwt(&self, token: Option<String>) {
        self.lock().jwt = token;
    }

    async fn begin_log_in_by_transaction(
        &self,
        _input: BeginLoginViaTransactionInput,
    ) -> ServiceResult<Option<BeginLoginViaTransactionResult>> {
        let state = self.call("beginLogInByTransaction")?;
        Ok(Some(BeginLoginViaTransactionResult {
            nonce: state.nonce.clone(),
        }))
    }

    async fn complete_log_in_by_transaction(
        &self,
        input: CompleteLoginViaTransactionInput,
    ) -> ServiceResult<User> {
        let mut state = self.call("completeLogInByTransaction")?;
        state.last_random_uuid = Some(input.random_uuid);
        Ok(state.user())
    }

    async fn log_in_from_dapp(&self, _input: LogInFromDappInput) -> ServiceResult<User> {
        let state = self.call("logInFromDapp")?;
        Ok(state.user())
    }

    async fn get_alerts(&self) -> ServiceResult<Vec<Alert>> {
        Ok(self.call("getAlerts")?.alerts.clone())
    }

    async fn create_alert(&self, input: CreateAlertInput) -> ServiceResult<Alert> {
        let mut state = self.call("createAlert")?;
        let id = state.id("alert");
        let alert = Alert {
            id: Some(id),
            name: Some(input.name),
            group_name: Some(input.group_name),
            filter_options: Some(input.filter_options),
            filter: Filter {
                id: Some(input.filter_id),
                ..Filter::default()
            },
            source_group: state
                .source_groups
                .iter()
                .find(|group| group.id.as_deref() == Some(input.source_group_id.as_str()))
                .cloned()
                .unwrap_or_default(),
            target_group: state
                .target_groups
                .iter()
                .find(|group| group.id.as_deref() == Some(input.target_group_id.as_str()))
                .cloned()
                .unwrap_or_default(),
        };
        state.alerts.push(alert.clone());
        Ok(alert)
    }

    async fn delete_alert(&self, id: &str) -> ServiceResult<IdResult> {
        let mut state = self.call("deleteAlert")?;
        state.alerts.retain(|alert| alert.id.as_deref() != Some(id));
        Ok(IdResult {
            id: Some(id.to_string()),
        })
    }

    async fn get_sources(&self) -> ServiceResult<Vec<Source>> {
        Ok(self.call("getSources")?.sources.clone())
    }

    async fn create_source(&self, input: CreateSourceInput) -> ServiceResult<Source> {
        let mut state = self.call("createSource")?;
        let source = Source {
            id: Some(state.id("source")),
            name: Some(input.name),
            blockchain_address: Some(input.blockchain_address),
            source_type: input.source_type,
            applicable_filters: Vec::new(),
        };
        state.sources.push(source.clone());
        Ok(source)
    }

    async fn get_source_groups(&self) -> ServiceResult<Vec<SourceGroup>> {
        Ok(self.call("getSourceGroups")?.source_groups.clone())
    }

    async fn create_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup> {
        let mut state = self.call("createSourceGroup")?;
        let id = state.id("sg");
        let mut group = state.source_group(id, input);
        if state.omit_group_ids {
            group.id = None;
        }
        state.source_groups.push(group.clone());
        Ok(group)
    }

    async fn update_source_group(&self, input: SourceGroupInput) -> ServiceResult<SourceGroup> {
        let mut state = self.call("updateSourceGroup")?;
        let id = input.id.clone().unwrap_or_default();
        let group = state.source_group(id.clone(), input);
        for existing in state.source_groups.iter_mut() {
            if existing.id.as_deref() == Some(id.as_str()) {
                *existing = group.clone();
            }
        }
        Ok(group)
    }

    async fn delete_source_group(&self, id: &str) -> ServiceResult<IdResult> {
        let mut state = self.call("deleteSourceGroup")?;
        state.source_groups.retain(|group| group.id.as_deref() != Some(id));
        Ok(IdResult {
            id: Some(id.to_string()),
        })
    }

    async fn get_target_groups(&self) -> ServiceResult<Vec<TargetGroup>> {
        Ok(self.call("getTargetGroups")?.target_groups.clone())
    }

    async fn create_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup> {
        let mut state = self.call("createTargetGroup")?;
        let id = state.id("tg");
        let mut group = state.target_group(id, input);
        if state.omit_group_ids {
            group.id = None;
        }
        state.target_groups.push(group.clone());
        Ok(group)
    }

    async fn update_target_group(&self, input: TargetGroupInput) -> ServiceResult<TargetGroup> {
        let mut state = self.call("updateTargetGroup")?;
        let id = input.id.clone().unwrap_or_default();
        let group = state.target_group(id.clone(), input);
        for existing in state.target_groups.iter_mut() {
            if existing.id.as_deref() == Some(id.as_str()) {
                *existing = group.clone();
            }
        }
        Ok(group)
    }

    async fn delete_target_group(&self, id: &str) -> ServiceResult<IdResult> {
        let mut state = self.call("deleteTargetGroup")?;
        state.target_groups.retain(|group| group.id.as_deref() != Some(id));
        Ok(IdResult {
            id: Some(id.to_string()),
        })
    }

    async fn get_email_targets(&self) -> ServiceResult<Vec<EmailTarget>> {
        Ok(self.call("getEmailTargets")?.email_targets.clone())
    }

    async fn create_email_target(&self, input: CreateTargetInput) -> ServiceResult<EmailTarget> {
        let mut state = self.call("createEmailTarget")?;
        let target = EmailTarget {
            id: Some(state.id("email")),
            name: Some(input.name),
            email_address: Some(input.value),
            is_confirmed: false,
        };
        state.email_targets.push(target.clone());
        Ok(target)
    }

    async fn get_sms_targets(&self) -> ServiceResult<Vec<SmsTarget>> {
        Ok(self.call("getSmsTargets")?.sms_targets.clone())
    }

    async fn create_sms_target(&self, input: CreateTargetInput) -> ServiceResult<SmsTarget> {
        let mut state = self.call("createSmsTarget")?;
        let target = SmsTarget {
            id: Some(state.id("sms")),
            name: Some(input.name),
            phone_number: Some(input.value),
            is_confirmed: false,
        };
        state.sms_targets.push(target.clone());
        Ok(target)
    }

    async fn get_telegram_targets(&self) -> ServiceResult<Vec<TelegramTarget>> {
        Ok(self.call("getTelegramTargets")?.telegram_targets.clone())
    }

    async fn create_telegram_target(
        &self,
        input: CreateTargetInput,
    ) -> ServiceResult<TelegramTarget> {
        let mut state = self.call("createTelegramTarget")?;
        let target = TelegramTarget {
            id: Some(state.id("telegram")),
            name: Some(input.name),
            telegram_id: Some(input.value),
            is_confirmed: false,
            confirmation_url: None,
        };
        state.telegram_targets.push(target.clone());
        Ok(target)
    }

    async fn send_email_target_verification_request(
        &self,
        target_id: &str,
    ) -> ServiceResult<Option<IdResult>> {
        let state = self.call("sendEmailTargetVerificationRequest")?;
        Ok(state.verification_id.then(|| IdResult {
            id: Some(target_id.to_string()),
        }))
    }

    async fn get_topics(&self) -> ServiceResult<Vec<UserTopic>> {
        Ok(self.call("getTopics")?.topics.clone())
    }

    async fn broadcast_message(&self, input: BroadcastMessageInput) -> ServiceResult<IdResult> {
        let mut state = self.call("broadcastMessage")?;
        let id = state.id("broadcast");
        state.broadcasts.push(input);
        Ok(IdResult { id: Some(id) })
    }

    async fn get_configuration_for_dapp(
        &self,
        _dapp_address: &str,
    ) -> ServiceResult<ClientConfiguration> {
        Ok(self.call("getConfigurationForDapp")?.configuration.clone())
    }
}

/// Signs by prefixing the message with a fixed marker.
pub struct FakeSigner;

#[async_trait]
impl MessageSigner for FakeSigner {
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let mut signature = b"signed:".to_vec();
        signature.extend_from_slice(message);
        Ok(signature)
    }
}

/// Client over a fresh fake with a full but absent mirror.
pub fn harness() -> (Arc<FakeService>, NotifiClient) {
    let fake = Arc::new(FakeService::default());
    let client = NotifiClient::new(DAPP, WALLET, fake.clone(), MirrorStrategy::Full);
    (fake, client)
}

/// Like [`harness`], with the mirror already populated from the fake.
pub async fn harness_with_mirror() -> (Arc<FakeService>, NotifiClient) {
    let (fake, client) = harness();
    client.fetch_data().await.unwrap();
    (fake, client)
}

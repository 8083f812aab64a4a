// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Notification Data Models
//!
//! Entities owned by the remote notification service. The client only holds
//! a read-through copy of them (see [`crate::store`]). Field names follow the
//! service's camelCase JSON; anything the service may omit is an `Option`.
//!
//! ## Model Categories
//!
//! - **Sources**: watched origins of events, plus the filters they support
//! - **Targets**: delivery endpoints (email, SMS, Telegram) and their groups
//! - **Alerts**: a source group + filter + target group binding
//! - **Session**: login results, topics and dapp configuration

use serde::{Deserialize, Serialize};

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Wallet public key in its canonical string form (base58 for Solana).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Chain tag sent alongside wallet-scoped requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletBlockchain {
    Solana,
    OffChain,
}

/// Anything the service hands out with a (possibly missing) server id.
pub trait Resource {
    fn id(&self) -> Option<&str>;
}

// =============================================================================
// Source Models
// =============================================================================

/// Kind of event origin a [`Source`] watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    SolanaWallet,
    SolanaMetaplexAuction,
    SolanaBonfidaAuction,
    BroadcastMessages,
    DirectPush,
    /// Any type this client does not know about.
    #[serde(other)]
    Unknown,
}

/// A rule selecting which events on a source produce notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub filter_type: Option<String>,
}

/// A watched origin of events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
    pub blockchain_address: Option<String>,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub applicable_filters: Vec<Filter>,
}

/// Named set of sources referenced together by an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl SourceGroup {
    /// Server ids of the member sources, skipping members without one.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().filter_map(|source| source.id.as_deref())
    }
}

// =============================================================================
// Target Models
// =============================================================================

/// Delivery channel of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Email,
    Sms,
    Telegram,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmailTarget {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email_address: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmsTarget {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TelegramTarget {
    pub id: Option<String>,
    pub name: Option<String>,
    pub telegram_id: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
    pub confirmation_url: Option<String>,
}

/// Named set of delivery endpoints, one member list per channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub email_targets: Vec<EmailTarget>,
    #[serde(default)]
    pub sms_targets: Vec<SmsTarget>,
    #[serde(default)]
    pub telegram_targets: Vec<TelegramTarget>,
}

/// Desired delivery endpoints for an alert. At most one per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSpec {
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub telegram_id: Option<String>,
}

impl TargetSpec {
    pub fn email(address: impl Into<String>) -> Self {
        Self {
            email_address: Some(address.into()),
            ..Self::default()
        }
    }
}

// =============================================================================
// Alert Models
// =============================================================================

/// How often an alert may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertFrequency {
    Always,
    SingleOnly,
    #[serde(rename = "QUARTER_HOUR")]
    QuarterHourly,
    Hourly,
    Daily,
}

impl AlertFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertFrequency::Always => "ALWAYS",
            AlertFrequency::SingleOnly => "SINGLE_ONLY",
            AlertFrequency::QuarterHourly => "QUARTER_HOUR",
            AlertFrequency::Hourly => "HOURLY",
            AlertFrequency::Daily => "DAILY",
        }
    }
}

/// Tunable parameters of a filter, packed into the alert as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub alert_frequency: Option<AlertFrequency>,
    pub direct_message_type: Option<String>,
    pub threshold: Option<f64>,
}

impl FilterOptions {
    /// Compact key/value encoding; unset keys are omitted.
    pub fn pack(&self) -> String {
        let mut record = serde_json::Map::new();
        if let Some(frequency) = self.alert_frequency {
            record.insert("alertFrequency".into(), frequency.as_str().into());
        }
        if let Some(message_type) = &self.direct_message_type {
            record.insert("directMessageType".into(), message_type.as_str().into());
        }
        if let Some(threshold) = self.threshold {
            record.insert("threshold".into(), threshold.to_string().into());
        }
        serde_json::Value::Object(record).to_string()
    }
}

/// A user-defined binding of one source group, a filter and a target group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Option<String>,
    pub name: Option<String>,
    pub group_name: Option<String>,
    pub filter_options: Option<String>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub source_group: SourceGroup,
    #[serde(default)]
    pub target_group: TargetGroup,
}

// =============================================================================
// Session Models
// =============================================================================

/// Bearer credential issued on successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub token: Option<String>,
    pub expiry: Option<String>,
}

/// Login result. A missing token means the login was rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: bool,
    pub authorization: Option<Authorization>,
    pub roles: Option<Vec<String>>,
}

impl User {
    pub fn token(&self) -> Option<&str> {
        self.authorization
            .as_ref()
            .and_then(|authorization| authorization.token.as_deref())
    }
}

/// Broadcast topic the user may publish to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserTopic {
    pub topic_name: Option<String>,
    pub target_collections: Option<Vec<String>>,
    pub target_template: Option<String>,
}

/// Per-dapp client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    #[serde(default)]
    pub supported_sms_country_codes: Vec<String>,
    #[serde(default)]
    pub supported_target_types: Vec<TargetType>,
}

macro_rules! impl_resource {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resource for $ty {
                fn id(&self) -> Option<&str> {
                    self.id.as_deref()
                }
            }
        )*
    };
}

impl_resource!(
    Filter,
    Source,
    SourceGroup,
    EmailTarget,
    SmsTarget,
    TelegramTarget,
    TargetGroup,
    Alert,
);

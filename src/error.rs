// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client error taxonomy.
//!
//! Every failure is surfaced to the caller as a failed operation. Nothing is
//! retried locally; retry belongs to the transport.

use crate::service::ServiceError;

/// Errors returned by [`crate::NotifiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum NotifiError {
    /// The remote service answered with a malformed or empty response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An operation was invoked out of its required order.
    #[error("sequence error: {0}")]
    Sequence(String),

    /// A caller-supplied precondition was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A name that must be unique is already taken.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Same natural key, divergent attributes.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Attempt to repoint an alert at a different group.
    #[error("immutable reference: {0}")]
    ImmutableReference(String),

    /// Referenced id is absent from the current fetch.
    #[error("not found: {0}")]
    NotFound(String),

    /// Local role check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The external signer rejected or errored.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Broadcast topic cannot be addressed.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    /// The service returned a resource without the fields the client relies on.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote service call itself failed.
    #[error(transparent)]
    Service(ServiceError),
}

/// Result alias used across the crate.
pub type NotifiResult<T> = Result<T, NotifiError>;

/// Malformed responses are protocol errors; every other transport failure
/// stays a service error.
impl From<ServiceError> for NotifiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidResponse(message) => NotifiError::Protocol(message),
            other => NotifiError::Service(other),
        }
    }
}

impl NotifiError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            NotifiError::Protocol(_) => "protocol_error",
            NotifiError::Sequence(_) => "sequence_error",
            NotifiError::InvalidArgument(_) => "invalid_argument",
            NotifiError::DuplicateName(_) => "duplicate_name",
            NotifiError::Conflict(_) => "conflict",
            NotifiError::ImmutableReference(_) => "immutable_reference",
            NotifiError::NotFound(_) => "not_found",
            NotifiError::Unauthorized(_) => "unauthorized",
            NotifiError::SigningFailed(_) => "signing_failed",
            NotifiError::InvalidTopic(_) => "invalid_topic",
            NotifiError::InvariantViolation(_) => "invariant_violation",
            NotifiError::Config(_) => "config_error",
            NotifiError::Service(_) => "service_error",
        }
    }
}

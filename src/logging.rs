// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup for binaries embedding the client.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogConfig, LogFormat};
use crate::error::{NotifiError, NotifiResult};

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> NotifiResult<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| NotifiError::Config(format!("invalid log filter {}: {e}", config.filter)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    result.map_err(|e| NotifiError::Config(format!("failed to install tracing subscriber: {e}")))
}

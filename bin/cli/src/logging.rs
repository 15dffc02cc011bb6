// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::LogFormat;

/// Installs the global subscriber. Logs go to stderr so stdout carries only results.
pub fn init(level: Option<&str>, format: LogFormat) {
	let filter = match level {
		Some(level) => EnvFilter::new(level),
		None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
	};

	let registry = tracing_subscriber::registry().with(filter);
	match format {
		LogFormat::Text => registry.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).init(),
		LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

/// Creates an internal error diagnostic with source location
pub fn internal_with_context(
	reason: impl Into<String>,
	file: &str,
	line: u32,
	column: u32,
	module_path: &str,
) -> Diagnostic {
	let reason = reason.into();

	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: format!("Internal error: {}", reason),
		label: Some(format!("Internal invariant violated at {}:{}:{}", file, line, column)),
		help: Some(format!(
			"This error should never occur in normal operation. Please report it with the version ({}) and module ({})",
			env!("CARGO_PKG_VERSION"),
			module_path
		)),
		notes: vec!["The audit trail may not reflect the latest applied change set".to_string()],
		cause: None,
	}
}

/// Internal error without location details
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, 0, "unknown")
}

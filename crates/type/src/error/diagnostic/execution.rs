// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

/// A change set marked failOnError failed against the target database.
/// The database diagnostic is kept unmodified as the cause.
pub fn change_set_failed(file: &str, change_id: &str, cause: Diagnostic) -> Diagnostic {
	Diagnostic {
		code: "EXECUTION_001".to_string(),
		message: format!("Change set \"{}\" from \"{}\" failed: {}", change_id, file, cause.message),
		label: Some(format!("{}:{}", file, change_id)),
		help: Some(
			"Fix the change set and run again; it was not recorded and will be retried".to_string(),
		),
		notes: vec!["Change sets after this one were not evaluated".to_string()],
		cause: Some(Box::new(cause)),
	}
}

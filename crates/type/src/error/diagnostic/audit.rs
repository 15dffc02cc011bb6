// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

pub fn read_failed(collection: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "AUDIT_001".to_string(),
		message: format!("Cannot read audit collection \"{}\": {}", collection, reason.into()),
		label: None,
		help: Some("The run was stopped because applied change sets could not be determined".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn write_failed(collection: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "AUDIT_002".to_string(),
		message: format!("Cannot write to audit collection \"{}\": {}", collection, reason.into()),
		label: None,
		help: Some(
			"The change set may have been applied without being recorded; verify it before running again"
				.to_string(),
		),
		notes: vec![],
		cause: None,
	}
}

/// Another runner recorded the same change set first
pub fn already_recorded(collection: &str, file: &str, change_id: &str) -> Diagnostic {
	Diagnostic {
		code: "AUDIT_003".to_string(),
		message: format!(
			"Change set \"{}\" from \"{}\" is already recorded in \"{}\"",
			change_id, file, collection
		),
		label: Some(format!("{}:{}", file, change_id)),
		help: Some("Another runner is probably migrating the same database; run migrations from a single process"
			.to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn initialization_failed(collection: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "AUDIT_004".to_string(),
		message: format!("Cannot initialize audit collection \"{}\": {}", collection, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn corrupt_record(collection: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "AUDIT_005".to_string(),
		message: format!("Unreadable record in audit collection \"{}\": {}", collection, reason.into()),
		label: None,
		help: Some("Audit records are written by Tidemark only; check for manual edits".to_string()),
		notes: vec![],
		cause: None,
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

pub fn empty_audit_collection() -> Diagnostic {
	Diagnostic {
		code: "CONFIG_001".to_string(),
		message: "Audit collection name must not be empty".to_string(),
		label: None,
		help: Some("Leave the setting unset to use the default \"mongeez\" collection".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn missing_setting(name: &str) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_002".to_string(),
		message: format!("Required setting \"{}\" was not provided", name),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn invalid_init_record(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CONFIG_003".to_string(),
		message: format!("Invalid initialization record: {}", reason.into()),
		label: None,
		help: Some("The initialization record must not carry a changeId field".to_string()),
		notes: vec![],
		cause: None,
	}
}

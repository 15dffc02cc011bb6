// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

/// The master changelog declares no change-file section at all
pub fn missing_change_files(reference: &str) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_001".to_string(),
		message: format!(
			"The file \"{}\" doesn't seem to contain a changeFiles declaration. Are you using the correct file to initialize Tidemark?",
			reference
		),
		label: None,
		help: Some(
			"Pass the master changelog, which lists change files under a top-level \"changeFiles\" array"
				.to_string(),
		),
		notes: vec!["An empty \"changeFiles\" array is valid; a missing one is not".to_string()],
		cause: None,
	}
}

/// A changelog document could not be read from disk
pub fn unreadable(reference: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_002".to_string(),
		message: format!("Cannot read changelog \"{}\": {}", reference, reason.into()),
		label: None,
		help: Some("Check that the path exists and is readable".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A changelog document is not valid for its expected structure
pub fn malformed(reference: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_003".to_string(),
		message: format!("Malformed changelog \"{}\": {}", reference, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn empty_change_id(file: &str, sequence_index: usize) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_004".to_string(),
		message: format!("Change set #{} in \"{}\" has an empty changeId", sequence_index, file),
		label: None,
		help: Some("Every change set needs a changeId that is unique within its file".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn duplicate_change_id(file: &str, change_id: &str) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_005".to_string(),
		message: format!("changeId \"{}\" is declared more than once in \"{}\"", change_id, file),
		label: None,
		help: Some("Rename one of the change sets; applied change sets are tracked by file and changeId"
			.to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn duplicate_change_file(reference: &str, path: &str) -> Diagnostic {
	Diagnostic {
		code: "FORMAT_006".to_string(),
		message: format!("Change file \"{}\" is declared more than once in \"{}\"", path, reference),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

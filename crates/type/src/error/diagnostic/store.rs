// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use super::Diagnostic;

/// The storage backend itself failed
pub fn backend(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_001".to_string(),
		message: format!("Storage backend error: {}", reason.into()),
		label: None,
		help: Some("Check database path, permissions and available disk space".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn duplicate_key(collection: &str, index: &str, key: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_002".to_string(),
		message: format!("Duplicate key {} in collection \"{}\" for index \"{}\"", key, collection, index),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn collection_not_found(collection: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_003".to_string(),
		message: format!("Collection \"{}\" does not exist", collection),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn index_conflict(collection: &str, name: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_004".to_string(),
		message: format!(
			"Index \"{}\" already exists on collection \"{}\" with a different definition",
			name, collection
		),
		label: None,
		help: Some("Drop the existing index first".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn index_not_found(collection: &str, name: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_005".to_string(),
		message: format!("Index \"{}\" does not exist on collection \"{}\"", name, collection),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn collection_exists(collection: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_006".to_string(),
		message: format!("Collection \"{}\" already exists", collection),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn no_such_command(name: &str) -> Diagnostic {
	Diagnostic {
		code: "STORE_007".to_string(),
		message: format!("no such command: '{}'", name),
		label: None,
		help: Some("Supported commands are create, drop, dropIndexes and ping".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn invalid_command(name: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_008".to_string(),
		message: format!("Invalid arguments for command '{}': {}", name, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn invalid_document(collection: &str, reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_009".to_string(),
		message: format!("Invalid document for collection \"{}\": {}", collection, reason.into()),
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn codec(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORE_010".to_string(),
		message: format!("Stored document could not be decoded: {}", reason.into()),
		label: None,
		help: Some("This may indicate data corruption".to_string()),
		notes: vec![],
		cause: None,
	}
}

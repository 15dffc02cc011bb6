// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tidemark_type::{Result, diagnostic::config, return_error};

use crate::{changeset::ChangeSetId, script::Document};

/// Collection the audit trail lives in unless configured otherwise.
pub const DEFAULT_AUDIT_COLLECTION: &str = "mongeez";

/// One successfully executed change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
	pub file: String,
	pub change_id: String,
	pub author: String,
	pub applied_at: DateTime<Utc>,
	pub duration_ms: u64,
}

impl AuditRecord {
	pub fn id(&self) -> ChangeSetId {
		ChangeSetId::new(self.file.clone(), self.change_id.clone())
	}
}

/// The document written once when the audit collection is created.
///
/// It marks that tracking has begun and never carries a `changeId`, so it is
/// never mistaken for an applied change set.
#[derive(Debug, Clone, PartialEq)]
pub struct InitRecord {
	pub id: String,
	pub fields: Document,
}

impl Default for InitRecord {
	fn default() -> Self {
		let mut fields = Document::new();
		fields.insert("type".to_string(), Value::from("configuration"));
		fields.insert("supportResourcePath".to_string(), Value::from(true));
		Self {
			id: "configuration".to_string(),
			fields,
		}
	}
}

impl InitRecord {
	pub fn new(id: impl Into<String>, fields: Document) -> Self {
		Self {
			id: id.into(),
			fields,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
	pub collection: String,
	pub init_record: InitRecord,
}

impl Default for AuditConfig {
	fn default() -> Self {
		Self {
			collection: DEFAULT_AUDIT_COLLECTION.to_string(),
			init_record: InitRecord::default(),
		}
	}
}

impl AuditConfig {
	pub fn collection(mut self, collection: impl Into<String>) -> Self {
		self.collection = collection.into();
		self
	}

	pub fn init_record(mut self, init_record: InitRecord) -> Self {
		self.init_record = init_record;
		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.collection.trim().is_empty() {
			return_error!(config::empty_audit_collection());
		}
		if self.init_record.id.is_empty() {
			return_error!(config::invalid_init_record("the record id must not be empty"));
		}
		if self.init_record.fields.contains_key("changeId") {
			return_error!(config::invalid_init_record("fields contain \"changeId\""));
		}
		Ok(())
	}
}

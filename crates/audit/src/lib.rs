// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Keeps the record of applied change sets in a collection of the target
//! database itself, so the trail travels with the data.
//!
//! Each applied change set becomes one document:
//!
//! ```json
//! { "_id": "…", "type": "changeSetExecution", "file": "changes/users.json",
//!   "changeId": "add-admin", "author": "ops", "appliedAt": "2025-06-01T12:00:00Z",
//!   "durationMs": 4 }
//! ```
//!
//! A unique index on `(file, changeId)` guarantees a change set is recorded at
//! most once, even with concurrent runners.

#![cfg_attr(not(debug_assertions), deny(warnings))]

use serde_json::Value;
use tidemark_core::{
	AuditConfig, AuditRecord, ChangeSetId, Document, Filter, IndexDef, interface::AuditStore, script::ID_FIELD,
};
use tidemark_store::{DocumentStore, WorkingSet};
use tidemark_type::{Diagnostic, Error, Result, diagnostic::audit, return_error};
use tracing::{debug, info, instrument};

/// Name of the unique index guarding against double recording.
pub const RECORD_INDEX: &str = "file_changeId";

/// `type` field value of applied change set records.
pub const RECORD_TYPE: &str = "changeSetExecution";

#[derive(Debug, Clone)]
pub struct DocumentAuditStore {
	store: DocumentStore,
	config: AuditConfig,
}

impl DocumentAuditStore {
	pub fn new(store: DocumentStore, config: AuditConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			store,
			config,
		})
	}

	pub fn store(&self) -> &DocumentStore {
		&self.store
	}

	pub fn config(&self) -> &AuditConfig {
		&self.config
	}

	fn collection(&self) -> &str {
		&self.config.collection
	}

	fn init_filter(&self) -> Filter {
		Filter::eq(ID_FIELD, self.config.init_record.id.clone())
	}

	fn init_document(&self) -> Document {
		let mut document = Document::new();
		document.insert(ID_FIELD.to_string(), Value::from(self.config.init_record.id.clone()));
		for (field, value) in &self.config.init_record.fields {
			document.insert(field.clone(), value.clone());
		}
		document
	}

	fn record_document(record: &AuditRecord) -> Result<Document> {
		let Value::Object(fields) = serde_json::to_value(record).map_err(|e| internal(e.to_string()))? else {
			return Err(internal("audit record did not serialize to an object"));
		};

		let mut document = Document::new();
		document.insert("type".to_string(), Value::from(RECORD_TYPE));
		document.extend(fields);
		Ok(document)
	}

	fn already_present(working: &mut WorkingSet<'_>, collection: &str, filter: &Filter) -> Result<bool> {
		Ok(working.get(collection)?.is_some_and(|c| c.count(filter) > 0))
	}
}

impl AuditStore for DocumentAuditStore {
	#[instrument(name = "audit::is_initialized", level = "trace", skip(self))]
	fn is_initialized(&self) -> Result<bool> {
		self.store
			.count(self.collection(), &self.init_filter())
			.map(|count| count > 0)
			.map_err(|err| wrap(audit::read_failed(self.collection(), "cannot look up the initialization record"), err))
	}

	#[instrument(name = "audit::initialize", level = "debug", skip(self), fields(collection = %self.config.collection))]
	fn initialize(&self) -> Result<()> {
		let collection = self.collection();
		let init_filter = self.init_filter();
		let init_document = self.init_document();

		let created = self
			.store
			.write(|w| {
				w.create_index(collection, IndexDef::new(RECORD_INDEX, ["file", "changeId"]).unique())?;
				if Self::already_present(w, collection, &init_filter)? {
					return Ok(false);
				}
				w.insert(collection, vec![init_document])?;
				Ok(true)
			})
			.map_err(|err| wrap(audit::initialization_failed(collection, "cannot create the audit collection"), err))?;

		if created {
			info!(collection, "audit collection initialized");
		}
		Ok(())
	}

	#[instrument(name = "audit::has_applied", level = "trace", skip(self), fields(id = %id))]
	fn has_applied(&self, id: &ChangeSetId) -> Result<bool> {
		let filter = Filter::eq("file", id.file.clone()).and("changeId", id.change_id.clone());
		self.store
			.count(self.collection(), &filter)
			.map(|count| count > 0)
			.map_err(|err| wrap(audit::read_failed(self.collection(), format!("cannot look up {}", id)), err))
	}

	#[instrument(name = "audit::record_applied", level = "debug", skip(self, record), fields(id = %record.id()))]
	fn record_applied(&self, record: AuditRecord) -> Result<()> {
		let collection = self.collection();
		let document = Self::record_document(&record)?;
		let filter = Filter::eq("file", record.file.clone()).and("changeId", record.change_id.clone());

		let result = self.store.write(|w| {
			if Self::already_present(w, collection, &filter)? {
				return_error!(audit::already_recorded(collection, &record.file, &record.change_id));
			}
			w.insert(collection, vec![document])?;
			Ok(())
		});

		match result {
			Ok(()) => {
				debug!("recorded");
				Ok(())
			}
			Err(err) if err.code.starts_with("AUDIT_") => Err(err),
			Err(err) if err.code == "STORE_002" => {
				Err(Error::new(audit::already_recorded(collection, &record.file, &record.change_id)))
			}
			Err(err) => Err(wrap(audit::write_failed(collection, format!("cannot record {}", record.id())), err)),
		}
	}

	#[instrument(name = "audit::history", level = "debug", skip(self))]
	fn history(&self) -> Result<Vec<AuditRecord>> {
		let collection = self.collection();
		let documents = self
			.store
			.find(collection, &Filter::all())
			.map_err(|err| wrap(audit::read_failed(collection, "cannot list audit records"), err))?;

		documents
			.into_iter()
			.filter(|d| d.get(ID_FIELD) != Some(&Value::from(self.config.init_record.id.clone())))
			.filter(|d| d.contains_key("changeId"))
			.map(|d| {
				serde_json::from_value(Value::Object(d))
					.map_err(|e| Error::new(audit::corrupt_record(collection, e.to_string())))
			})
			.collect()
	}
}

fn wrap(diagnostic: Diagnostic, err: Error) -> Error {
	Error::new(diagnostic.with_cause(err.diagnostic()))
}

fn internal(reason: impl Into<String>) -> Error {
	Error::new(tidemark_type::internal_error!(reason.into()))
}

#[cfg(test)]
pub mod tests {
	use chrono::Utc;

	use super::*;

	fn record(file: &str, change_id: &str) -> AuditRecord {
		AuditRecord {
			file: file.to_string(),
			change_id: change_id.to_string(),
			author: "ops".to_string(),
			applied_at: Utc::now(),
			duration_ms: 3,
		}
	}

	fn audit_store() -> DocumentAuditStore {
		DocumentAuditStore::new(DocumentStore::memory(), AuditConfig::default()).unwrap()
	}

	#[test]
	fn test_initialize_writes_single_record() {
		let audit = audit_store();
		assert!(!audit.is_initialized().unwrap());

		audit.initialize().unwrap();
		audit.initialize().unwrap();

		assert!(audit.is_initialized().unwrap());
		let documents = audit.store().find("mongeez", &Filter::all()).unwrap();
		assert_eq!(documents.len(), 1);
		assert_eq!(documents[0].get("_id"), Some(&Value::from("configuration")));
		assert_eq!(documents[0].get("type"), Some(&Value::from("configuration")));
		assert_eq!(documents[0].get("supportResourcePath"), Some(&Value::from(true)));
		assert!(!documents[0].contains_key("changeId"));
	}

	#[test]
	fn test_record_and_lookup() {
		let audit = audit_store();
		audit.initialize().unwrap();

		let id = ChangeSetId::new("a.json", "1");
		assert!(!audit.has_applied(&id).unwrap());

		audit.record_applied(record("a.json", "1")).unwrap();
		assert!(audit.has_applied(&id).unwrap());
		assert!(!audit.has_applied(&ChangeSetId::new("b.json", "1")).unwrap());
	}

	#[test]
	fn test_record_twice_is_persistence_error() {
		let audit = audit_store();
		audit.initialize().unwrap();
		audit.record_applied(record("a.json", "1")).unwrap();

		let err = audit.record_applied(record("a.json", "1")).unwrap_err();
		assert_eq!(err.code, "AUDIT_003");
		assert_eq!(err.kind(), tidemark_type::ErrorKind::Persistence);
	}

	#[test]
	fn test_history_excludes_init_record() {
		let audit = audit_store();
		audit.initialize().unwrap();
		audit.record_applied(record("a.json", "1")).unwrap();
		audit.record_applied(record("a.json", "2")).unwrap();

		let history = audit.history().unwrap();
		assert_eq!(history.len(), 2);
		assert_eq!(history[0].change_id, "1");
		assert_eq!(history[1].change_id, "2");
		assert_eq!(history[0].author, "ops");
	}

	#[test]
	fn test_record_document_shape() {
		let document = DocumentAuditStore::record_document(&record("a.json", "1")).unwrap();
		assert_eq!(document.get("type"), Some(&Value::from(RECORD_TYPE)));
		assert_eq!(document.get("file"), Some(&Value::from("a.json")));
		assert_eq!(document.get("changeId"), Some(&Value::from("1")));
		assert_eq!(document.get("durationMs"), Some(&Value::from(3)));
		assert!(document.contains_key("appliedAt"));
	}

	#[test]
	fn test_corrupt_record_reported() {
		let audit = audit_store();
		audit.initialize().unwrap();
		let mut bogus = Document::new();
		bogus.insert("changeId".to_string(), Value::from(7));
		audit.store().insert_one("mongeez", bogus).unwrap();

		let err = audit.history().unwrap_err();
		assert_eq!(err.code, "AUDIT_005");
	}

	#[test]
	fn test_initialize_over_duplicate_records_fails() {
		let audit = audit_store();
		for _ in 0..2 {
			let mut copy = Document::new();
			copy.insert("file".to_string(), Value::from("a.json"));
			copy.insert("changeId".to_string(), Value::from("1"));
			audit.store().insert_one("mongeez", copy).unwrap();
		}

		let err = audit.initialize().unwrap_err();
		assert_eq!(err.code, "AUDIT_004");
		assert_eq!(err.root_cause().code, "STORE_002");
		assert!(!audit.is_initialized().unwrap());
	}

	#[test]
	fn test_invalid_config_rejected() {
		let err = DocumentAuditStore::new(DocumentStore::memory(), AuditConfig::default().collection(""))
			.unwrap_err();
		assert_eq!(err.code, "CONFIG_001");
	}
}

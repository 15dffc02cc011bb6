// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Tidemark applies declarative change sets to a document database exactly
//! once, and keeps the record of what ran inside that database.
//!
//! ```no_run
//! use tidemark::{DocumentStore, SqliteConfig, Tidemark};
//!
//! # fn main() -> tidemark::Result<()> {
//! let report = Tidemark::builder()
//! 	.changelog("db/master.json")
//! 	.store(DocumentStore::sqlite(SqliteConfig::new("data/app.db"))?)
//! 	.context("users")
//! 	.build()?
//! 	.process()?;
//!
//! println!("{} change sets applied", report.applied().len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod builder;

use std::path::{Path, PathBuf};

pub use builder::TidemarkBuilder;
pub use tidemark_audit::DocumentAuditStore;
pub use tidemark_core::{
	AuditConfig, AuditRecord, ChangeLog, ChangeSet, ChangeSetId, Contexts, DEFAULT_AUDIT_COLLECTION, Document,
	Filter, IndexDef, InitRecord, Operation, Outcome, PlannedAction, PlannedChange, ReportEntry, RunReport, Script,
	interface::{AuditStore, ChangeLogSource, Executor},
};
pub use tidemark_engine::{Engine, EngineConfig, StoreExecutor};
pub use tidemark_source::JsonChangeLogSource;
pub use tidemark_store::{DbPath, DocumentStore, JournalMode, OpenFlags, SqliteConfig, SynchronousMode};
pub use tidemark_type::{Diagnostic, Error, ErrorKind, Result, diagnostic};
use tracing::instrument;

/// A configured runner: one changelog, one target store.
pub struct Tidemark {
	changelog: PathBuf,
	store: DocumentStore,
	config: EngineConfig,
	engine: Engine<DocumentAuditStore, StoreExecutor>,
}

impl Tidemark {
	pub fn builder() -> TidemarkBuilder {
		TidemarkBuilder::new()
	}

	pub fn changelog(&self) -> &Path {
		&self.changelog
	}

	pub fn store(&self) -> &DocumentStore {
		&self.store
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Loads the changelog and applies every pending change set.
	#[instrument(name = "tidemark::process", level = "debug", skip(self))]
	pub fn process(&self) -> Result<RunReport> {
		self.engine.run(JsonChangeLogSource, &self.changelog, &self.config.contexts)
	}

	/// What [`Tidemark::process`] would do, without touching the database.
	#[instrument(name = "tidemark::plan", level = "debug", skip(self))]
	pub fn plan(&self) -> Result<Vec<PlannedChange>> {
		let changelog = JsonChangeLogSource.load(&self.changelog)?;
		self.engine.plan(&changelog, &self.config.contexts)
	}

	/// Change sets recorded as applied, oldest first.
	pub fn history(&self) -> Result<Vec<AuditRecord>> {
		self.engine.audit().history()
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::path::Path;

use tidemark_audit::DocumentAuditStore;
use tidemark_core::{
	Contexts, RunReport,
	interface::{AuditStore, ChangeLogSource, Executor},
};
use tidemark_store::DocumentStore;
use tidemark_type::Result;
use tracing::instrument;

use crate::{EngineConfig, StoreExecutor};

/// Reconciles a changelog against the audit trail and applies what is pending.
///
/// The engine holds no state between calls; everything it knows about earlier
/// runs comes from the [`AuditStore`].
pub struct Engine<A: AuditStore, X: Executor> {
	pub(crate) audit: A,
	pub(crate) executor: X,
}

impl<A: AuditStore, X: Executor> Engine<A, X> {
	pub fn new(audit: A, executor: X) -> Self {
		Self {
			audit,
			executor,
		}
	}

	pub fn audit(&self) -> &A {
		&self.audit
	}

	pub fn executor(&self) -> &X {
		&self.executor
	}

	/// Loads the changelog and processes it.
	///
	/// The source is fully loaded and validated first: a format error leaves the
	/// target database untouched, the audit collection included.
	#[instrument(name = "engine::run", level = "debug", skip(self, source, active), fields(reference = %reference.display()))]
	pub fn run(&self, source: impl ChangeLogSource, reference: &Path, active: &Contexts) -> Result<RunReport> {
		let changelog = source.load(reference)?;
		self.process(&changelog, active)
	}
}

impl Engine<DocumentAuditStore, StoreExecutor> {
	/// An engine whose audit trail and change sets share one document store.
	pub fn with_store(store: DocumentStore, config: &EngineConfig) -> Result<Self> {
		config.validate()?;
		let audit = DocumentAuditStore::new(store.clone(), config.audit.clone())?;
		Ok(Self::new(audit, StoreExecutor::new(store)))
	}
}

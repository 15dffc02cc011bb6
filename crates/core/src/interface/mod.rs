// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Seams between the execution engine and its collaborators.

use std::path::Path;

use tidemark_type::Result;

use crate::{
	audit::AuditRecord,
	changeset::{ChangeLog, ChangeSetId},
	script::Script,
};

/// Parses a declarative changelog into an ordered list of change sets.
///
/// Fails with a format error (`FORMAT_*`) when the document is malformed, in
/// particular when it lacks a change-file declaration.
pub trait ChangeLogSource {
	fn load(&self, reference: &Path) -> Result<ChangeLog>;
}

/// Performs a change set's script against the target database.
///
/// An invocation is atomic from the caller's point of view. Errors are passed
/// through verbatim; the engine only distinguishes success from failure.
pub trait Executor {
	fn run(&self, script: &Script) -> Result<()>;
}

/// Durable record of applied change sets, persisted in the target database.
pub trait AuditStore {
	fn is_initialized(&self) -> Result<bool>;

	/// Creates the audit collection and writes the initialization record.
	/// Calling it on an initialized store is a no-op.
	fn initialize(&self) -> Result<()>;

	fn has_applied(&self, id: &ChangeSetId) -> Result<bool>;

	/// Appends a record. Fails with a persistence error (`AUDIT_*`) when the write fails,
	/// including when the change set is already recorded.
	fn record_applied(&self, record: AuditRecord) -> Result<()>;

	/// Applied records in the order they were written. Excludes the initialization record.
	fn history(&self) -> Result<Vec<AuditRecord>>;
}

impl<T: ChangeLogSource + ?Sized> ChangeLogSource for &T {
	fn load(&self, reference: &Path) -> Result<ChangeLog> {
		(**self).load(reference)
	}
}

impl<T: Executor + ?Sized> Executor for &T {
	fn run(&self, script: &Script) -> Result<()> {
		(**self).run(script)
	}
}

impl<T: AuditStore + ?Sized> AuditStore for &T {
	fn is_initialized(&self) -> Result<bool> {
		(**self).is_initialized()
	}

	fn initialize(&self) -> Result<()> {
		(**self).initialize()
	}

	fn has_applied(&self, id: &ChangeSetId) -> Result<bool> {
		(**self).has_applied(id)
	}

	fn record_applied(&self, record: AuditRecord) -> Result<()> {
		(**self).record_applied(record)
	}

	fn history(&self) -> Result<Vec<AuditRecord>> {
		(**self).history()
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::time::Instant;

use chrono::Utc;
use tidemark_core::{
	AuditRecord, ChangeLog, ChangeSet, Contexts, Outcome, RunReport,
	interface::{AuditStore, Executor},
};
use tidemark_type::{Error, Result, diagnostic::execution};
use tracing::{debug, error, info, instrument, warn};

use crate::Engine;

impl<A: AuditStore, X: Executor> Engine<A, X> {
	/// Applies every eligible, not yet applied change set of `changelog` in order.
	///
	/// Audit failures are always fatal. A failing change set aborts the run when it
	/// is marked `failOnError`; otherwise it is left unrecorded and reported as
	/// [`Outcome::PendingRetry`] so the next run tries it again.
	#[instrument(name = "engine::process", level = "info", skip_all, fields(
		reference = changelog.reference(),
		change_sets = changelog.len(),
		contexts = %active
	))]
	pub fn process(&self, changelog: &ChangeLog, active: &Contexts) -> Result<RunReport> {
		let mut report = RunReport::default();

		if !self.audit.is_initialized()? {
			self.audit.initialize()?;
			report.initialized = true;
		}

		for change_set in changelog.change_sets() {
			let outcome = self.process_change_set(change_set, active)?;
			report.push(change_set.id(), outcome);
		}

		info!(
			applied = report.applied().len(),
			already_applied = report.already_applied().len(),
			skipped_by_context = report.skipped_by_context().len(),
			pending_retry = report.pending_retry().len(),
			"changelog processed"
		);
		Ok(report)
	}

	fn process_change_set(&self, change_set: &ChangeSet, active: &Contexts) -> Result<Outcome> {
		let id = change_set.id();

		if !change_set.contexts.matches(active) {
			debug!(%id, contexts = %change_set.contexts, "skipped by context");
			return Ok(Outcome::SkippedByContext);
		}

		let recorded = self.audit.has_applied(&id)?;
		if recorded && !change_set.run_always {
			debug!(%id, "already applied");
			return Ok(Outcome::AlreadyApplied);
		}

		let started = Instant::now();
		if let Err(err) = self.executor.run(&change_set.script) {
			if change_set.fail_on_error {
				error!(%id, code = %err.code, "change set failed");
				return Err(Error::new(execution::change_set_failed(
					&change_set.file,
					&change_set.change_id,
					err.diagnostic(),
				)));
			}

			warn!(%id, code = %err.code, "change set failed, will retry on next run");
			return Ok(Outcome::PendingRetry {
				cause: err.diagnostic(),
			});
		}
		let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

		if !recorded {
			self.audit.record_applied(AuditRecord {
				file: change_set.file.clone(),
				change_id: change_set.change_id.clone(),
				author: change_set.author.clone(),
				applied_at: Utc::now(),
				duration_ms,
			})?;
		}

		info!(%id, duration_ms, run_always = change_set.run_always, "change set applied");
		Ok(Outcome::Applied {
			duration_ms,
		})
	}
}

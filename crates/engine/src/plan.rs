// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tidemark_core::{
	ChangeLog, Contexts, PlannedAction, PlannedChange,
	interface::{AuditStore, Executor},
};
use tidemark_type::Result;
use tracing::instrument;

use crate::Engine;

impl<A: AuditStore, X: Executor> Engine<A, X> {
	/// Previews what [`Engine::process`] would do, without executing or writing anything.
	///
	/// An uninitialized target has no history, so every eligible change set plans as `Apply`.
	#[instrument(name = "engine::plan", level = "debug", skip_all, fields(reference = changelog.reference()))]
	pub fn plan(&self, changelog: &ChangeLog, active: &Contexts) -> Result<Vec<PlannedChange>> {
		let initialized = self.audit.is_initialized()?;

		changelog
			.change_sets()
			.iter()
			.map(|change_set| {
				let id = change_set.id();
				let action = if !change_set.contexts.matches(active) {
					PlannedAction::SkippedByContext
				} else if initialized && !change_set.run_always && self.audit.has_applied(&id)? {
					PlannedAction::AlreadyApplied
				} else {
					PlannedAction::Apply
				};

				Ok(PlannedChange {
					id,
					action,
					run_always: change_set.run_always,
				})
			})
			.collect()
	}
}

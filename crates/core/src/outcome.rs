// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use serde::Serialize;
use tidemark_type::Diagnostic;

use crate::changeset::ChangeSetId;

/// What happened to one change set during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
	/// Executed successfully in this run.
	#[serde(rename_all = "camelCase")]
	Applied {
		duration_ms: u64,
	},
	/// Recorded by an earlier run and not executed.
	AlreadyApplied,
	/// Declares contexts that do not intersect the active ones. Never attempted.
	SkippedByContext,
	/// Attempted and failed with `failOnError = false`. Left unrecorded so the next run retries it.
	PendingRetry {
		cause: Diagnostic,
	},
}

impl Outcome {
	pub fn is_applied(&self) -> bool {
		matches!(self, Outcome::Applied { .. })
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
	pub id: ChangeSetId,
	#[serde(flatten)]
	pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
	/// Whether this run created the audit collection.
	pub initialized: bool,
	pub entries: Vec<ReportEntry>,
}

impl RunReport {
	pub fn push(&mut self, id: ChangeSetId, outcome: Outcome) {
		self.entries.push(ReportEntry {
			id,
			outcome,
		});
	}

	pub fn outcome(&self, id: &ChangeSetId) -> Option<&Outcome> {
		self.entries.iter().find(|e| &e.id == id).map(|e| &e.outcome)
	}

	pub fn applied(&self) -> Vec<&ChangeSetId> {
		self.entries.iter().filter(|e| e.outcome.is_applied()).map(|e| &e.id).collect()
	}

	pub fn already_applied(&self) -> Vec<&ChangeSetId> {
		self.filter(|o| matches!(o, Outcome::AlreadyApplied))
	}

	pub fn skipped_by_context(&self) -> Vec<&ChangeSetId> {
		self.filter(|o| matches!(o, Outcome::SkippedByContext))
	}

	pub fn pending_retry(&self) -> Vec<&ChangeSetId> {
		self.filter(|o| matches!(o, Outcome::PendingRetry { .. }))
	}

	fn filter(&self, predicate: impl Fn(&Outcome) -> bool) -> Vec<&ChangeSetId> {
		self.entries.iter().filter(|e| predicate(&e.outcome)).map(|e| &e.id).collect()
	}
}

/// Read-only preview of what a run would do with one change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlannedAction {
	Apply,
	AlreadyApplied,
	SkippedByContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedChange {
	pub id: ChangeSetId,
	pub action: PlannedAction,
	pub run_always: bool,
}

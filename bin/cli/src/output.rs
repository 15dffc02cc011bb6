// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tidemark::{AuditRecord, Outcome, PlannedAction, PlannedChange, ReportEntry, RunReport};

pub fn entry(entry: &ReportEntry) -> String {
	match &entry.outcome {
		Outcome::Applied {
			duration_ms,
		} => format!("applied          {} ({} ms)", entry.id, duration_ms),
		Outcome::AlreadyApplied => format!("already applied  {}", entry.id),
		Outcome::SkippedByContext => format!("skipped          {} (context)", entry.id),
		Outcome::PendingRetry {
			cause,
		} => format!("pending retry    {}: [{}] {}", entry.id, cause.code, cause.message),
	}
}

pub fn summary(report: &RunReport) -> String {
	format!(
		"{} applied, {} already applied, {} skipped by context, {} pending retry",
		report.applied().len(),
		report.already_applied().len(),
		report.skipped_by_context().len(),
		report.pending_retry().len()
	)
}

pub fn planned(change: &PlannedChange) -> String {
	let action = match change.action {
		PlannedAction::Apply if change.run_always => "apply (always)",
		PlannedAction::Apply => "apply",
		PlannedAction::AlreadyApplied => "already applied",
		PlannedAction::SkippedByContext => "skipped",
	};
	format!("{:<16} {}", action, change.id)
}

pub fn record(record: &AuditRecord) -> String {
	format!(
		"{}  {}:{}  {}  {} ms",
		record.applied_at.to_rfc3339(),
		record.file,
		record.change_id,
		if record.author.is_empty() { "-" } else { &record.author },
		record.duration_ms
	)
}

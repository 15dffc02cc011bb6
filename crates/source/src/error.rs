// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tidemark_type::{Diagnostic, Error, IntoDiagnostic, diagnostic::format};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
	#[error("{reference} has no changeFiles declaration")]
	MissingChangeFiles {
		reference: String,
	},

	#[error("cannot read {reference}: {reason}")]
	Unreadable {
		reference: String,
		reason: String,
	},

	#[error("malformed {reference}: {reason}")]
	Malformed {
		reference: String,
		reason: String,
	},

	#[error("change set #{position} in {file} has an empty changeId")]
	EmptyChangeId {
		file: String,
		position: usize,
	},

	#[error("changeId {change_id} appears more than once in {file}")]
	DuplicateChangeId {
		file: String,
		change_id: String,
	},

	#[error("{path} is declared more than once in {reference}")]
	DuplicateChangeFile {
		reference: String,
		path: String,
	},
}

impl IntoDiagnostic for SourceError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			SourceError::MissingChangeFiles {
				reference,
			} => format::missing_change_files(&reference),
			SourceError::Unreadable {
				reference,
				reason,
			} => format::unreadable(&reference, reason),
			SourceError::Malformed {
				reference,
				reason,
			} => format::malformed(&reference, reason),
			SourceError::EmptyChangeId {
				file,
				position,
			} => format::empty_change_id(&file, position),
			SourceError::DuplicateChangeId {
				file,
				change_id,
			} => format::duplicate_change_id(&file, &change_id),
			SourceError::DuplicateChangeFile {
				reference,
				path,
			} => format::duplicate_change_file(&reference, &path),
		}
	}
}

impl From<SourceError> for Error {
	fn from(err: SourceError) -> Self {
		Error::new(err.into_diagnostic())
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::{
	fmt::{Display, Formatter},
	ops::Deref,
};

pub mod diagnostic;
mod r#macro;

use diagnostic::{Diagnostic, render::DefaultRenderer};

/// Broad classification of a failure, derived from its diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The changelog is structurally malformed. Raised before any database interaction.
	Format,
	/// A change set marked `failOnError` failed against the target database.
	Execution,
	/// The audit trail could not be read or written.
	Persistence,
	/// The document store rejected an operation.
	Store,
	/// Invalid configuration.
	Config,
	Internal,
}

impl ErrorKind {
	pub fn from_code(code: &str) -> Self {
		match code.split('_').next().unwrap_or_default() {
			"FORMAT" => ErrorKind::Format,
			"EXECUTION" => ErrorKind::Execution,
			"AUDIT" => ErrorKind::Persistence,
			"STORE" => ErrorKind::Store,
			"CONFIG" => ErrorKind::Config,
			_ => ErrorKind::Internal,
		}
	}
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorKind::Format => f.write_str("format error"),
			ErrorKind::Execution => f.write_str("execution error"),
			ErrorKind::Persistence => f.write_str("persistence error"),
			ErrorKind::Store => f.write_str("store error"),
			ErrorKind::Config => f.write_str("configuration error"),
			ErrorKind::Internal => f.write_str("internal error"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Box<Diagnostic>);

impl Error {
	pub fn new(diagnostic: Diagnostic) -> Self {
		Self(Box::new(diagnostic))
	}

	pub fn kind(&self) -> ErrorKind {
		ErrorKind::from_code(&self.0.code)
	}

	pub fn diagnostic(self) -> Diagnostic {
		*self.0
	}

	/// Returns the innermost diagnostic of the cause chain.
	pub fn root_cause(&self) -> &Diagnostic {
		let mut current = self.0.as_ref();
		while let Some(cause) = current.cause.as_deref() {
			current = cause;
		}
		current
	}
}

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Self::new(diagnostic)
	}
}

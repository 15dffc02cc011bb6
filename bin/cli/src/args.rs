// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tidemark::{Contexts, DEFAULT_AUDIT_COLLECTION, DocumentStore, Result, SqliteConfig};

/// Applies declarative change sets to a document database exactly once.
#[derive(Debug, Parser)]
#[command(name = "tidemark", version, about)]
pub struct Cli {
	/// Log filter, e.g. `debug` or `tidemark_engine=trace`. Defaults to RUST_LOG, then `info`.
	#[arg(long, global = true, env = "TIDEMARK_LOG_LEVEL")]
	pub log_level: Option<String>,

	#[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "TIDEMARK_LOG_FORMAT")]
	pub log_format: LogFormat,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	Text,
	Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Apply every pending change set
	Migrate(RunArgs),
	/// Show what `migrate` would do, without writing
	Status(RunArgs),
	/// List the change sets recorded as applied
	History(DatabaseArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
	/// Master changelog declaring the change files
	#[arg(long, env = "TIDEMARK_CHANGELOG")]
	pub changelog: PathBuf,

	/// Comma-separated active contexts
	#[arg(long, env = "TIDEMARK_CONTEXT", default_value = "")]
	pub context: String,

	#[command(flatten)]
	pub database: DatabaseArgs,
}

impl RunArgs {
	pub fn contexts(&self) -> Contexts {
		Contexts::parse(&self.context)
	}
}

#[derive(Debug, Args)]
pub struct DatabaseArgs {
	/// SQLite database file, or `:memory:` for a throwaway in-process store
	#[arg(long, env = "TIDEMARK_DATABASE")]
	pub database: String,

	/// Collection holding the audit trail
	#[arg(long, env = "TIDEMARK_AUDIT_COLLECTION", default_value = DEFAULT_AUDIT_COLLECTION)]
	pub audit_collection: String,
}

impl DatabaseArgs {
	/// Opens the database for writing, creating it when missing.
	pub fn open(&self) -> Result<DocumentStore> {
		match self.database.as_str() {
			":memory:" => Ok(DocumentStore::memory()),
			path => DocumentStore::sqlite(SqliteConfig::new(path)),
		}
	}

	/// Opens an existing database read-only. `None` when the file does not exist.
	pub fn open_existing(&self) -> Result<Option<DocumentStore>> {
		match self.database.as_str() {
			":memory:" => Ok(Some(DocumentStore::memory())),
			path => {
				let config = SqliteConfig::read_only(path);
				if config.db_file().is_some_and(|file| !file.exists()) {
					return Ok(None);
				}
				DocumentStore::sqlite(config).map(Some)
			}
		}
	}
}

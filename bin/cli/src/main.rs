// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod args;
mod logging;
mod output;

use std::process::ExitCode;

use args::{Cli, Command, DatabaseArgs, RunArgs};
use clap::Parser;
use tidemark::{AuditConfig, AuditStore, DocumentAuditStore, DocumentStore, Error, Result, Tidemark, diagnostic};
use tracing::{error, info};

fn main() -> ExitCode {
	let cli = Cli::parse();
	logging::init(cli.log_level.as_deref(), cli.log_format);

	match run(cli.command) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!(code = %err.code, "tidemark failed");
			eprintln!("{}", err);
			ExitCode::from(1)
		}
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Migrate(args) => migrate(&args),
		Command::Status(args) => status(&args),
		Command::History(args) => history(&args),
	}
}

fn runner(args: &RunArgs, store: DocumentStore) -> Result<Tidemark> {
	Tidemark::builder()
		.changelog(&args.changelog)
		.store(store)
		.contexts(args.contexts())
		.audit_collection(&args.database.audit_collection)
		.build()
}

fn migrate(args: &RunArgs) -> Result<()> {
	let report = runner(args, args.database.open()?)?.process()?;
	for entry in &report.entries {
		println!("{}", output::entry(entry));
	}
	println!("{}", output::summary(&report));
	Ok(())
}

fn status(args: &RunArgs) -> Result<()> {
	let store = match args.database.open_existing()? {
		Some(store) => store,
		None => {
			info!(database = %args.database.database, "database does not exist yet, every eligible change set is pending");
			DocumentStore::memory()
		}
	};

	for change in runner(args, store)?.plan()? {
		println!("{}", output::planned(&change));
	}
	Ok(())
}

fn history(args: &DatabaseArgs) -> Result<()> {
	let Some(store) = args.open_existing()? else {
		return Err(Error::new(diagnostic::store::backend(format!(
			"database \"{}\" does not exist",
			args.database
		))));
	};

	let audit = DocumentAuditStore::new(store, AuditConfig::default().collection(args.audit_collection.clone()))?;
	for record in audit.history()? {
		println!("{}", output::record(&record));
	}
	Ok(())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::path::PathBuf;

use tidemark_core::{Contexts, InitRecord};
use tidemark_engine::{Engine, EngineConfig};
use tidemark_store::DocumentStore;
use tidemark_type::{Result, diagnostic::config, return_error};

use crate::Tidemark;

/// Collects the changelog, target store and run settings for a [`Tidemark`].
#[derive(Debug, Default)]
pub struct TidemarkBuilder {
	changelog: Option<PathBuf>,
	store: Option<DocumentStore>,
	config: EngineConfig,
}

impl TidemarkBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Path of the master changelog.
	pub fn changelog(mut self, path: impl Into<PathBuf>) -> Self {
		self.changelog = Some(path.into());
		self
	}

	pub fn store(mut self, store: DocumentStore) -> Self {
		self.store = Some(store);
		self
	}

	/// Activates one or more comma-separated context labels. May be called repeatedly.
	pub fn context(mut self, labels: impl Into<String>) -> Self {
		self.config = self.config.with_context(labels);
		self
	}

	pub fn contexts(mut self, contexts: Contexts) -> Self {
		self.config = self.config.with_contexts(contexts);
		self
	}

	pub fn audit_collection(mut self, collection: impl Into<String>) -> Self {
		self.config = self.config.with_audit_collection(collection);
		self
	}

	pub fn init_record(mut self, init_record: InitRecord) -> Self {
		let audit = self.config.audit.clone().init_record(init_record);
		self.config = self.config.with_audit(audit);
		self
	}

	pub fn config(mut self, config: EngineConfig) -> Self {
		self.config = config;
		self
	}

	pub fn build(self) -> Result<Tidemark> {
		let Some(changelog) = self.changelog else {
			return_error!(config::missing_setting("changelog"));
		};
		let Some(store) = self.store else {
			return_error!(config::missing_setting("store"));
		};

		let engine = Engine::with_store(store.clone(), &self.config)?;
		Ok(Tidemark {
			changelog,
			store,
			config: self.config,
			engine,
		})
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tidemark_core::{Script, interface::Executor};
use tidemark_store::DocumentStore;
use tidemark_type::Result;

/// Runs scripts against a [`DocumentStore`], one atomic write per script.
#[derive(Debug, Clone)]
pub struct StoreExecutor {
	store: DocumentStore,
}

impl StoreExecutor {
	pub fn new(store: DocumentStore) -> Self {
		Self {
			store,
		}
	}

	pub fn store(&self) -> &DocumentStore {
		&self.store
	}
}

impl Executor for StoreExecutor {
	fn run(&self, script: &Script) -> Result<()> {
		self.store.apply(script)
	}
}

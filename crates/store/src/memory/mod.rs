// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use tidemark_type::Result;
use tracing::instrument;

use crate::{collection::Collection, working::WorkingSet};

/// Process-local backend. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryBackend(Arc<RwLock<BTreeMap<String, Collection>>>);

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	#[instrument(name = "store::memory::read", level = "trace", skip(self))]
	pub fn read(&self, name: &str) -> Result<Option<Collection>> {
		Ok(self.0.read().get(name).cloned())
	}

	pub fn collection_names(&self) -> Result<Vec<String>> {
		Ok(self.0.read().keys().cloned().collect())
	}

	/// Runs `f` under the write lock and publishes its changes only when it succeeds.
	#[instrument(name = "store::memory::write", level = "trace", skip_all)]
	pub fn write<T>(&self, f: impl FnOnce(&mut WorkingSet<'_>) -> Result<T>) -> Result<T> {
		let mut collections = self.0.write();

		let (result, changes) = {
			let snapshot = &*collections;
			let loader = |name: &str| -> Result<Option<Collection>> { Ok(snapshot.get(name).cloned()) };
			let mut working = WorkingSet::new(&loader);
			let result = f(&mut working)?;
			(result, working.into_changes())
		};

		for (name, collection) in changes {
			match collection {
				Some(collection) => {
					collections.insert(name, collection);
				}
				None => {
					collections.remove(&name);
				}
			}
		}

		Ok(result)
	}
}

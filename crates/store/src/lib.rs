// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! The document database change sets run against.
//!
//! Every mutation goes through [`DocumentStore::write`]-style closures over a
//! [`WorkingSet`], so a multi-operation script either lands completely or not at
//! all, on both backends.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod collection;
mod command;
pub mod memory;
pub mod sqlite;
mod working;

pub use collection::Collection;
pub use memory::MemoryBackend;
use serde_json::Value;
pub use sqlite::{DbPath, JournalMode, OpenFlags, SqliteBackend, SqliteConfig, SynchronousMode};
use tidemark_core::{Document, Filter, IndexDef, Script};
use tidemark_type::Result;
use tracing::{debug, instrument};
pub use working::WorkingSet;

#[derive(Clone)]
pub enum DocumentStore {
	Memory(MemoryBackend),
	Sqlite(SqliteBackend),
}

impl DocumentStore {
	pub fn memory() -> Self {
		Self::Memory(MemoryBackend::new())
	}

	pub fn sqlite(config: SqliteConfig) -> Result<Self> {
		Ok(Self::Sqlite(SqliteBackend::new(config)?))
	}

	pub fn sqlite_in_memory() -> Result<Self> {
		Self::sqlite(SqliteConfig::in_memory())
	}

	fn read(&self, name: &str) -> Result<Option<Collection>> {
		match self {
			DocumentStore::Memory(backend) => backend.read(name),
			DocumentStore::Sqlite(backend) => backend.read(name),
		}
	}

	/// Runs `f` as one atomic write. Changes are discarded when it returns an error.
	pub fn write<T>(&self, f: impl FnOnce(&mut WorkingSet<'_>) -> Result<T>) -> Result<T> {
		match self {
			DocumentStore::Memory(backend) => backend.write(f),
			DocumentStore::Sqlite(backend) => backend.write(f),
		}
	}

	pub fn collection_names(&self) -> Result<Vec<String>> {
		match self {
			DocumentStore::Memory(backend) => backend.collection_names(),
			DocumentStore::Sqlite(backend) => backend.collection_names(),
		}
	}

	pub fn collection_exists(&self, collection: &str) -> Result<bool> {
		Ok(self.read(collection)?.is_some())
	}

	/// Matching documents in insertion order. A missing collection has none.
	pub fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
		Ok(self.read(collection)?.map(|c| c.find(filter)).unwrap_or_default())
	}

	pub fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
		Ok(self.find(collection, filter)?.into_iter().next())
	}

	pub fn count(&self, collection: &str, filter: &Filter) -> Result<usize> {
		Ok(self.read(collection)?.map(|c| c.count(filter)).unwrap_or(0))
	}

	pub fn indexes(&self, collection: &str) -> Result<Vec<IndexDef>> {
		Ok(self.read(collection)?.map(|c| c.indexes().to_vec()).unwrap_or_default())
	}

	pub fn insert(&self, collection: &str, documents: Vec<Document>) -> Result<Vec<Value>> {
		self.write(|w| w.insert(collection, documents))
	}

	pub fn insert_one(&self, collection: &str, document: Document) -> Result<Value> {
		let mut ids = self.insert(collection, vec![document])?;
		Ok(ids.pop().unwrap_or(Value::Null))
	}

	pub fn update(&self, collection: &str, filter: &Filter, set: &Document, multi: bool) -> Result<usize> {
		self.write(|w| w.update(collection, filter, set, multi))
	}

	pub fn remove(&self, collection: &str, filter: &Filter) -> Result<usize> {
		self.write(|w| w.remove(collection, filter))
	}

	/// Returns false when an identical index already existed.
	pub fn create_index(&self, collection: &str, index: IndexDef) -> Result<bool> {
		self.write(|w| w.create_index(collection, index))
	}

	pub fn drop_index(&self, collection: &str, name: &str) -> Result<()> {
		self.write(|w| w.drop_index(collection, name))
	}

	pub fn drop_collection(&self, collection: &str) -> Result<()> {
		self.write(|w| w.drop_collection(collection))
	}

	pub fn run_command(&self, command: &Document) -> Result<Document> {
		self.write(|w| w.run_command(command))
	}

	/// Applies every operation of `script` in order, all or nothing.
	#[instrument(name = "store::apply", level = "debug", skip_all, fields(operations = script.len()))]
	pub fn apply(&self, script: &Script) -> Result<()> {
		self.write(|w| {
			for operation in script.operations() {
				debug!(operation = operation.name(), collection = operation.collection(), "applying");
				w.apply(operation)?;
			}
			Ok(())
		})
	}
}

impl std::fmt::Debug for DocumentStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DocumentStore::Memory(_) => f.write_str("DocumentStore::Memory"),
			DocumentStore::Sqlite(_) => f.write_str("DocumentStore::Sqlite"),
		}
	}
}

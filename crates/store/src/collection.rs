// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Document semantics shared by every backend.

use serde_json::Value;
use tidemark_core::{
	Document, Filter, IndexDef,
	script::ID_FIELD,
};
use tidemark_type::{Result, diagnostic::store, return_error};
use uuid::Uuid;

/// A collection's documents, in insertion order, and its indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
	pub(crate) documents: Vec<Document>,
	pub(crate) indexes: Vec<IndexDef>,
}

impl Default for Collection {
	fn default() -> Self {
		Self {
			documents: Vec::new(),
			indexes: vec![IndexDef::primary()],
		}
	}
}

impl Collection {
	pub fn documents(&self) -> &[Document] {
		&self.documents
	}

	pub fn indexes(&self) -> &[IndexDef] {
		&self.indexes
	}

	pub fn find(&self, filter: &Filter) -> Vec<Document> {
		self.documents.iter().filter(|d| filter.matches(d)).cloned().collect()
	}

	pub fn count(&self, filter: &Filter) -> usize {
		self.documents.iter().filter(|d| filter.matches(d)).count()
	}

	/// Inserts one document, assigning an `_id` when it has none. Returns the id.
	pub(crate) fn insert(&mut self, name: &str, mut document: Document) -> Result<Value> {
		let id = match document.get(ID_FIELD) {
			Some(Value::Null) => return_error!(store::invalid_document(name, "_id must not be null")),
			Some(id) => id.clone(),
			None => {
				let id = Value::from(Uuid::new_v4().to_string());
				document.insert(ID_FIELD.to_string(), id.clone());
				id
			}
		};

		self.check_unique(name, &document, None)?;
		self.documents.push(document);
		Ok(id)
	}

	/// Sets top-level fields on the first matching document, or on all of them when `multi`.
	pub(crate) fn update(&mut self, name: &str, filter: &Filter, set: &Document, multi: bool) -> Result<usize> {
		if set.contains_key(ID_FIELD) {
			return_error!(store::invalid_document(name, "_id cannot be modified"));
		}

		let positions: Vec<usize> = self
			.documents
			.iter()
			.enumerate()
			.filter(|(_, d)| filter.matches(d))
			.map(|(position, _)| position)
			.take(if multi { usize::MAX } else { 1 })
			.collect();

		for &position in &positions {
			let mut updated = self.documents[position].clone();
			for (field, value) in set {
				updated.insert(field.clone(), value.clone());
			}
			self.check_unique(name, &updated, Some(position))?;
			self.documents[position] = updated;
		}

		Ok(positions.len())
	}

	pub(crate) fn remove(&mut self, filter: &Filter) -> usize {
		let before = self.documents.len();
		self.documents.retain(|d| !filter.matches(d));
		before - self.documents.len()
	}

	/// Returns false when an identical index already exists.
	pub(crate) fn create_index(&mut self, name: &str, index: IndexDef) -> Result<bool> {
		if index.keys.is_empty() {
			return_error!(store::invalid_command("createIndexes", "an index needs at least one key"));
		}

		if let Some(existing) = self.indexes.iter().find(|i| i.name == index.name) {
			if *existing == index {
				return Ok(false);
			}
			return_error!(store::index_conflict(name, &index.name));
		}

		if index.unique {
			let mut seen: Vec<Vec<Value>> = Vec::with_capacity(self.documents.len());
			for document in &self.documents {
				let key = index.key_of(document);
				if seen.contains(&key) {
					return_error!(store::duplicate_key(name, &index.name, &render_key(&key)));
				}
				seen.push(key);
			}
		}

		self.indexes.push(index);
		Ok(true)
	}

	pub(crate) fn drop_index(&mut self, name: &str, index: &str) -> Result<()> {
		if index == IndexDef::primary().name {
			return_error!(store::invalid_command("dropIndexes", "cannot drop _id index"));
		}

		let before = self.indexes.len();
		self.indexes.retain(|i| i.name != index);
		if self.indexes.len() == before {
			return_error!(store::index_not_found(name, index));
		}
		Ok(())
	}

	/// Drops every index except the primary one.
	pub(crate) fn drop_secondary_indexes(&mut self) {
		let primary = IndexDef::primary();
		self.indexes.retain(|i| *i == primary);
	}

	fn check_unique(&self, name: &str, candidate: &Document, skip: Option<usize>) -> Result<()> {
		for index in self.indexes.iter().filter(|i| i.unique) {
			let key = index.key_of(candidate);
			let clash = self
				.documents
				.iter()
				.enumerate()
				.filter(|(position, _)| Some(*position) != skip)
				.any(|(_, existing)| index.key_of(existing) == key);

			if clash {
				return_error!(store::duplicate_key(name, &index.name, &render_key(&key)));
			}
		}
		Ok(())
	}
}

fn render_key(key: &[Value]) -> String {
	serde_json::to_string(key).unwrap_or_else(|_| format!("{:?}", key))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::collections::{BTreeMap, btree_map::Entry};

use serde_json::Value;
use tidemark_core::{Document, Filter, IndexDef, Operation};
use tidemark_type::{Result, diagnostic::store, return_error};

use crate::{collection::Collection, command};

pub(crate) type Loader<'a> = dyn Fn(&str) -> Result<Option<Collection>> + 'a;

struct Slot {
	collection: Option<Collection>,
	dirty: bool,
}

/// Collections touched by one write, loaded on first access.
///
/// Nothing reaches the backend until the write closure returns `Ok`; the
/// backend then persists [`WorkingSet::into_changes`] in one step.
pub struct WorkingSet<'a> {
	loader: &'a Loader<'a>,
	slots: BTreeMap<String, Slot>,
}

impl<'a> WorkingSet<'a> {
	pub(crate) fn new(loader: &'a Loader<'a>) -> Self {
		Self {
			loader,
			slots: BTreeMap::new(),
		}
	}

	fn slot(&mut self, name: &str) -> Result<&mut Slot> {
		match self.slots.entry(name.to_string()) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let collection = (self.loader)(name)?;
				Ok(entry.insert(Slot {
					collection,
					dirty: false,
				}))
			}
		}
	}

	pub fn exists(&mut self, name: &str) -> Result<bool> {
		Ok(self.slot(name)?.collection.is_some())
	}

	pub fn get(&mut self, name: &str) -> Result<Option<&Collection>> {
		Ok(self.slot(name)?.collection.as_ref())
	}

	fn get_mut(&mut self, name: &str) -> Result<Option<&mut Collection>> {
		let slot = self.slot(name)?;
		if slot.collection.is_some() {
			slot.dirty = true;
		}
		Ok(slot.collection.as_mut())
	}

	fn get_or_create(&mut self, name: &str) -> Result<&mut Collection> {
		check_name(name)?;
		let slot = self.slot(name)?;
		slot.dirty = true;
		Ok(slot.collection.get_or_insert_with(Collection::default))
	}

	pub fn create_collection(&mut self, name: &str) -> Result<()> {
		if self.exists(name)? {
			return_error!(store::collection_exists(name));
		}
		self.get_or_create(name)?;
		Ok(())
	}

	pub fn drop_collection(&mut self, name: &str) -> Result<()> {
		let slot = self.slot(name)?;
		if slot.collection.take().is_none() {
			return_error!(store::collection_not_found(name));
		}
		slot.dirty = true;
		Ok(())
	}

	/// Inserts into `name`, creating the collection when missing. Returns the ids in input order.
	pub fn insert(&mut self, name: &str, documents: Vec<Document>) -> Result<Vec<Value>> {
		let collection = self.get_or_create(name)?;
		documents.into_iter().map(|document| collection.insert(name, document)).collect()
	}

	pub fn update(&mut self, name: &str, filter: &Filter, set: &Document, multi: bool) -> Result<usize> {
		match self.get_mut(name)? {
			Some(collection) => collection.update(name, filter, set, multi),
			None => Ok(0),
		}
	}

	pub fn remove(&mut self, name: &str, filter: &Filter) -> Result<usize> {
		match self.get_mut(name)? {
			Some(collection) => Ok(collection.remove(filter)),
			None => Ok(0),
		}
	}

	pub fn create_index(&mut self, name: &str, index: IndexDef) -> Result<bool> {
		self.get_or_create(name)?.create_index(name, index)
	}

	pub fn drop_index(&mut self, name: &str, index: &str) -> Result<()> {
		match self.get_mut(name)? {
			Some(collection) => collection.drop_index(name, index),
			None => return_error!(store::collection_not_found(name)),
		}
	}

	pub fn drop_secondary_indexes(&mut self, name: &str) -> Result<()> {
		match self.get_mut(name)? {
			Some(collection) => {
				collection.drop_secondary_indexes();
				Ok(())
			}
			None => return_error!(store::collection_not_found(name)),
		}
	}

	pub fn run_command(&mut self, command: &Document) -> Result<Document> {
		command::run(self, command)
	}

	pub fn apply(&mut self, operation: &Operation) -> Result<()> {
		match operation {
			Operation::Insert {
				collection,
				documents,
			} => {
				self.insert(collection, documents.clone())?;
			}
			Operation::Update {
				collection,
				filter,
				set,
				multi,
			} => {
				self.update(collection, filter, set, *multi)?;
			}
			Operation::Remove {
				collection,
				filter,
			} => {
				self.remove(collection, filter)?;
			}
			Operation::CreateIndex {
				collection,
				name,
				keys,
				unique,
			} => {
				let mut index = IndexDef::new(name.clone(), keys.iter().cloned());
				index.unique = *unique;
				self.create_index(collection, index)?;
			}
			Operation::DropIndex {
				collection,
				name,
			} => self.drop_index(collection, name)?,
			Operation::DropCollection {
				collection,
			} => self.drop_collection(collection)?,
			Operation::RunCommand(command) => {
				self.run_command(command)?;
			}
		}
		Ok(())
	}

	/// Touched collections: `Some` to store, `None` to delete.
	pub(crate) fn into_changes(self) -> Vec<(String, Option<Collection>)> {
		self.slots.into_iter().filter(|(_, slot)| slot.dirty).map(|(name, slot)| (name, slot.collection)).collect()
	}
}

fn check_name(name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return_error!(store::invalid_command("create", "collection name must not be empty"));
	}
	Ok(())
}

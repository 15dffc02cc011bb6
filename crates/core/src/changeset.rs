// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::{
	collections::HashMap,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{context::Contexts, script::Script};

/// Identity of a change set: the change file it was declared in, and its id within that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSetId {
	pub file: String,
	pub change_id: String,
}

impl ChangeSetId {
	pub fn new(file: impl Into<String>, change_id: impl Into<String>) -> Self {
		Self {
			file: file.into(),
			change_id: change_id.into(),
		}
	}
}

impl Display for ChangeSetId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.file, self.change_id)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
	pub file: String,
	pub change_id: String,
	pub author: String,
	/// Position within its file
	pub sequence_index: usize,
	pub contexts: Contexts,
	pub fail_on_error: bool,
	/// Execute on every run; recorded only the first time.
	pub run_always: bool,
	pub script: Script,
}

impl ChangeSet {
	pub fn new(file: impl Into<String>, change_id: impl Into<String>, script: Script) -> Self {
		Self {
			file: file.into(),
			change_id: change_id.into(),
			author: String::new(),
			sequence_index: 0,
			contexts: Contexts::default(),
			fail_on_error: false,
			run_always: false,
			script,
		}
	}

	pub fn id(&self) -> ChangeSetId {
		ChangeSetId::new(self.file.clone(), self.change_id.clone())
	}

	pub fn author(mut self, author: impl Into<String>) -> Self {
		self.author = author.into();
		self
	}

	pub fn sequence_index(mut self, sequence_index: usize) -> Self {
		self.sequence_index = sequence_index;
		self
	}

	pub fn contexts(mut self, contexts: Contexts) -> Self {
		self.contexts = contexts;
		self
	}

	pub fn fail_on_error(mut self, fail_on_error: bool) -> Self {
		self.fail_on_error = fail_on_error;
		self
	}

	pub fn run_always(mut self, run_always: bool) -> Self {
		self.run_always = run_always;
		self
	}
}

/// The ordered change sets of one changelog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
	reference: String,
	change_sets: Vec<ChangeSet>,
}

impl ChangeLog {
	/// Orders change sets by the position their file first appears in, then by sequence index.
	pub fn new(reference: impl Into<String>, mut change_sets: Vec<ChangeSet>) -> Self {
		let mut file_order: HashMap<String, usize> = HashMap::new();
		for change_set in &change_sets {
			let next = file_order.len();
			file_order.entry(change_set.file.clone()).or_insert(next);
		}
		change_sets.sort_by_key(|c| (file_order[&c.file], c.sequence_index));

		Self {
			reference: reference.into(),
			change_sets,
		}
	}

	pub fn empty(reference: impl Into<String>) -> Self {
		Self::new(reference, Vec::new())
	}

	/// The master changelog this list was loaded from.
	pub fn reference(&self) -> &str {
		&self.reference
	}

	pub fn change_sets(&self) -> &[ChangeSet] {
		&self.change_sets
	}

	pub fn len(&self) -> usize {
		self.change_sets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.change_sets.is_empty()
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_order_follows_file_declaration_then_sequence() {
		let change_log = ChangeLog::new(
			"master.json",
			vec![
				ChangeSet::new("b.json", "b2", Script::default()).sequence_index(1),
				ChangeSet::new("a.json", "a1", Script::default()).sequence_index(0),
				ChangeSet::new("b.json", "b1", Script::default()).sequence_index(0),
				ChangeSet::new("a.json", "a2", Script::default()).sequence_index(1),
			],
		);

		let ids: Vec<&str> = change_log.change_sets().iter().map(|c| c.change_id.as_str()).collect();
		assert_eq!(ids, vec!["b1", "b2", "a1", "a2"]);
	}

	#[test]
	fn test_change_set_id_display() {
		let change_set = ChangeSet::new("changesets/user.json", "ChangeSet-1", Script::default());
		assert_eq!(change_set.id().to_string(), "changesets/user.json:ChangeSet-1");
	}

	#[test]
	fn test_defaults() {
		let change_set = ChangeSet::new("f.json", "c", Script::default());
		assert!(!change_set.fail_on_error);
		assert!(!change_set.run_always);
		assert!(change_set.contexts.is_empty());
	}
}

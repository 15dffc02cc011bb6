// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Typed change set payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

/// Field name every stored document is identified by.
pub const ID_FIELD: &str = "_id";

/// Conjunction of top-level field equalities. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Document);

impl Filter {
	pub fn all() -> Self {
		Self::default()
	}

	pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::default().and(field, value)
	}

	pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(field.into(), value.into());
		self
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn matches(&self, document: &Document) -> bool {
		self.0.iter().all(|(field, expected)| document.get(field).unwrap_or(&Value::Null) == expected)
	}
}

impl From<Document> for Filter {
	fn from(document: Document) -> Self {
		Self(document)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
	pub name: String,
	pub keys: Vec<String>,
	#[serde(default)]
	pub unique: bool,
}

impl IndexDef {
	pub fn new(name: impl Into<String>, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			name: name.into(),
			keys: keys.into_iter().map(Into::into).collect(),
			unique: false,
		}
	}

	pub fn unique(mut self) -> Self {
		self.unique = true;
		self
	}

	/// The implicit unique index on `_id` every collection carries.
	pub fn primary() -> Self {
		Self::new("_id_", [ID_FIELD]).unique()
	}

	/// Key tuple of `document` for this index. Missing fields are `null`.
	pub fn key_of(&self, document: &Document) -> Vec<Value> {
		self.keys.iter().map(|k| document.get(k).cloned().unwrap_or(Value::Null)).collect()
	}
}

/// One step of a change set script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
	Insert {
		collection: String,
		documents: Vec<Document>,
	},
	Update {
		collection: String,
		#[serde(default)]
		filter: Filter,
		set: Document,
		#[serde(default)]
		multi: bool,
	},
	Remove {
		collection: String,
		#[serde(default)]
		filter: Filter,
	},
	CreateIndex {
		collection: String,
		name: String,
		keys: Vec<String>,
		#[serde(default)]
		unique: bool,
	},
	DropIndex {
		collection: String,
		name: String,
	},
	DropCollection {
		collection: String,
	},
	/// A database command document; its first key names the command.
	RunCommand(Document),
}

impl Operation {
	pub fn name(&self) -> &'static str {
		match self {
			Operation::Insert {
				..
			} => "insert",
			Operation::Update {
				..
			} => "update",
			Operation::Remove {
				..
			} => "remove",
			Operation::CreateIndex {
				..
			} => "createIndex",
			Operation::DropIndex {
				..
			} => "dropIndex",
			Operation::DropCollection {
				..
			} => "dropCollection",
			Operation::RunCommand(_) => "runCommand",
		}
	}

	pub fn collection(&self) -> Option<&str> {
		match self {
			Operation::Insert {
				collection,
				..
			}
			| Operation::Update {
				collection,
				..
			}
			| Operation::Remove {
				collection,
				..
			}
			| Operation::CreateIndex {
				collection,
				..
			}
			| Operation::DropIndex {
				collection,
				..
			}
			| Operation::DropCollection {
				collection,
			} => Some(collection),
			Operation::RunCommand(_) => None,
		}
	}
}

/// The ordered operations a change set applies. Executed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script(Vec<Operation>);

impl Script {
	pub fn new(operations: Vec<Operation>) -> Self {
		Self(operations)
	}

	pub fn operations(&self) -> &[Operation] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}
}

impl From<Vec<Operation>> for Script {
	fn from(operations: Vec<Operation>) -> Self {
		Self(operations)
	}
}

impl FromIterator<Operation> for Script {
	fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
pub mod tests {
	use serde_json::json;

	use super::*;

	fn doc(value: Value) -> Document {
		value.as_object().cloned().unwrap()
	}

	#[test]
	fn test_filter_matches_all_fields() {
		let document = doc(json!({"name": "acme", "country": "ie"}));
		assert!(Filter::all().matches(&document));
		assert!(Filter::eq("name", "acme").matches(&document));
		assert!(Filter::eq("name", "acme").and("country", "ie").matches(&document));
		assert!(!Filter::eq("name", "acme").and("country", "us").matches(&document));
	}

	#[test]
	fn test_filter_missing_field_compares_as_null() {
		let document = doc(json!({"name": "acme"}));
		assert!(Filter::eq("deleted", Value::Null).matches(&document));
		assert!(!Filter::eq("deleted", false).matches(&document));
	}

	#[test]
	fn test_index_key_of() {
		let index = IndexDef::new("by_file", ["file", "changeId"]).unique();
		let key = index.key_of(&doc(json!({"file": "a.json"})));
		assert_eq!(key, vec![json!("a.json"), Value::Null]);
	}

	#[test]
	fn test_script_from_json() {
		let script: Script = serde_json::from_value(json!([
			{"insert": {"collection": "user", "documents": [{"name": "ann"}]}},
			{"createIndex": {"collection": "user", "name": "by_name", "keys": ["name"], "unique": true}},
			{"update": {"collection": "user", "filter": {"name": "ann"}, "set": {"admin": true}}},
			{"remove": {"collection": "user"}},
			{"dropIndex": {"collection": "user", "name": "by_name"}},
			{"dropCollection": {"collection": "user"}},
			{"runCommand": {"create": "car"}}
		]))
		.unwrap();

		let names: Vec<&str> = script.operations().iter().map(Operation::name).collect();
		assert_eq!(
			names,
			vec!["insert", "createIndex", "update", "remove", "dropIndex", "dropCollection", "runCommand"]
		);

		match &script.operations()[2] {
			Operation::Update {
				multi,
				filter,
				..
			} => {
				assert!(!multi);
				assert_eq!(filter, &Filter::eq("name", "ann"));
			}
			other => panic!("unexpected operation {:?}", other),
		}

		assert_eq!(script.operations()[3].collection(), Some("user"));
		assert_eq!(script.operations()[6].collection(), None);
	}

	#[test]
	fn test_unknown_operation_rejected() {
		let result: Result<Script, _> = serde_json::from_value(json!([{"eval": "db.user.drop()"}]));
		assert!(result.is_err());
	}
}

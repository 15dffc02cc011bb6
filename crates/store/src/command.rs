// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Database command documents. The first key names the command and usually
//! carries its target.
//!
//! | command       | form                                        |
//! |---------------|---------------------------------------------|
//! | `ping`        | `{"ping": 1}`                               |
//! | `create`      | `{"create": "<collection>"}`                |
//! | `drop`        | `{"drop": "<collection>"}`                  |
//! | `dropIndexes` | `{"dropIndexes": "<collection>", "index": "<name>" \| "*"}` |

use serde_json::{Value, json};
use tidemark_core::Document;
use tidemark_type::{Result, diagnostic::store, return_error};

use crate::working::WorkingSet;

pub(crate) fn run(working: &mut WorkingSet<'_>, command: &Document) -> Result<Document> {
	let Some((name, argument)) = command.iter().next() else {
		return_error!(store::invalid_command("runCommand", "the command document is empty"));
	};

	match name.as_str() {
		"ping" => {}
		"create" => working.create_collection(target(name, argument)?)?,
		"drop" => working.drop_collection(target(name, argument)?)?,
		"dropIndexes" => {
			let collection = target(name, argument)?;
			match command.get("index") {
				Some(Value::String(index)) if index == "*" => working.drop_secondary_indexes(collection)?,
				Some(Value::String(index)) => working.drop_index(collection, index)?,
				_ => return_error!(store::invalid_command(name, "\"index\" must name an index or be \"*\"")),
			}
		}
		_ => return_error!(store::no_such_command(name)),
	}

	Ok(ok())
}

fn target<'a>(name: &str, argument: &'a Value) -> Result<&'a str> {
	match argument {
		Value::String(collection) if !collection.is_empty() => Ok(collection.as_str()),
		_ => return_error!(store::invalid_command(name, "expected a collection name")),
	}
}

fn ok() -> Document {
	let mut reply = Document::new();
	reply.insert("ok".to_string(), json!(1));
	reply
}

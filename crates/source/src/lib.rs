// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Reads a master changelog and the change files it declares.
//!
//! Everything is parsed and validated before anything is returned, so a
//! structural problem anywhere in the changelog surfaces before the engine
//! touches the database.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod document;
mod error;

use std::{
	collections::BTreeSet,
	fs,
	path::{Component, Path, PathBuf},
};

use document::{ChangeFileDocument, MasterDocument};
pub use error::SourceError;
use serde::de::DeserializeOwned;
use tidemark_core::{ChangeLog, ChangeSet, interface::ChangeLogSource};
use tidemark_type::Result;
use tracing::{debug, instrument};

/// Loads changelogs from JSON files on the local file system.
///
/// Change file paths resolve against the master file's directory; the path as
/// declared becomes each change set's `file` id, so moving the whole tree keeps
/// audit records valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonChangeLogSource;

impl JsonChangeLogSource {
	pub fn new() -> Self {
		Self
	}

	fn load_change_file(&self, path: &Path, file: &str) -> std::result::Result<Vec<ChangeSet>, SourceError> {
		let document: ChangeFileDocument = read_json(path, file)?;

		let mut seen = BTreeSet::new();
		let mut change_sets = Vec::with_capacity(document.change_sets.len());

		for (sequence_index, declared) in document.change_sets.into_iter().enumerate() {
			if declared.change_id.trim().is_empty() {
				return Err(SourceError::EmptyChangeId {
					file: file.to_string(),
					position: sequence_index + 1,
				});
			}
			if !seen.insert(declared.change_id.clone()) {
				return Err(SourceError::DuplicateChangeId {
					file: file.to_string(),
					change_id: declared.change_id,
				});
			}

			change_sets.push(
				ChangeSet::new(file, declared.change_id, declared.script)
					.author(declared.author)
					.sequence_index(sequence_index)
					.contexts(declared.contexts)
					.fail_on_error(declared.fail_on_error)
					.run_always(declared.run_always),
			);
		}

		debug!(file, change_sets = change_sets.len(), "change file loaded");
		Ok(change_sets)
	}
}

impl ChangeLogSource for JsonChangeLogSource {
	#[instrument(name = "source::load", level = "debug", skip(self), fields(reference = %reference.display()))]
	fn load(&self, reference: &Path) -> Result<ChangeLog> {
		let display = reference.display().to_string();
		let master: MasterDocument = read_json(reference, &display)?;

		let Some(change_files) = master.change_files else {
			return Err(SourceError::MissingChangeFiles {
				reference: display,
			}
			.into());
		};

		let base = reference.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);

		let mut declared = BTreeSet::new();
		for change_file in &change_files {
			if !declared.insert(normalize(&base.join(&change_file.path))) {
				return Err(SourceError::DuplicateChangeFile {
					reference: display.clone(),
					path: change_file.path.clone(),
				}
				.into());
			}
		}

		let mut change_sets = Vec::new();
		for change_file in &change_files {
			let path = base.join(&change_file.path);
			change_sets.extend(self.load_change_file(&path, &change_file.path)?);
		}

		Ok(ChangeLog::new(display, change_sets))
	}
}

/// Resolves `.` and `..` lexically, so two spellings of one file compare equal.
fn normalize(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if matches!(out.components().next_back(), Some(Component::Normal(_))) {
					out.pop();
				} else {
					out.push(component);
				}
			}
			other => out.push(other),
		}
	}
	out
}

fn read_json<T: DeserializeOwned>(path: &Path, reference: &str) -> std::result::Result<T, SourceError> {
	let text = fs::read_to_string(path).map_err(|e| SourceError::Unreadable {
		reference: reference.to_string(),
		reason: e.to_string(),
	})?;

	serde_json::from_str(&text).map_err(|e| SourceError::Malformed {
		reference: reference.to_string(),
		reason: e.to_string(),
	})
}

#[cfg(test)]
pub mod tests {
	use std::fs;

	use tidemark_core::Operation;
	use tidemark_testing::tempdir::temp_dir;

	use super::*;

	fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
		let path = dir.join(name);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		fs::write(&path, content).unwrap();
		path
	}

	#[test]
	fn test_load_in_declaration_order() {
		temp_dir(|dir| {
			let master = write(
				dir,
				"master.json",
				r#"{"changeFiles": [{"path": "changes/b.json"}, {"path": "changes/a.json"}]}"#,
			);
			write(
				dir,
				"changes/a.json",
				r#"{"changeSets": [{"changeId": "a1", "author": "ann", "contexts": "users, organizations",
					"script": [{"insert": {"collection": "user", "documents": [{"name": "x"}]}}]}]}"#,
			);
			write(
				dir,
				"changes/b.json",
				r#"{"changeSets": [{"changeId": "b1", "failOnError": true}, {"changeId": "b2", "runAlways": true}]}"#,
			);

			let changelog = JsonChangeLogSource::new().load(&master).unwrap();
			let ids: Vec<String> = changelog.change_sets().iter().map(|c| c.id().to_string()).collect();
			assert_eq!(ids, vec!["changes/b.json:b1", "changes/b.json:b2", "changes/a.json:a1"]);

			let b1 = &changelog.change_sets()[0];
			assert!(b1.fail_on_error);
			assert!(b1.contexts.is_empty());
			assert!(b1.script.is_empty());

			assert!(changelog.change_sets()[1].run_always);

			let a1 = &changelog.change_sets()[2];
			assert_eq!(a1.author, "ann");
			assert_eq!(a1.contexts.len(), 2);
			assert!(a1.contexts.contains("users"));
			assert!(matches!(a1.script.operations()[0], Operation::Insert { .. }));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_missing_change_files_declaration() {
		temp_dir(|dir| {
			let master = write(dir, "master.json", r#"{"changeSets": []}"#);
			let err = JsonChangeLogSource::new().load(&master).unwrap_err();
			assert_eq!(err.code, "FORMAT_001");
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_empty_change_files_is_valid() {
		temp_dir(|dir| {
			let master = write(dir, "master.json", r#"{"changeFiles": []}"#);
			let changelog = JsonChangeLogSource::new().load(&master).unwrap();
			assert!(changelog.is_empty());
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_change_file_without_change_sets_is_empty() {
		temp_dir(|dir| {
			let master = write(dir, "master.json", r#"{"changeFiles": [{"path": "empty.json"}]}"#);
			write(dir, "empty.json", "{}");
			assert!(JsonChangeLogSource::new().load(&master).unwrap().is_empty());
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_unreadable_and_malformed() {
		temp_dir(|dir| {
			let source = JsonChangeLogSource::new();
			let err = source.load(&dir.join("nope.json")).unwrap_err();
			assert_eq!(err.code, "FORMAT_002");

			let master = write(dir, "master.json", r#"{"changeFiles": [{"path": "missing.json"}]}"#);
			let err = source.load(&master).unwrap_err();
			assert_eq!(err.code, "FORMAT_002");
			assert!(err.message.contains("missing.json"));

			let master = write(dir, "broken.json", r#"{"changeFiles": ["#);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_003");

			let master = write(dir, "master2.json", r#"{"changeFiles": [{"path": "bad.json"}]}"#);
			write(dir, "bad.json", r#"{"changeSets": [{"author": "no id"}]}"#);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_003");
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_change_id_validation() {
		temp_dir(|dir| {
			let source = JsonChangeLogSource::new();

			let master = write(dir, "m1.json", r#"{"changeFiles": [{"path": "blank.json"}]}"#);
			write(dir, "blank.json", r#"{"changeSets": [{"changeId": " "}]}"#);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_004");

			let master = write(dir, "m2.json", r#"{"changeFiles": [{"path": "dup.json"}]}"#);
			write(dir, "dup.json", r#"{"changeSets": [{"changeId": "1"}, {"changeId": "1"}]}"#);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_005");

			let master = write(dir, "m3.json", r#"{"changeFiles": [{"path": "dup.json"}, {"path": "dup.json"}]}"#);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_006");
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_duplicate_change_file_under_another_spelling() {
		temp_dir(|dir| {
			let source = JsonChangeLogSource::new();
			write(dir, "changes/a.json", r#"{"changeSets": [{"changeId": "1"}]}"#);

			let master = write(
				dir,
				"m1.json",
				r#"{"changeFiles": [{"path": "changes/a.json"}, {"path": "./changes/a.json"}]}"#,
			);
			assert_eq!(source.load(&master).unwrap_err().code, "FORMAT_006");

			let master = write(
				dir,
				"m2.json",
				r#"{"changeFiles": [{"path": "changes/a.json"}, {"path": "changes/../changes/a.json"}]}"#,
			);
			let err = source.load(&master).unwrap_err();
			assert_eq!(err.code, "FORMAT_006");
			assert!(err.message.contains("changes/../changes/a.json"));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_same_change_id_in_different_files() {
		temp_dir(|dir| {
			let master = write(dir, "master.json", r#"{"changeFiles": [{"path": "a.json"}, {"path": "b.json"}]}"#);
			write(dir, "a.json", r#"{"changeSets": [{"changeId": "1"}]}"#);
			write(dir, "b.json", r#"{"changeSets": [{"changeId": "1"}]}"#);
			assert_eq!(JsonChangeLogSource::new().load(&master).unwrap().len(), 2);
			Ok(())
		})
		.unwrap();
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Writes changelogs to disk for tests that drive the JSON loader.

use std::{
	fs,
	path::{Path, PathBuf},
};

use serde_json::{Value, json};

/// Writes every `(path, content)` change file below `dir` plus a `master.json`
/// declaring them in the given order. Returns the master path.
pub fn write_changelog(dir: &Path, change_files: &[(&str, Value)]) -> std::io::Result<PathBuf> {
	for (path, content) in change_files {
		write_json(&dir.join(path), content)?;
	}

	let declared: Vec<Value> = change_files.iter().map(|(path, _)| json!({ "path": path })).collect();
	let master = dir.join("master.json");
	write_json(&master, &json!({ "changeFiles": declared }))?;
	Ok(master)
}

/// Writes a master changelog declaring a single, already existing change file.
pub fn write_master(dir: &Path, change_file: &str) -> std::io::Result<PathBuf> {
	let master = dir.join("master.json");
	write_json(&master, &json!({ "changeFiles": [{ "path": change_file }] }))?;
	Ok(master)
}

pub fn write_json(path: &Path, content: &Value) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, serde_json::to_vec_pretty(content)?)
}

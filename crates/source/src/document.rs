// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! On-disk shapes of the master changelog and change files.

use serde::Deserialize;
use tidemark_core::{Contexts, Script};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MasterDocument {
	pub change_files: Option<Vec<ChangeFileRef>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangeFileRef {
	pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeFileDocument {
	#[serde(default)]
	pub change_sets: Vec<ChangeSetDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeSetDocument {
	pub change_id: String,
	#[serde(default)]
	pub author: String,
	#[serde(default)]
	pub contexts: Contexts,
	#[serde(default)]
	pub fail_on_error: bool,
	#[serde(default)]
	pub run_always: bool,
	#[serde(default)]
	pub script: Script,
}

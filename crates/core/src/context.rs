// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

//! Context labels restricting when a change set is eligible.

use std::{
	collections::BTreeSet,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Deserializer, Serialize};

/// A set of context labels. An empty set on a change set means "always active";
/// an empty set of active contexts means "no contexts active".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Contexts(BTreeSet<String>);

impl Contexts {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a comma-delimited label list. Labels are trimmed and empty labels dropped.
	pub fn parse(list: &str) -> Self {
		list.split(',').map(str::trim).filter(|label| !label.is_empty()).map(str::to_string).collect()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn contains(&self, label: &str) -> bool {
		self.0.contains(label)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	pub fn intersects(&self, other: &Contexts) -> bool {
		self.0.intersection(&other.0).next().is_some()
	}

	/// Whether a change set declaring `self` is eligible under `active`.
	pub fn matches(&self, active: &Contexts) -> bool {
		matches(self, active)
	}
}

/// Context filter: a change set is eligible when it declares no contexts,
/// or when its contexts intersect the active ones.
pub fn matches(change_set: &Contexts, active: &Contexts) -> bool {
	change_set.is_empty() || change_set.intersects(active)
}

impl<S: Into<String>> FromIterator<S> for Contexts {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl Display for Contexts {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let labels: Vec<&str> = self.iter().collect();
		f.write_str(&labels.join(","))
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContextsRepr {
	List(String),
	Labels(Vec<String>),
}

impl<'de> Deserialize<'de> for Contexts {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match ContextsRepr::deserialize(deserializer)? {
			ContextsRepr::List(list) => Contexts::parse(&list),
			ContextsRepr::Labels(labels) => {
				labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect()
			}
		})
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use tidemark_core::{AuditConfig, Contexts};
use tidemark_type::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
	pub audit: AuditConfig,
	/// Contexts active for runs that do not name their own.
	pub contexts: Contexts,
}

impl EngineConfig {
	pub fn with_audit(mut self, audit: AuditConfig) -> Self {
		self.audit = audit;
		self
	}

	pub fn with_audit_collection(mut self, collection: impl Into<String>) -> Self {
		self.audit = self.audit.collection(collection);
		self
	}

	pub fn with_contexts(mut self, contexts: Contexts) -> Self {
		self.contexts = contexts;
		self
	}

	pub fn with_context(mut self, label: impl Into<String>) -> Self {
		let mut labels: Vec<String> = self.contexts.iter().map(str::to_string).collect();
		labels.extend(Contexts::parse(&label.into()).iter().map(str::to_string));
		self.contexts = labels.into_iter().collect();
		self
	}

	pub fn validate(&self) -> Result<()> {
		self.audit.validate()
	}
}

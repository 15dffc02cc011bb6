// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use audit::{AuditConfig, AuditRecord, DEFAULT_AUDIT_COLLECTION, InitRecord};
pub use changeset::{ChangeLog, ChangeSet, ChangeSetId};
pub use context::{Contexts, matches};
pub use outcome::{Outcome, PlannedAction, PlannedChange, ReportEntry, RunReport};
pub use script::{Document, Filter, IndexDef, Operation, Script};
pub use tidemark_type::{Error, ErrorKind, Result};

pub mod audit;
pub mod changeset;
pub mod context;
pub mod interface;
pub mod outcome;
pub mod script;

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;

pub use error::{
	Error, ErrorKind,
	diagnostic::{self, Diagnostic, IntoDiagnostic},
};

pub type Result<T> = std::result::Result<T, Error>;

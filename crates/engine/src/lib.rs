// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use config::EngineConfig;
pub use engine::Engine;
pub use executor::StoreExecutor;

mod config;
mod engine;
mod executor;
mod plan;
mod process;

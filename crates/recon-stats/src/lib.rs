// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Storage backends for aggregate statistic records.
//!
//! - [`MemoryStatsStore`] keeps records in a map, for tests and ephemeral deployments
//! - [`SqliteStatsStore`] persists records in a `global_stats` table

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod memory;
pub mod sqlite;

pub use memory::MemoryStatsStore;
pub use sqlite::{DbPath, SqliteConfig, SqliteStatsStore};

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Statistic key naming. Keys are derived from the table name and never stored alongside it.

use recon_core::StatKey;

pub fn count_key(table: &str) -> StatKey {
	StatKey::new(format!("{table}Count"))
}

pub fn replicated_size_key(table: &str) -> StatKey {
	StatKey::new(format!("{table}ReplicatedDataSize"))
}

pub fn unreplicated_size_key(table: &str) -> StatKey {
	StatKey::new(format!("{table}UnReplicatedDataSize"))
}

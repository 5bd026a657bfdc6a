// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use recon_core::StatKey;

use crate::key::{count_key, replicated_size_key, unreplicated_size_key};

/// Result of scanning one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSummary {
	pub count: i64,
	pub unreplicated_size: i64,
	pub replicated_size: i64,
}

/// In-memory running totals, keyed by statistic key.
///
/// Every value is kept at or above zero: subtracting more than a total holds leaves it at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulators {
	pub(crate) object_count: BTreeMap<StatKey, i64>,
	pub(crate) unreplicated_size: BTreeMap<StatKey, i64>,
	pub(crate) replicated_size: BTreeMap<StatKey, i64>,
}

impl Accumulators {
	pub fn object_count(&self) -> &BTreeMap<StatKey, i64> {
		&self.object_count
	}

	pub fn unreplicated_size(&self) -> &BTreeMap<StatKey, i64> {
		&self.unreplicated_size
	}

	pub fn replicated_size(&self) -> &BTreeMap<StatKey, i64> {
		&self.replicated_size
	}

	pub fn count_of(&self, table: &str) -> Option<i64> {
		self.object_count.get(count_key(table).as_str()).copied()
	}

	/// `(unreplicated, replicated)` of a table with size tracking.
	pub fn sizes_of(&self, table: &str) -> Option<(i64, i64)> {
		let unreplicated = self.unreplicated_size.get(unreplicated_size_key(table).as_str())?;
		let replicated = self.replicated_size.get(replicated_size_key(table).as_str())?;
		Some((*unreplicated, *replicated))
	}

	pub fn is_empty(&self) -> bool {
		self.object_count.is_empty() && self.unreplicated_size.is_empty() && self.replicated_size.is_empty()
	}

	pub(crate) fn add_count(&mut self, table: &str, delta: i64) {
		add_clamped(&mut self.object_count, count_key(table), delta);
	}

	pub(crate) fn add_sizes(&mut self, table: &str, unreplicated: i64, replicated: i64) {
		add_clamped(&mut self.unreplicated_size, unreplicated_size_key(table), unreplicated);
		add_clamped(&mut self.replicated_size, replicated_size_key(table), replicated);
	}

	pub(crate) fn set_count(&mut self, table: &str, count: i64) {
		self.object_count.insert(count_key(table), count.max(0));
	}

	pub(crate) fn set_sizes(&mut self, table: &str, unreplicated: i64, replicated: i64) {
		self.unreplicated_size.insert(unreplicated_size_key(table), unreplicated.max(0));
		self.replicated_size.insert(replicated_size_key(table), replicated.max(0));
	}

	pub(crate) fn apply_summary(&mut self, table: &str, summary: TableSummary, sized: bool) {
		self.set_count(table, summary.count);
		if sized {
			self.set_sizes(table, summary.unreplicated_size, summary.replicated_size);
		}
	}

	/// The three maps in flush order.
	pub(crate) fn maps(&self) -> [&BTreeMap<StatKey, i64>; 3] {
		[&self.object_count, &self.unreplicated_size, &self.replicated_size]
	}
}

fn add_clamped(map: &mut BTreeMap<StatKey, i64>, key: StatKey, delta: i64) {
	let value = map.entry(key).or_insert(0);
	*value = value.saturating_add(delta).max(0);
}

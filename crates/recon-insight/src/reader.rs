// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use recon_core::{Result, StatKey, StatRecord, StatsStore, Timestamp};

use crate::key::{count_key, replicated_size_key, unreplicated_size_key};

/// Persisted statistics of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
	pub count: i64,
	pub unreplicated_size: i64,
	pub replicated_size: i64,
	/// Most recent write to any of the table's records.
	pub updated_at: Option<Timestamp>,
}

/// Query side over a statistics store. Missing records read as zero.
pub struct InsightReader<S> {
	store: S,
}

impl<S: StatsStore> InsightReader<S> {
	pub fn new(store: S) -> Self {
		Self {
			store,
		}
	}

	pub fn count(&self, table: &str) -> Result<i64> {
		Ok(self.fetch(count_key(table))?.map(|r| r.value).unwrap_or(0))
	}

	/// `(unreplicated, replicated)` bytes of a table.
	pub fn sizes(&self, table: &str) -> Result<(i64, i64)> {
		let unreplicated = self.fetch(unreplicated_size_key(table))?.map(|r| r.value).unwrap_or(0);
		let replicated = self.fetch(replicated_size_key(table))?.map(|r| r.value).unwrap_or(0);
		Ok((unreplicated, replicated))
	}

	pub fn table_stats(&self, table: &str) -> Result<TableStats> {
		let mut stats = TableStats::default();
		for (key, slot) in [
			(count_key(table), &mut stats.count),
			(unreplicated_size_key(table), &mut stats.unreplicated_size),
			(replicated_size_key(table), &mut stats.replicated_size),
		] {
			if let Some(record) = self.fetch(key)? {
				*slot = record.value;
				stats.updated_at = stats.updated_at.max(Some(record.updated_at));
			}
		}
		Ok(stats)
	}

	fn fetch(&self, key: StatKey) -> Result<Option<StatRecord>> {
		self.store.fetch_by_key(key.as_str())
	}
}

#[cfg(test)]
mod tests {
	use recon_stats::MemoryStatsStore;

	use super::*;

	#[test]
	fn test_missing_records_read_as_zero() {
		let reader = InsightReader::new(MemoryStatsStore::new());
		assert_eq!(reader.count("keyTable").unwrap(), 0);
		assert_eq!(reader.sizes("openKeyTable").unwrap(), (0, 0));
		assert_eq!(reader.table_stats("deletedTable").unwrap(), TableStats::default());
	}

	#[test]
	fn test_reads_seeded_records() {
		let store = MemoryStatsStore::new();
		store.seed("openKeyTableCount", 3);
		store.seed("openKeyTableUnReplicatedDataSize", 300);
		store.seed("openKeyTableReplicatedDataSize", 900);

		let reader = InsightReader::new(store);
		let stats = reader.table_stats("openKeyTable").unwrap();
		assert_eq!(stats.count, 3);
		assert_eq!(stats.unreplicated_size, 300);
		assert_eq!(stats.replicated_size, 900);
		assert!(stats.updated_at.is_some());
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use recon_core::{Clock, Error, Result, StatRecord, StatsStore, Timestamp};

/// Map-backed statistics store. Cloning shares the records.
#[derive(Clone, Default)]
pub struct MemoryStatsStore {
	records: Arc<RwLock<BTreeMap<String, StatRecord>>>,
	clock: Clock,
}

impl MemoryStatsStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_clock(clock: Clock) -> Self {
		Self {
			records: Arc::default(),
			clock,
		}
	}

	/// Seeds records directly, bypassing insert/update semantics.
	pub fn seed(&self, key: &str, value: i64) {
		let now = self.clock.now();
		self.records.write().insert(key.to_string(), StatRecord::new(key.into(), value, now));
	}

	pub fn value(&self, key: &str) -> Option<i64> {
		self.records.read().get(key).map(|record| record.value)
	}

	pub fn records(&self) -> Vec<StatRecord> {
		self.records.read().values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.records.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.read().is_empty()
	}
}

impl StatsStore for MemoryStatsStore {
	fn fetch_by_key(&self, key: &str) -> Result<Option<StatRecord>> {
		Ok(self.records.read().get(key).cloned())
	}

	fn insert_all(&self, records: &[StatRecord]) -> Result<()> {
		let mut stored = self.records.write();
		if let Some(existing) = records.iter().find(|record| stored.contains_key(record.key.as_str())) {
			return Err(Error::store_write(format!("record '{}' already exists", existing.key)));
		}
		for record in records {
			stored.insert(record.key.as_str().to_string(), record.clone());
		}
		Ok(())
	}

	fn update_all(&self, records: &[StatRecord]) -> Result<()> {
		let mut stored = self.records.write();
		if let Some(missing) = records.iter().find(|record| !stored.contains_key(record.key.as_str())) {
			return Err(Error::store_write(format!("record '{}' does not exist", missing.key)));
		}
		for record in records {
			stored.insert(record.key.as_str().to_string(), record.clone());
		}
		Ok(())
	}

	fn current_timestamp(&self) -> Result<Timestamp> {
		Ok(self.clock.now())
	}
}

#[cfg(test)]
mod tests {
	use recon_core::{StatKey, Timestamp};

	use super::*;

	fn record(key: &str, value: i64) -> StatRecord {
		StatRecord::new(StatKey::new(key), value, Timestamp(1))
	}

	#[test]
	fn test_insert_then_update() {
		let store = MemoryStatsStore::new();
		store.insert_all(&[record("keyTableCount", 1)]).unwrap();
		store.update_all(&[record("keyTableCount", 5)]).unwrap();
		assert_eq!(store.value("keyTableCount"), Some(5));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_duplicate_insert_is_rejected() {
		let store = MemoryStatsStore::new();
		store.insert_all(&[record("a", 1)]).unwrap();
		let err = store.insert_all(&[record("b", 1), record("a", 2)]).unwrap_err();
		assert!(matches!(err, Error::StoreWrite { .. }));
		// nothing of the failed bulk operation is applied
		assert_eq!(store.value("b"), None);
		assert_eq!(store.value("a"), Some(1));
	}

	#[test]
	fn test_update_of_missing_record_is_rejected() {
		let store = MemoryStatsStore::new();
		let err = store.update_all(&[record("a", 1)]).unwrap_err();
		assert!(matches!(err, Error::StoreWrite { .. }));
		assert!(store.is_empty());
	}

	#[test]
	fn test_timestamp_comes_from_clock() {
		let clock = Clock::mock(42);
		let store = MemoryStatsStore::with_clock(clock.clone());
		assert_eq!(store.current_timestamp().unwrap(), Timestamp(42));
		clock.advance(8);
		assert_eq!(store.current_timestamp().unwrap(), Timestamp(50));
	}
}

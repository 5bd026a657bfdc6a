// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Fault injection wrappers around the catalog and the statistics store.

use std::{
	collections::HashMap,
	sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use parking_lot::RwLock;
use recon_core::{
	Error, KeyValue, MetadataCatalog, Result, StatRecord, StatsStore, Table, TableIterator, Timestamp,
};

/// Catalog whose table scans can be made to fail after a number of entries.
pub struct FaultyCatalog<C> {
	inner: C,
	failures: RwLock<HashMap<String, usize>>,
}

impl<C: MetadataCatalog> FaultyCatalog<C> {
	pub fn new(inner: C) -> Self {
		Self {
			inner,
			failures: RwLock::new(HashMap::new()),
		}
	}

	pub fn inner(&self) -> &C {
		&self.inner
	}

	/// Scans of `table` fail once `after_entries` entries have been returned.
	pub fn fail_scan(&self, table: &str, after_entries: usize) {
		self.failures.write().insert(table.to_string(), after_entries);
	}

	pub fn heal(&self) {
		self.failures.write().clear();
	}
}

impl<C: MetadataCatalog> MetadataCatalog for FaultyCatalog<C> {
	fn table_names(&self) -> Result<Vec<String>> {
		self.inner.table_names()
	}

	fn open_table(&self, name: &str) -> Result<Box<dyn Table + '_>> {
		let table = self.inner.open_table(name)?;
		let fail_after = self.failures.read().get(name).copied();
		Ok(Box::new(FaultyTable {
			inner: table,
			fail_after,
		}))
	}
}

struct FaultyTable<'a> {
	inner: Box<dyn Table + 'a>,
	fail_after: Option<usize>,
}

impl Table for FaultyTable<'_> {
	fn name(&self) -> &str {
		self.inner.name()
	}

	fn iter(&self) -> Result<Box<dyn TableIterator + '_>> {
		Ok(Box::new(FaultyIter {
			inner: self.inner.iter()?,
			table: self.inner.name().to_string(),
			remaining: self.fail_after,
		}))
	}
}

struct FaultyIter<'a> {
	inner: Box<dyn TableIterator + 'a>,
	table: String,
	remaining: Option<usize>,
}

impl TableIterator for FaultyIter<'_> {
	fn seek_to_first(&mut self) {
		self.inner.seek_to_first();
	}

	fn next_entry(&mut self) -> Result<Option<KeyValue>> {
		match self.remaining {
			Some(0) => Err(Error::scan(self.table.as_str(), "injected I/O failure")),
			Some(ref mut remaining) => {
				*remaining -= 1;
				self.inner.next_entry()
			}
			None => self.inner.next_entry(),
		}
	}
}

/// Statistics store that counts written records and can be made to reject writes.
pub struct FaultyStatsStore<S> {
	inner: S,
	fail_inserts: AtomicBool,
	fail_updates: AtomicBool,
	inserted: AtomicUsize,
	updated: AtomicUsize,
}

impl<S: StatsStore> FaultyStatsStore<S> {
	pub fn new(inner: S) -> Self {
		Self {
			inner,
			fail_inserts: AtomicBool::new(false),
			fail_updates: AtomicBool::new(false),
			inserted: AtomicUsize::new(0),
			updated: AtomicUsize::new(0),
		}
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn fail_inserts(&self, fail: bool) {
		self.fail_inserts.store(fail, Ordering::Release);
	}

	pub fn fail_updates(&self, fail: bool) {
		self.fail_updates.store(fail, Ordering::Release);
	}

	/// Number of records successfully inserted so far.
	pub fn inserted(&self) -> usize {
		self.inserted.load(Ordering::Acquire)
	}

	/// Number of records successfully updated so far.
	pub fn updated(&self) -> usize {
		self.updated.load(Ordering::Acquire)
	}

	pub fn reset_counts(&self) {
		self.inserted.store(0, Ordering::Release);
		self.updated.store(0, Ordering::Release);
	}
}

impl<S: StatsStore> StatsStore for FaultyStatsStore<S> {
	fn fetch_by_key(&self, key: &str) -> Result<Option<StatRecord>> {
		self.inner.fetch_by_key(key)
	}

	fn insert_all(&self, records: &[StatRecord]) -> Result<()> {
		if self.fail_inserts.load(Ordering::Acquire) {
			return Err(Error::store_write("injected insert failure"));
		}
		self.inner.insert_all(records)?;
		self.inserted.fetch_add(records.len(), Ordering::AcqRel);
		Ok(())
	}

	fn update_all(&self, records: &[StatRecord]) -> Result<()> {
		if self.fail_updates.load(Ordering::Acquire) {
			return Err(Error::store_write("injected update failure"));
		}
		self.inner.update_all(records)?;
		self.updated.fetch_add(records.len(), Ordering::AcqRel);
		Ok(())
	}

	fn current_timestamp(&self) -> Result<Timestamp> {
		self.inner.current_timestamp()
	}
}

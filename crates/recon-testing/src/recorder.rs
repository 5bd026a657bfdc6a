// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Write path for tests that need the change feed of a [`MemoryOmStore`].

use recon_core::{Result, TableValue, UpdateEvent, UpdateEventBatch};
use recon_om::MemoryOmStore;

/// Applies writes to a [`MemoryOmStore`] and records the matching update events.
///
/// A put over an existing key is reported as UPDATE carrying the replaced value, a put of a
/// new key as PUT, and a delete as DELETE carrying the removed value (absent when the key
/// did not exist).
pub struct EventRecorder {
	store: MemoryOmStore,
	pending: Vec<UpdateEvent>,
	sequence: u64,
}

impl EventRecorder {
	pub fn new(store: MemoryOmStore) -> Self {
		Self {
			store,
			pending: vec![],
			sequence: 0,
		}
	}

	pub fn store(&self) -> &MemoryOmStore {
		&self.store
	}

	pub fn put(&mut self, table: &str, key: &[u8], value: TableValue) -> Result<()> {
		let previous = self.store.put(table, key, &value)?;
		let event = match previous {
			Some(old) => UpdateEvent::update(table, key, old, value),
			None => UpdateEvent::put(table, key, value),
		};
		self.record(event);
		Ok(())
	}

	pub fn delete(&mut self, table: &str, key: &[u8]) -> Result<()> {
		let removed = self.store.delete(table, key)?;
		self.record(UpdateEvent::delete(table, key, removed));
		Ok(())
	}

	/// Events recorded since the last call, as one batch.
	pub fn take_batch(&mut self) -> UpdateEventBatch {
		UpdateEventBatch::new(std::mem::take(&mut self.pending), self.sequence)
	}

	fn record(&mut self, event: UpdateEvent) {
		self.sequence += 1;
		self.pending.push(event);
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::atomic::Ordering;

use recon_core::{Error, KeyValue, Result, Table, TableIterator};

use crate::{
	codec::{ValueFormat, decode_value},
	store::Inner,
};

/// Handle to one table of a [`crate::MemoryOmStore`].
pub struct MemoryTable<'a> {
	inner: &'a Inner,
	name: String,
}

impl<'a> MemoryTable<'a> {
	pub(crate) fn new(inner: &'a Inner, name: &str) -> Self {
		Self {
			inner,
			name: name.to_string(),
		}
	}
}

impl Table for MemoryTable<'_> {
	fn name(&self) -> &str {
		&self.name
	}

	fn iter(&self) -> Result<Box<dyn TableIterator + '_>> {
		let tables = self.inner.tables.read();
		let state = tables.get(&self.name).ok_or_else(|| Error::TableNotFound(self.name.clone()))?;
		let entries = state.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
		Ok(Box::new(SnapshotIter::new(self.inner, self.name.clone(), state.format, entries)))
	}
}

/// Iterator over a point-in-time copy of a table.
pub struct SnapshotIter<'a> {
	inner: &'a Inner,
	table: String,
	format: ValueFormat,
	entries: Vec<(Vec<u8>, Vec<u8>)>,
	position: usize,
}

impl<'a> SnapshotIter<'a> {
	fn new(inner: &'a Inner, table: String, format: ValueFormat, entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
		inner.open_iterators.fetch_add(1, Ordering::AcqRel);
		Self {
			inner,
			table,
			format,
			entries,
			position: 0,
		}
	}
}

impl TableIterator for SnapshotIter<'_> {
	fn seek_to_first(&mut self) {
		self.position = 0;
	}

	fn next_entry(&mut self) -> Result<Option<KeyValue>> {
		let Some((key, bytes)) = self.entries.get(self.position) else {
			return Ok(None);
		};
		self.position += 1;

		let value = decode_value(self.format, bytes).map_err(|e| Error::scan(self.table.as_str(), e))?;
		Ok(Some(KeyValue {
			key: key.clone(),
			value,
		}))
	}
}

impl Drop for SnapshotIter<'_> {
	fn drop(&mut self) {
		self.inner.open_iterators.fetch_sub(1, Ordering::AcqRel);
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::BTreeMap,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use parking_lot::RwLock;
use recon_core::{Error, MetadataCatalog, Result, Table, TableValue, tables::*};
use tracing::trace;

use crate::{
	codec::{ValueFormat, decode_value, encode_value},
	table::MemoryTable,
};

pub(crate) struct TableState {
	pub(crate) format: ValueFormat,
	pub(crate) entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

pub(crate) struct Inner {
	pub(crate) tables: RwLock<BTreeMap<String, TableState>>,
	pub(crate) open_iterators: AtomicUsize,
}

/// In-memory metadata store. Cloning shares the underlying tables.
#[derive(Clone)]
pub struct MemoryOmStore {
	pub(crate) inner: Arc<Inner>,
}

impl MemoryOmStore {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				tables: RwLock::new(BTreeMap::new()),
				open_iterators: AtomicUsize::new(0),
			}),
		}
	}

	/// A store containing the well known tables of the metadata store, all empty.
	pub fn with_default_tables() -> Self {
		let store = Self::new();
		for name in [VOLUME_TABLE, BUCKET_TABLE, DIRECTORY_TABLE, DELETED_DIR_TABLE] {
			store.create_table(name, ValueFormat::Raw);
		}
		for name in [KEY_TABLE, FILE_TABLE, OPEN_KEY_TABLE, OPEN_FILE_TABLE] {
			store.create_table(name, ValueFormat::Key);
		}
		store.create_table(DELETED_TABLE, ValueFormat::Deleted);
		store
	}

	/// Creates an empty table. Existing tables are left untouched.
	pub fn create_table(&self, name: impl Into<String>, format: ValueFormat) {
		let name = name.into();
		let mut tables = self.inner.tables.write();
		tables.entry(name).or_insert_with(|| TableState {
			format,
			entries: BTreeMap::new(),
		});
	}

	pub fn drop_table(&self, name: &str) -> bool {
		self.inner.tables.write().remove(name).is_some()
	}

	/// Writes `value` under `key` and returns the value it replaced.
	pub fn put(&self, table: &str, key: &[u8], value: &TableValue) -> Result<Option<TableValue>> {
		let mut tables = self.inner.tables.write();
		let state = tables.get_mut(table).ok_or_else(|| Error::TableNotFound(table.to_string()))?;
		let encoded = encode_value(state.format, value)?;
		trace!(table, key_len = key.len(), value_len = encoded.len(), "put");
		state.entries.insert(key.to_vec(), encoded).map(|previous| decode_value(state.format, &previous)).transpose()
	}

	/// Writes undecoded bytes, bypassing the table's value format.
	pub fn put_raw(&self, table: &str, key: &[u8], bytes: Vec<u8>) -> Result<()> {
		let mut tables = self.inner.tables.write();
		let state = tables.get_mut(table).ok_or_else(|| Error::TableNotFound(table.to_string()))?;
		state.entries.insert(key.to_vec(), bytes);
		Ok(())
	}

	/// Removes `key` and returns the removed value.
	pub fn delete(&self, table: &str, key: &[u8]) -> Result<Option<TableValue>> {
		let mut tables = self.inner.tables.write();
		let state = tables.get_mut(table).ok_or_else(|| Error::TableNotFound(table.to_string()))?;
		trace!(table, key_len = key.len(), "delete");
		state.entries.remove(key).map(|previous| decode_value(state.format, &previous)).transpose()
	}

	pub fn get(&self, table: &str, key: &[u8]) -> Result<Option<TableValue>> {
		let tables = self.inner.tables.read();
		let state = tables.get(table).ok_or_else(|| Error::TableNotFound(table.to_string()))?;
		state.entries.get(key).map(|bytes| decode_value(state.format, bytes)).transpose()
	}

	pub fn len(&self, table: &str) -> Result<usize> {
		let tables = self.inner.tables.read();
		tables.get(table).map(|state| state.entries.len()).ok_or_else(|| Error::TableNotFound(table.to_string()))
	}

	pub fn format(&self, table: &str) -> Option<ValueFormat> {
		self.inner.tables.read().get(table).map(|state| state.format)
	}

	/// Number of iterators currently open across all tables.
	pub fn open_iterators(&self) -> usize {
		self.inner.open_iterators.load(Ordering::Acquire)
	}
}

impl Default for MemoryOmStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MetadataCatalog for MemoryOmStore {
	fn table_names(&self) -> Result<Vec<String>> {
		Ok(self.inner.tables.read().keys().cloned().collect())
	}

	fn open_table(&self, name: &str) -> Result<Box<dyn Table + '_>> {
		if !self.inner.tables.read().contains_key(name) {
			return Err(Error::TableNotFound(name.to_string()));
		}
		Ok(Box::new(MemoryTable::new(&self.inner, name)))
	}
}

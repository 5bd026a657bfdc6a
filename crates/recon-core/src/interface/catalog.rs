// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::{Result, value::TableValue};

/// A decoded table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
	pub key: Vec<u8>,
	pub value: TableValue,
}

/// Catalog of the metadata store whose tables are summarised.
pub trait MetadataCatalog {
	/// Names of every table the catalog knows about.
	fn table_names(&self) -> Result<Vec<String>>;

	fn open_table(&self, name: &str) -> Result<Box<dyn Table + '_>>;
}

pub trait Table {
	fn name(&self) -> &str;

	/// Opens a full-scan iterator positioned at the first entry.
	///
	/// The underlying resource is released when the iterator is dropped.
	fn iter(&self) -> Result<Box<dyn TableIterator + '_>>;
}

pub trait TableIterator {
	fn seek_to_first(&mut self);

	/// Returns the next entry or `None` once the table is exhausted.
	fn next_entry(&mut self) -> Result<Option<KeyValue>>;
}

impl<C: MetadataCatalog + ?Sized> MetadataCatalog for Arc<C> {
	fn table_names(&self) -> Result<Vec<String>> {
		(**self).table_names()
	}

	fn open_table(&self, name: &str) -> Result<Box<dyn Table + '_>> {
		(**self).open_table(name)
	}
}

impl<C: MetadataCatalog + ?Sized> MetadataCatalog for &C {
	fn table_names(&self) -> Result<Vec<String>> {
		(**self).table_names()
	}

	fn open_table(&self, name: &str) -> Result<Box<dyn Table + '_>> {
		(**self).open_table(name)
	}
}

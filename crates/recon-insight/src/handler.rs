// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-table-kind strategies for counting entries and sizing their values.

use recon_core::{Error, Result, TableIterator, TableValue, UpdateEvent};
use tracing::warn;

use crate::accumulator::{Accumulators, TableSummary};

/// How the statistics of a table are computed. Selected once per table at task init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
	/// Entry count only.
	Counter,
	/// In-flight writes; sizes are summed over the parts of each key.
	OpenEntries,
	/// Deleted keys pending purge; sizes are summed over every retained version.
	DeletedEntries,
}

impl TableKind {
	pub fn handler(self) -> Option<TableHandler> {
		match self {
			TableKind::Counter => None,
			TableKind::OpenEntries => Some(TableHandler::OpenEntries),
			TableKind::DeletedEntries => Some(TableHandler::DeletedEntries),
		}
	}

	pub fn tracks_size(self) -> bool {
		self.handler().is_some()
	}
}

/// Bytes attributed to one table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntrySize {
	pub unreplicated: i64,
	pub replicated: i64,
}

impl EntrySize {
	pub fn new(unreplicated: u64, replicated: u64) -> Self {
		Self {
			unreplicated: i64::try_from(unreplicated).unwrap_or(i64::MAX),
			replicated: i64::try_from(replicated).unwrap_or(i64::MAX),
		}
	}
}

/// Extracts the size of a value, or `None` when the value is not of the expected shape.
pub type SizeExtractor = fn(&TableValue) -> Option<EntrySize>;

fn open_entry_size(value: &TableValue) -> Option<EntrySize> {
	match value {
		TableValue::Key(key) => Some(EntrySize::new(key.data_size(), key.replicated_size())),
		_ => None,
	}
}

fn deleted_entry_size(value: &TableValue) -> Option<EntrySize> {
	match value {
		TableValue::Deleted(deleted) => {
			let (unreplicated, replicated) = deleted.total_size();
			Some(EntrySize::new(unreplicated, replicated))
		}
		_ => None,
	}
}

/// Handler for tables that track sizes. The bookkeeping is shared; variants only differ in
/// their [`SizeExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHandler {
	OpenEntries,
	DeletedEntries,
}

impl TableHandler {
	pub fn name(&self) -> &'static str {
		match self {
			TableHandler::OpenEntries => "open entries",
			TableHandler::DeletedEntries => "deleted entries",
		}
	}

	pub fn extractor(&self) -> SizeExtractor {
		match self {
			TableHandler::OpenEntries => open_entry_size,
			TableHandler::DeletedEntries => deleted_entry_size,
		}
	}

	fn size_of(&self, table: &str, value: &TableValue) -> Result<EntrySize> {
		(self.extractor())(value).ok_or_else(|| {
			Error::handler(table, format!("{} handler cannot size a {} value", self.name(), value.kind_name()))
		})
	}

	/// Counts and sizes every entry of a table. The iterator is consumed but not closed.
	pub fn compute_from_scan(&self, table: &str, iter: &mut dyn TableIterator) -> Result<TableSummary> {
		iter.seek_to_first();

		let mut summary = TableSummary::default();
		while let Some(entry) = iter.next_entry()? {
			let size = self.size_of(table, &entry.value)?;
			summary.count = summary.count.saturating_add(1);
			summary.unreplicated_size = summary.unreplicated_size.saturating_add(size.unreplicated);
			summary.replicated_size = summary.replicated_size.saturating_add(size.replicated);
		}
		Ok(summary)
	}

	pub fn apply_insertion(&self, event: &UpdateEvent, table: &str, acc: &mut Accumulators) -> Result<()> {
		let Some(value) = &event.value else {
			return Ok(());
		};
		let size = self.size_of(table, value)?;
		acc.add_count(table, 1);
		acc.add_sizes(table, size.unreplicated, size.replicated);
		Ok(())
	}

	pub fn apply_removal(&self, event: &UpdateEvent, table: &str, acc: &mut Accumulators) -> Result<()> {
		let Some(value) = &event.value else {
			return Ok(());
		};
		let size = self.size_of(table, value)?;
		acc.add_count(table, -1);
		acc.add_sizes(table, -size.unreplicated, -size.replicated);
		Ok(())
	}

	/// Applies the size difference between the replaced and the new value. Counts are untouched.
	pub fn apply_modification(&self, event: &UpdateEvent, table: &str, acc: &mut Accumulators) -> Result<()> {
		let Some(value) = &event.value else {
			return Ok(());
		};
		let Some(old_value) = &event.old_value else {
			warn!(table, "update event without previous value, skipping size adjustment");
			return Ok(());
		};

		let new_size = self.size_of(table, value)?;
		let old_size = self.size_of(table, old_value)?;
		acc.add_sizes(
			table,
			new_size.unreplicated.saturating_sub(old_size.unreplicated),
			new_size.replicated.saturating_sub(old_size.replicated),
		);
		Ok(())
	}
}

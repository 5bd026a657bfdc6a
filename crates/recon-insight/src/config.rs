// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use recon_core::tables::{DELETED_TABLE, OPEN_FILE_TABLE, OPEN_KEY_TABLE};

use crate::handler::TableKind;

pub const DEFAULT_TASK_NAME: &str = "TableInsightTask";

/// Configuration of an [`InsightTask`](crate::InsightTask).
#[derive(Debug, Clone)]
pub struct InsightConfig {
	/// Name reported in every [`TaskResult`](crate::TaskResult).
	pub task_name: String,
	/// Tables with a size tracking handler. Every other table is a plain counter.
	pub handlers: BTreeMap<String, TableKind>,
}

impl Default for InsightConfig {
	fn default() -> Self {
		let handlers = BTreeMap::from([
			(OPEN_KEY_TABLE.to_string(), TableKind::OpenEntries),
			(OPEN_FILE_TABLE.to_string(), TableKind::OpenEntries),
			(DELETED_TABLE.to_string(), TableKind::DeletedEntries),
		]);
		Self {
			task_name: DEFAULT_TASK_NAME.to_string(),
			handlers,
		}
	}
}

impl InsightConfig {
	/// A configuration without any size tracking handler.
	pub fn counters_only() -> Self {
		Self {
			task_name: DEFAULT_TASK_NAME.to_string(),
			handlers: BTreeMap::new(),
		}
	}

	pub fn with_task_name(mut self, name: impl Into<String>) -> Self {
		self.task_name = name.into();
		self
	}

	pub fn with_handler(mut self, table: impl Into<String>, kind: TableKind) -> Self {
		self.handlers.insert(table.into(), kind);
		self
	}

	pub fn without_handler(mut self, table: &str) -> Self {
		self.handlers.remove(table);
		self
	}

	pub fn kind_of(&self, table: &str) -> TableKind {
		self.handlers.get(table).copied().unwrap_or(TableKind::Counter)
	}
}

/// Configuration of an [`InsightWorker`](crate::InsightWorker).
#[derive(Debug, Clone)]
pub struct WorkerConfig {
	/// Maximum number of queued messages before `submit` rejects a batch.
	pub channel_capacity: usize,
	/// Initialise and reprocess the whole catalog before the first batch.
	pub reprocess_on_start: bool,
	/// Reinitialise and reprocess after a batch fails.
	pub reprocess_on_failure: bool,
}

impl Default for WorkerConfig {
	fn default() -> Self {
		Self {
			channel_capacity: 1024,
			reprocess_on_start: true,
			reprocess_on_failure: true,
		}
	}
}

impl WorkerConfig {
	pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
		self.channel_capacity = capacity;
		self
	}

	pub fn with_reprocess_on_start(mut self, enabled: bool) -> Self {
		self.reprocess_on_start = enabled;
		self
	}

	pub fn with_reprocess_on_failure(mut self, enabled: bool) -> Self {
		self.reprocess_on_failure = enabled;
		self
	}
}

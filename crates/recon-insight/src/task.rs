// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, time::Instant};

use recon_core::{
	Error, MetadataCatalog, Result, StatKey, StatRecord, StatsStore, TableIterator, UpdateAction, UpdateEvent,
	UpdateEventBatch,
};
use tracing::{debug, error, instrument, trace};

use crate::{
	accumulator::{Accumulators, TableSummary},
	config::InsightConfig,
	handler::TableKind,
	key::{count_key, replicated_size_key, unreplicated_size_key},
};

/// A table the task is responsible for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
	pub name: String,
	pub kind: TableKind,
}

impl TableDescriptor {
	pub fn has_custom_handler(&self) -> bool {
		self.kind.tracks_size()
	}
}

/// Outcome of one `reprocess` or `process` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
	pub task_name: String,
	pub success: bool,
}

impl TaskResult {
	pub fn success(task_name: impl Into<String>) -> Self {
		Self {
			task_name: task_name.into(),
			success: true,
		}
	}

	pub fn failure(task_name: impl Into<String>) -> Self {
		Self {
			task_name: task_name.into(),
			success: false,
		}
	}
}

/// Maintains per-table count and size statistics of a metadata catalog.
///
/// `reprocess` recomputes every table from a full scan, `process` applies a batch of update
/// events. Both write into the same accumulators and flush them to the statistics store.
pub struct InsightTask<C, S> {
	config: InsightConfig,
	catalog: C,
	store: S,
	tables: BTreeMap<String, TableDescriptor>,
	accumulators: Accumulators,
	initialized: bool,
}

impl<C: MetadataCatalog, S: StatsStore> InsightTask<C, S> {
	pub fn new(config: InsightConfig, catalog: C, store: S) -> Self {
		Self {
			config,
			catalog,
			store,
			tables: BTreeMap::new(),
			accumulators: Accumulators::default(),
			initialized: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.config.task_name
	}

	pub fn config(&self) -> &InsightConfig {
		&self.config
	}

	pub fn catalog(&self) -> &C {
		&self.catalog
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn tables(&self) -> &BTreeMap<String, TableDescriptor> {
		&self.tables
	}

	pub fn accumulators(&self) -> &Accumulators {
		&self.accumulators
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Resolves the responsibility set and seeds the accumulators from the statistics store.
	///
	/// Calling it again discards every unflushed in-memory change. On failure the previous
	/// state is kept.
	#[instrument(name = "insight::task::init", level = "debug", skip(self), fields(task = %self.config.task_name))]
	pub fn init(&mut self) -> Result<()> {
		let mut tables = BTreeMap::new();
		for name in self.catalog.table_names()? {
			let kind = self.config.kind_of(&name);
			tables.insert(
				name.clone(),
				TableDescriptor {
					name,
					kind,
				},
			);
		}

		let mut accumulators = Accumulators::default();
		for table in tables.values() {
			let count = self.seed_value(count_key(&table.name))?;
			accumulators.set_count(&table.name, count);
		}
		// size keys follow the handler registry, whether or not the catalog has the table
		for (table, kind) in &self.config.handlers {
			if kind.tracks_size() {
				let unreplicated = self.seed_value(unreplicated_size_key(table))?;
				let replicated = self.seed_value(replicated_size_key(table))?;
				accumulators.set_sizes(table, unreplicated, replicated);
			}
		}

		debug!(tables = tables.len(), "insight task initialized");
		self.tables = tables;
		self.accumulators = accumulators;
		self.initialized = true;
		Ok(())
	}

	fn seed_value(&self, key: StatKey) -> Result<i64> {
		Ok(self.store.fetch_by_key(key.as_str())?.map(|record| record.value).unwrap_or(0))
	}

	/// Reinitialises, then recomputes every responsible table by scanning `snapshot`.
	///
	/// Tables the catalog gained since the last run are picked up.
	pub fn reprocess<M: MetadataCatalog + ?Sized>(&mut self, snapshot: &M) -> TaskResult {
		let result = self.try_reprocess(snapshot);
		self.to_task_result("reprocess", result)
	}

	/// Like [`reprocess`](Self::reprocess), scanning the task's own catalog.
	pub fn reprocess_catalog(&mut self) -> TaskResult {
		let result = self.try_reprocess_catalog();
		self.to_task_result("reprocess", result)
	}

	#[instrument(name = "insight::task::reprocess", level = "debug", skip_all, fields(task = %self.config.task_name))]
	pub fn try_reprocess<M: MetadataCatalog + ?Sized>(&mut self, snapshot: &M) -> Result<()> {
		self.init()?;
		let start = Instant::now();
		Self::reprocess_from(&self.tables, &mut self.accumulators, &self.store, snapshot)?;
		debug!(tables = self.tables.len(), elapsed_ms = start.elapsed().as_millis() as u64, "reprocess completed");
		Ok(())
	}

	pub fn try_reprocess_catalog(&mut self) -> Result<()> {
		self.init()?;
		let start = Instant::now();
		Self::reprocess_from(&self.tables, &mut self.accumulators, &self.store, &self.catalog)?;
		debug!(tables = self.tables.len(), elapsed_ms = start.elapsed().as_millis() as u64, "reprocess completed");
		Ok(())
	}

	/// Applies a batch of update events in order.
	pub fn process(&mut self, batch: &UpdateEventBatch) -> TaskResult {
		let result = self.try_process(batch);
		self.to_task_result("process", result)
	}

	#[instrument(
		name = "insight::task::process",
		level = "debug",
		skip_all,
		fields(task = %self.config.task_name, events = batch.len(), sequence = batch.sequence)
	)]
	pub fn try_process(&mut self, batch: &UpdateEventBatch) -> Result<()> {
		if !self.initialized {
			return Err(Error::NotInitialized);
		}
		let start = Instant::now();

		for event in batch.iter() {
			let Some(table) = self.tables.get(&event.table) else {
				trace!(table = %event.table, "event for table outside the responsibility set");
				continue;
			};
			Self::apply_event(table, event, &mut self.accumulators)?;
		}

		Self::flush_to(&self.store, &self.accumulators)?;
		debug!(elapsed_ms = start.elapsed().as_millis() as u64, "batch processed");
		Ok(())
	}

	/// Writes every non-empty accumulator map to the statistics store.
	pub fn flush(&self) -> Result<()> {
		Self::flush_to(&self.store, &self.accumulators)
	}

	/// Consumes the task, returning its catalog and statistics store.
	pub fn into_parts(self) -> (C, S) {
		(self.catalog, self.store)
	}

	fn to_task_result(&self, operation: &str, result: Result<()>) -> TaskResult {
		match result {
			Ok(()) => TaskResult::success(self.config.task_name.as_str()),
			Err(err) => {
				error!(task = %self.config.task_name, operation, kind = ?err.kind(), "{err}");
				TaskResult::failure(self.config.task_name.as_str())
			}
		}
	}

	fn reprocess_from<M: MetadataCatalog + ?Sized>(
		tables: &BTreeMap<String, TableDescriptor>,
		accumulators: &mut Accumulators,
		store: &S,
		snapshot: &M,
	) -> Result<()> {
		for table in tables.values() {
			let summary = Self::scan_table(table, snapshot)?;
			trace!(table = %table.name, count = summary.count, "table scanned");
			accumulators.apply_summary(&table.name, summary, table.has_custom_handler());
		}
		Self::flush_to(store, accumulators)
	}

	fn scan_table<M: MetadataCatalog + ?Sized>(table: &TableDescriptor, snapshot: &M) -> Result<TableSummary> {
		let handle = snapshot.open_table(&table.name)?;
		let mut iter = handle.iter()?;
		match table.kind.handler() {
			Some(handler) => handler.compute_from_scan(&table.name, &mut *iter),
			None => Ok(TableSummary {
				count: count_entries(&mut *iter)?,
				..TableSummary::default()
			}),
		}
	}

	fn apply_event(table: &TableDescriptor, event: &UpdateEvent, accumulators: &mut Accumulators) -> Result<()> {
		let name = table.name.as_str();
		match (&event.action, table.kind.handler()) {
			(UpdateAction::Put, Some(handler)) => handler.apply_insertion(event, name, accumulators),
			(UpdateAction::Delete, Some(handler)) => handler.apply_removal(event, name, accumulators),
			(UpdateAction::Update, Some(handler)) => handler.apply_modification(event, name, accumulators),
			(UpdateAction::Put, None) => {
				if event.value.is_some() {
					accumulators.add_count(name, 1);
				}
				Ok(())
			}
			(UpdateAction::Delete, None) => {
				if event.value.is_some() {
					accumulators.add_count(name, -1);
				}
				Ok(())
			}
			(UpdateAction::Update, None) => Ok(()),
			(UpdateAction::Unsupported(action), _) => {
				trace!(table = name, action = %action, "skipping unsupported event");
				Ok(())
			}
		}
	}

	fn flush_to(store: &S, accumulators: &Accumulators) -> Result<()> {
		let now = store.current_timestamp()?;

		for map in accumulators.maps() {
			if map.is_empty() {
				continue;
			}

			let mut inserts = Vec::new();
			let mut updates = Vec::new();
			for (key, value) in map {
				let record = StatRecord::new(key.clone(), *value, now);
				match store.fetch_by_key(key.as_str())? {
					None => inserts.push(record),
					Some(_) => updates.push(record),
				}
			}

			if !inserts.is_empty() {
				store.insert_all(&inserts)?;
			}
			if !updates.is_empty() {
				store.update_all(&updates)?;
			}
			trace!(inserted = inserts.len(), updated = updates.len(), "statistics map flushed");
		}
		Ok(())
	}
}

fn count_entries(iter: &mut dyn TableIterator) -> Result<i64> {
	iter.seek_to_first();
	let mut count = 0i64;
	while iter.next_entry()?.is_some() {
		count = count.saturating_add(1);
	}
	Ok(count)
}

#[cfg(test)]
mod tests {
	use recon_core::{
		ErrorKind,
		tables::{DELETED_TABLE, KEY_TABLE, OPEN_FILE_TABLE, OPEN_KEY_TABLE, VOLUME_TABLE},
	};
	use recon_om::{MemoryOmStore, ValueFormat};
	use recon_stats::MemoryStatsStore;
	use recon_testing::fixture::{ratis_key, raw};

	use super::*;

	fn task(om: &MemoryOmStore, stats: &MemoryStatsStore) -> InsightTask<MemoryOmStore, MemoryStatsStore> {
		InsightTask::new(InsightConfig::default(), om.clone(), stats.clone())
	}

	#[test]
	fn test_init_resolves_tables_and_kinds() {
		let om = MemoryOmStore::with_default_tables();
		let mut task = task(&om, &MemoryStatsStore::new());
		task.init().unwrap();

		assert_eq!(task.tables().len(), 9);
		assert_eq!(task.tables()[OPEN_KEY_TABLE].kind, TableKind::OpenEntries);
		assert!(!task.tables()[KEY_TABLE].has_custom_handler());
	}

	#[test]
	fn test_init_seeds_missing_keys_with_zero() {
		let om = MemoryOmStore::with_default_tables();
		let stats = MemoryStatsStore::new();
		stats.seed("keyTableCount", 12);

		let mut task = task(&om, &stats);
		task.init().unwrap();

		assert_eq!(task.accumulators().count_of(KEY_TABLE), Some(12));
		assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(0));
		assert_eq!(task.accumulators().sizes_of(OPEN_KEY_TABLE), Some((0, 0)));
		assert_eq!(task.accumulators().sizes_of(KEY_TABLE), None);
	}

	#[test]
	fn test_process_before_init_fails() {
		let om = MemoryOmStore::with_default_tables();
		let mut task = task(&om, &MemoryStatsStore::new());
		let err = task.try_process(&UpdateEventBatch::default()).unwrap_err();
		assert!(matches!(err, Error::NotInitialized));
		assert!(!task.process(&UpdateEventBatch::default()).success);
	}

	#[test]
	fn test_reprocess_initializes_on_demand() {
		let om = MemoryOmStore::with_default_tables();
		om.put(KEY_TABLE, b"a", &ratis_key("a", &[5])).unwrap();
		om.put(OPEN_KEY_TABLE, b"a", &ratis_key("a", &[10])).unwrap();

		let stats = MemoryStatsStore::new();
		let mut task = task(&om, &stats);
		let snapshot = om.clone();
		let result = task.reprocess(&snapshot);

		assert_eq!(result, TaskResult::success("TableInsightTask"));
		assert!(task.is_initialized());
		assert_eq!(stats.value("openKeyTableCount"), Some(1));
		assert_eq!(stats.value("openKeyTableReplicatedDataSize"), Some(30));
	}

	#[test]
	fn test_unsupported_and_counter_update_events_are_noops() {
		let om = MemoryOmStore::with_default_tables();
		let stats = MemoryStatsStore::new();
		let mut task = task(&om, &stats);
		task.init().unwrap();

		let mut unsupported = UpdateEvent::put(VOLUME_TABLE, *b"v", raw(b"v"));
		unsupported.action = UpdateAction::Unsupported("DELETE_RANGE".to_string());
		let batch = UpdateEventBatch::from(vec![
			unsupported,
			UpdateEvent::update(VOLUME_TABLE, *b"v", raw(b"old"), raw(b"new")),
		]);

		assert!(task.process(&batch).success);
		assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(0));
	}

	#[test]
	fn test_missing_snapshot_table_is_scan_failure() {
		let om = MemoryOmStore::with_default_tables();
		let mut task = task(&om, &MemoryStatsStore::new());
		task.init().unwrap();

		let snapshot = MemoryOmStore::new();
		let err = task.try_reprocess(&snapshot).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Scan);
	}

	#[test]
	fn test_reprocess_picks_up_tables_created_after_init() {
		let om = MemoryOmStore::with_default_tables();
		om.put(VOLUME_TABLE, b"/vol", &raw(b"vol")).unwrap();
		let stats = MemoryStatsStore::new();
		let mut task = task(&om, &stats);
		task.init().unwrap();

		om.create_table("snapshotInfoTable", ValueFormat::Raw);
		om.put("snapshotInfoTable", b"/vol/bucket/snap", &raw(b"snap")).unwrap();

		assert!(task.reprocess(&om).success);
		assert!(task.tables().contains_key("snapshotInfoTable"));
		assert_eq!(stats.value("volumeTableCount"), Some(1));
		assert_eq!(stats.value("snapshotInfoTableCount"), Some(1));
	}

	#[test]
	fn test_reprocess_reseeds_after_failed_batch() {
		let om = MemoryOmStore::with_default_tables();
		let stats = MemoryStatsStore::new();
		let mut task = task(&om, &stats);
		task.init().unwrap();

		let batch = UpdateEventBatch::from(vec![
			UpdateEvent::put(VOLUME_TABLE, *b"/ghost", raw(b"ghost")),
			UpdateEvent::put(OPEN_KEY_TABLE, *b"/bad", raw(b"bad")),
		]);
		assert!(!task.process(&batch).success);
		assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(1));

		assert!(task.reprocess(&om).success);
		assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(0));
		assert_eq!(stats.value("volumeTableCount"), Some(0));
	}

	#[test]
	fn test_size_keys_follow_handler_registry() {
		let om = MemoryOmStore::new();
		om.create_table(VOLUME_TABLE, ValueFormat::Raw);
		om.create_table(OPEN_KEY_TABLE, ValueFormat::Key);
		let stats = MemoryStatsStore::new();
		let mut task = task(&om, &stats);

		assert!(task.reprocess(&om).success);
		assert!(!task.tables().contains_key(OPEN_FILE_TABLE));
		assert_eq!(task.accumulators().sizes_of(OPEN_FILE_TABLE), Some((0, 0)));
		assert_eq!(task.accumulators().sizes_of(DELETED_TABLE), Some((0, 0)));
		assert_eq!(task.accumulators().count_of(OPEN_FILE_TABLE), None);

		assert_eq!(stats.value("openFileTableUnReplicatedDataSize"), Some(0));
		assert_eq!(stats.value("openFileTableReplicatedDataSize"), Some(0));
		assert_eq!(stats.value("openFileTableCount"), None);
		assert_eq!(stats.value("volumeTableUnReplicatedDataSize"), None);
	}

	#[test]
	fn test_accessors_and_into_parts() {
		let om = MemoryOmStore::with_default_tables();
		let stats = MemoryStatsStore::new();
		let config = InsightConfig::default().with_task_name("insights");
		let mut task = InsightTask::new(config, om.clone(), stats.clone());

		assert_eq!(task.name(), "insights");
		assert_eq!(task.config().kind_of(DELETED_TABLE), TableKind::DeletedEntries);
		assert_eq!(task.catalog().table_names().unwrap().len(), 9);
		assert_eq!(task.reprocess_catalog(), TaskResult::success("insights"));

		let (catalog, store) = task.into_parts();
		assert_eq!(catalog.open_iterators(), 0);
		assert_eq!(store.value("keyTableCount"), Some(0));
	}
}

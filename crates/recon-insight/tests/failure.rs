// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use recon_core::{
	Error, ErrorKind, ReplicationConfig, StatsStore, UpdateEvent, UpdateEventBatch,
	tables::{DELETED_TABLE, KEY_TABLE, OPEN_KEY_TABLE, VOLUME_TABLE},
};
use recon_insight::{InsightConfig, InsightTask};
use recon_om::MemoryOmStore;
use recon_stats::MemoryStatsStore;
use recon_testing::{
	fault::{FaultyCatalog, FaultyStatsStore},
	fixture::{deleted_key, ratis_key, raw},
	logging,
};

fn populated() -> MemoryOmStore {
	let om = MemoryOmStore::with_default_tables();
	for i in 0..3u8 {
		let name = format!("k{i}");
		om.put(KEY_TABLE, name.as_bytes(), &ratis_key(&name, &[100])).unwrap();
		om.put(OPEN_KEY_TABLE, name.as_bytes(), &ratis_key(&name, &[10])).unwrap();
	}
	om.put(DELETED_TABLE, b"d", &deleted_key("d", ReplicationConfig::ratis_one(), &[7, 8])).unwrap();
	om.put(VOLUME_TABLE, b"/vol", &raw(b"vol")).unwrap();
	om
}

#[test]
fn test_scan_failure_aborts_without_flushing() {
	logging::init();

	let om = populated();
	let stats = MemoryStatsStore::new();
	stats.seed("keyTableCount", 7);

	let snapshot = FaultyCatalog::new(om.clone());
	snapshot.fail_scan(KEY_TABLE, 1);

	let mut task = InsightTask::new(InsightConfig::default(), om.clone(), stats.clone());
	task.init().unwrap();

	let err = task.try_reprocess(&snapshot).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Scan);
	assert_eq!(om.open_iterators(), 0);

	// tables scanned before the failing one stay applied in memory
	assert_eq!(task.accumulators().count_of(DELETED_TABLE), Some(1));
	assert_eq!(task.accumulators().sizes_of(DELETED_TABLE), Some((15, 15)));
	assert_eq!(task.accumulators().count_of(KEY_TABLE), Some(7));

	// nothing was written
	assert_eq!(stats.len(), 1);
	assert_eq!(stats.value("keyTableCount"), Some(7));
	assert_eq!(stats.value("deletedTableCount"), None);

	snapshot.heal();
	assert!(task.reprocess(&snapshot).success);
	assert_eq!(om.open_iterators(), 0);
	assert_eq!(stats.value("keyTableCount"), Some(3));
	assert_eq!(stats.value("openKeyTableCount"), Some(3));
	assert_eq!(stats.value("openKeyTableReplicatedDataSize"), Some(90));
}

#[test]
fn test_corrupt_entry_is_scan_failure() {
	logging::init();

	let om = populated();
	om.put_raw(OPEN_KEY_TABLE, b"zzz", vec![0xff, 0xff, 0xff]).unwrap();

	let mut task = InsightTask::new(InsightConfig::default(), om.clone(), MemoryStatsStore::new());
	let err = task.try_reprocess(&om).unwrap_err();
	assert!(matches!(err, Error::Scan { ref table, .. } if table == OPEN_KEY_TABLE));
	assert_eq!(om.open_iterators(), 0);
	assert!(task.store().is_empty());
}

#[test]
fn test_handler_failure_flushes_nothing() {
	logging::init();

	let om = MemoryOmStore::with_default_tables();
	let stats = Arc::new(FaultyStatsStore::new(MemoryStatsStore::new()));
	let mut task = InsightTask::new(InsightConfig::default(), om, stats.clone());
	task.init().unwrap();

	let batch = UpdateEventBatch::new(
		vec![
			UpdateEvent::put(VOLUME_TABLE, *b"/vol", raw(b"vol")),
			UpdateEvent::put(OPEN_KEY_TABLE, *b"k", raw(b"not a key")),
			UpdateEvent::put(VOLUME_TABLE, *b"/vol2", raw(b"vol2")),
		],
		3,
	);

	let err = task.try_process(&batch).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Handler);
	assert_eq!(stats.inserted(), 0);
	assert_eq!(stats.updated(), 0);
	assert!(stats.inner().is_empty());

	// events before the failing one remain applied
	assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(1));
	assert_eq!(task.accumulators().count_of(OPEN_KEY_TABLE), Some(0));
}

#[test]
fn test_store_write_failure_reports_failure() {
	logging::init();

	let om = populated();
	let stats = Arc::new(FaultyStatsStore::new(MemoryStatsStore::new()));
	let mut task = InsightTask::new(InsightConfig::default(), om.clone(), stats.clone());

	stats.fail_inserts(true);
	let result = task.reprocess(&om);
	assert!(!result.success);
	assert_eq!(result.task_name, "TableInsightTask");
	assert!(stats.inner().is_empty());
	assert_eq!(om.open_iterators(), 0);

	stats.fail_inserts(false);
	assert!(task.reprocess(&om).success);
	assert_eq!(stats.inner().value("volumeTableCount"), Some(1));
}

#[test]
fn test_init_discards_unflushed_changes() {
	logging::init();

	let om = MemoryOmStore::with_default_tables();
	let stats = Arc::new(FaultyStatsStore::new(MemoryStatsStore::new()));
	stats.inner().seed("volumeTableCount", 4);

	let mut task = InsightTask::new(InsightConfig::default(), om, stats.clone());
	task.init().unwrap();

	stats.fail_inserts(true);
	stats.fail_updates(true);
	let batch = UpdateEventBatch::from(vec![
		UpdateEvent::put(VOLUME_TABLE, *b"/a", raw(b"a")),
		UpdateEvent::put(VOLUME_TABLE, *b"/b", raw(b"b")),
	]);
	assert!(!task.process(&batch).success);
	assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(6));

	task.init().unwrap();
	assert_eq!(task.accumulators().count_of(VOLUME_TABLE), Some(4));
	assert_eq!(stats.fetch_by_key("volumeTableCount").unwrap().map(|r| r.value), Some(4));
}

#[test]
fn test_second_flush_only_updates() {
	logging::init();

	let om = populated();
	let stats = Arc::new(FaultyStatsStore::new(MemoryStatsStore::new()));
	let mut task = InsightTask::new(InsightConfig::default(), om.clone(), stats.clone());

	assert!(task.reprocess(&om).success);
	// 9 count keys plus two size keys for each of the three handler tables
	assert_eq!(stats.inserted(), 15);
	assert_eq!(stats.updated(), 0);

	stats.reset_counts();
	assert!(task.reprocess(&om).success);
	assert_eq!(stats.inserted(), 0);
	assert_eq!(stats.updated(), 15);
	assert_eq!(stats.inner().len(), 15);
}

#[test]
fn test_repeated_flush_updates_existing_records() {
	logging::init();

	let om = populated();
	let stats = Arc::new(FaultyStatsStore::new(MemoryStatsStore::new()));
	let mut task = InsightTask::new(InsightConfig::default(), om.clone(), stats.clone());
	assert!(task.reprocess(&om).success);
	let before = stats.inner().value("keyTableCount");

	for _ in 0..2 {
		stats.reset_counts();
		task.flush().unwrap();
		assert_eq!(stats.inserted(), 0);
		assert_eq!(stats.updated(), 15);
	}
	assert_eq!(stats.inner().len(), 15);
	assert_eq!(stats.inner().value("keyTableCount"), before);
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Shared interfaces and types for table insight statistics.
//!
//! This crate provides:
//! - The table value model of the metadata store (keys, deleted keys, replication)
//! - Update events as delivered by the change feed
//! - Statistic keys and persisted statistic records
//! - The boundary traits: [`MetadataCatalog`], [`Table`], [`TableIterator`] and [`StatsStore`]

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod event;
pub mod interface;
pub mod replication;
pub mod stats;
pub mod util;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use event::{UpdateAction, UpdateEvent, UpdateEventBatch};
pub use interface::{KeyValue, MetadataCatalog, StatsStore, Table, TableIterator};
pub use replication::ReplicationConfig;
pub use stats::{StatKey, StatRecord, Timestamp};
pub use util::clock::Clock;
pub use value::{KeyInfo, PartLocation, RepeatedKeyInfo, TableValue};

/// Well known table names of the metadata store.
pub mod tables {
	pub const VOLUME_TABLE: &str = "volumeTable";
	pub const BUCKET_TABLE: &str = "bucketTable";
	pub const KEY_TABLE: &str = "keyTable";
	pub const FILE_TABLE: &str = "fileTable";
	pub const DIRECTORY_TABLE: &str = "directoryTable";
	pub const OPEN_KEY_TABLE: &str = "openKeyTable";
	pub const OPEN_FILE_TABLE: &str = "openFileTable";
	pub const DELETED_TABLE: &str = "deletedTable";
	pub const DELETED_DIR_TABLE: &str = "deletedDirectoryTable";
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use crate::{
	Result,
	stats::{StatRecord, Timestamp},
};

/// Persistent storage for aggregate statistic records.
///
/// `insert_all` and `update_all` are independent bulk operations; callers must not assume
/// they commit together.
pub trait StatsStore {
	fn fetch_by_key(&self, key: &str) -> Result<Option<StatRecord>>;

	fn insert_all(&self, records: &[StatRecord]) -> Result<()>;

	fn update_all(&self, records: &[StatRecord]) -> Result<()>;

	/// The store's notion of "now", stamped onto every written record.
	fn current_timestamp(&self) -> Result<Timestamp>;
}

impl<S: StatsStore + ?Sized> StatsStore for Arc<S> {
	fn fetch_by_key(&self, key: &str) -> Result<Option<StatRecord>> {
		(**self).fetch_by_key(key)
	}

	fn insert_all(&self, records: &[StatRecord]) -> Result<()> {
		(**self).insert_all(records)
	}

	fn update_all(&self, records: &[StatRecord]) -> Result<()> {
		(**self).update_all(records)
	}

	fn current_timestamp(&self) -> Result<Timestamp> {
		(**self).current_timestamp()
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Decoded values held by the tables of the metadata store.

use serde::{Deserialize, Serialize};

use crate::replication::ReplicationConfig;

/// One allocated part of a key, e.g. a block or an uploaded multipart segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartLocation {
	pub length: u64,
}

/// Metadata of a single (possibly still open) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
	pub volume: String,
	pub bucket: String,
	pub name: String,
	pub replication: ReplicationConfig,
	pub parts: Vec<PartLocation>,
}

impl KeyInfo {
	pub fn new(
		volume: impl Into<String>,
		bucket: impl Into<String>,
		name: impl Into<String>,
		replication: ReplicationConfig,
	) -> Self {
		Self {
			volume: volume.into(),
			bucket: bucket.into(),
			name: name.into(),
			replication,
			parts: vec![],
		}
	}

	pub fn with_part(mut self, length: u64) -> Self {
		self.parts.push(PartLocation {
			length,
		});
		self
	}

	/// Sum of all part lengths.
	pub fn data_size(&self) -> u64 {
		self.parts.iter().fold(0u64, |acc, part| acc.saturating_add(part.length))
	}

	pub fn replicated_size(&self) -> u64 {
		self.replication.replicated_size(self.data_size())
	}
}

/// Every version of a key that was deleted but not yet purged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedKeyInfo {
	pub versions: Vec<KeyInfo>,
}

impl RepeatedKeyInfo {
	pub fn new(versions: Vec<KeyInfo>) -> Self {
		Self {
			versions,
		}
	}

	/// Returns `(unreplicated, replicated)` bytes summed over all versions.
	pub fn total_size(&self) -> (u64, u64) {
		self.versions.iter().fold((0u64, 0u64), |(unreplicated, replicated), version| {
			(unreplicated.saturating_add(version.data_size()), replicated.saturating_add(version.replicated_size()))
		})
	}
}

/// A decoded table value. Tables whose schema the insight engine does not need keep raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableValue {
	Key(KeyInfo),
	Deleted(RepeatedKeyInfo),
	Raw(Vec<u8>),
}

impl TableValue {
	pub fn kind_name(&self) -> &'static str {
		match self {
			TableValue::Key(_) => "key",
			TableValue::Deleted(_) => "deleted",
			TableValue::Raw(_) => "raw",
		}
	}
}

impl From<KeyInfo> for TableValue {
	fn from(value: KeyInfo) -> Self {
		TableValue::Key(value)
	}
}

impl From<RepeatedKeyInfo> for TableValue {
	fn from(value: RepeatedKeyInfo) -> Self {
		TableValue::Deleted(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_key_info_sums_parts() {
		let key = KeyInfo::new("vol", "bucket", "key", ReplicationConfig::ratis_three())
			.with_part(100)
			.with_part(50);
		assert_eq!(key.data_size(), 150);
		assert_eq!(key.replicated_size(), 450);
	}

	#[test]
	fn test_key_info_without_parts() {
		let key = KeyInfo::new("vol", "bucket", "key", ReplicationConfig::ratis_three());
		assert_eq!(key.data_size(), 0);
		assert_eq!(key.replicated_size(), 0);
	}

	#[test]
	fn test_repeated_key_info_sums_versions() {
		let deleted = RepeatedKeyInfo::new(vec![
			KeyInfo::new("vol", "bucket", "key", ReplicationConfig::ratis_three()).with_part(200),
			KeyInfo::new("vol", "bucket", "key", ReplicationConfig::ratis_one()).with_part(300),
		]);
		assert_eq!(deleted.total_size(), (500, 900));
	}
}

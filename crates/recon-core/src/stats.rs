// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	borrow::Borrow,
	fmt::{self, Display, Formatter},
};

/// Name of one persisted statistic, e.g. `keyTableCount`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatKey(String);

impl StatKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for StatKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for StatKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for StatKey {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn millis(&self) -> i64 {
		self.0
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
	pub key: StatKey,
	pub value: i64,
	pub updated_at: Timestamp,
}

impl StatRecord {
	pub fn new(key: StatKey, value: i64, updated_at: Timestamp) -> Self {
		Self {
			key,
			value,
			updated_at,
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	Memory,
	File(PathBuf),
}

/// Configuration for [`super::SqliteStatsStore`].
#[derive(Debug, Clone)]
pub struct SqliteConfig {
	pub path: DbPath,
	/// How long a statement waits on a locked database before failing.
	pub busy_timeout: Duration,
}

impl SqliteConfig {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: DbPath::File(path.into()),
			..Self::default()
		}
	}

	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			..Self::default()
		}
	}

	pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
		self.busy_timeout = busy_timeout;
		self
	}
}

impl Default for SqliteConfig {
	fn default() -> Self {
		Self {
			path: DbPath::Memory,
			busy_timeout: Duration::from_secs(5),
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicI64, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use crate::stats::Timestamp;

/// Source of wall clock time. Tests use [`Clock::mock`] to get deterministic timestamps.
#[derive(Debug, Clone, Default)]
pub enum Clock {
	#[default]
	System,
	Mock(Arc<AtomicI64>),
}

impl Clock {
	pub fn mock(millis: i64) -> Self {
		Clock::Mock(Arc::new(AtomicI64::new(millis)))
	}

	pub fn now(&self) -> Timestamp {
		match self {
			Clock::System => {
				let millis = SystemTime::now()
					.duration_since(UNIX_EPOCH)
					.map(|d| d.as_millis() as i64)
					.unwrap_or_default();
				Timestamp(millis)
			}
			Clock::Mock(millis) => Timestamp(millis.load(Ordering::Acquire)),
		}
	}

	/// No-op for [`Clock::System`].
	pub fn set(&self, millis: i64) {
		if let Clock::Mock(current) = self {
			current.store(millis, Ordering::Release);
		}
	}

	/// No-op for [`Clock::System`].
	pub fn advance(&self, millis: i64) {
		if let Clock::Mock(current) = self {
			current.fetch_add(millis, Ordering::AcqRel);
		}
	}
}

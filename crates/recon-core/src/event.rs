// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Update events delivered by the metadata store's change feed.

use std::fmt::{self, Display, Formatter};

use crate::value::TableValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
	Put,
	Delete,
	Update,
	/// A feed operation the insight engine does not interpret, e.g. a range delete.
	Unsupported(String),
}

impl Display for UpdateAction {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			UpdateAction::Put => f.write_str("PUT"),
			UpdateAction::Delete => f.write_str("DELETE"),
			UpdateAction::Update => f.write_str("UPDATE"),
			UpdateAction::Unsupported(name) => write!(f, "UNSUPPORTED({name})"),
		}
	}
}

/// A single mutation of one table entry.
///
/// `value` is the value written by a PUT or UPDATE, and the removed value for a DELETE.
/// `old_value` is only set for UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEvent {
	pub table: String,
	pub action: UpdateAction,
	pub key: Vec<u8>,
	pub value: Option<TableValue>,
	pub old_value: Option<TableValue>,
}

impl UpdateEvent {
	pub fn put(table: impl Into<String>, key: impl Into<Vec<u8>>, value: impl Into<Option<TableValue>>) -> Self {
		Self {
			table: table.into(),
			action: UpdateAction::Put,
			key: key.into(),
			value: value.into(),
			old_value: None,
		}
	}

	pub fn delete(table: impl Into<String>, key: impl Into<Vec<u8>>, value: impl Into<Option<TableValue>>) -> Self {
		Self {
			table: table.into(),
			action: UpdateAction::Delete,
			key: key.into(),
			value: value.into(),
			old_value: None,
		}
	}

	pub fn update(
		table: impl Into<String>,
		key: impl Into<Vec<u8>>,
		old_value: impl Into<Option<TableValue>>,
		value: impl Into<Option<TableValue>>,
	) -> Self {
		Self {
			table: table.into(),
			action: UpdateAction::Update,
			key: key.into(),
			value: value.into(),
			old_value: old_value.into(),
		}
	}
}

/// An ordered batch of events, tagged with the feed sequence number of its last event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEventBatch {
	pub events: Vec<UpdateEvent>,
	pub sequence: u64,
}

impl UpdateEventBatch {
	pub fn new(events: Vec<UpdateEvent>, sequence: u64) -> Self {
		Self {
			events,
			sequence,
		}
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &UpdateEvent> {
		self.events.iter()
	}
}

impl From<Vec<UpdateEvent>> for UpdateEventBatch {
	fn from(events: Vec<UpdateEvent>) -> Self {
		Self::new(events, 0)
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory metadata store.
//!
//! Tables hold encoded values and decode them while being scanned, the same way an
//! on-disk store does. Iterators work on a snapshot taken when they are opened, so
//! writes made during a scan are not observed by it.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod codec;
mod store;
mod table;

pub use codec::{ValueFormat, decode_value, encode_value};
pub use store::MemoryOmStore;
pub use table::{MemoryTable, SnapshotIter};

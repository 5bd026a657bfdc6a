// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
mod store;

pub use catalog::{KeyValue, MetadataCatalog, Table, TableIterator};
pub use store::StatsStore;

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Table count and size statistics derived from a metadata store.
//!
//! This crate provides:
//! - [`InsightTask`], which keeps per-table statistics either by scanning every table
//!   (`reprocess`) or by replaying update events (`process`)
//! - Table handlers that extract byte sizes from open keys and deleted keys
//! - [`InsightReader`] for querying the persisted statistics
//! - [`InsightWorker`], a single-writer thread feeding event batches to a task
//!
//! # Architecture
//!
//! Both update paths write into the same [`Accumulators`] and persist them through the
//! same flush routine, so a scan of a table and the replay of the events that produced it
//! must arrive at identical numbers.
//!
//! # Usage
//!
//! ```ignore
//! let mut task = InsightTask::new(InsightConfig::default(), catalog, store);
//! task.init()?;
//! assert!(task.reprocess(&snapshot).success);
//!
//! // steady state
//! let result = task.process(&batch);
//! if !result.success {
//!     task.init()?;
//!     task.reprocess(&snapshot);
//! }
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod accumulator;
mod config;
mod handler;
mod key;
mod reader;
mod task;
mod worker;

pub use accumulator::{Accumulators, TableSummary};
pub use config::{InsightConfig, WorkerConfig};
pub use handler::{EntrySize, SizeExtractor, TableHandler, TableKind};
pub use key::{count_key, replicated_size_key, unreplicated_size_key};
pub use reader::{InsightReader, TableStats};
pub use task::{InsightTask, TableDescriptor, TaskResult};
pub use worker::{InsightWorker, TaskResultCallback};

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Background worker owning an insight task.
//!
//! Event batches are queued on a bounded channel and applied by a single thread, so the
//! task never needs to be shared. A failed batch can trigger a reseed and full reprocess.

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender, bounded};
use recon_core::{Error, MetadataCatalog, Result, StatsStore, UpdateEventBatch};
use tracing::{debug, error, warn};

use crate::{
	config::WorkerConfig,
	task::{InsightTask, TaskResult},
};

/// Receives the result of every invocation run by the worker.
pub trait TaskResultCallback: Send + 'static {
	fn on_result(&self, result: &TaskResult);
}

impl TaskResultCallback for Sender<TaskResult> {
	fn on_result(&self, result: &TaskResult) {
		let _ = self.send(result.clone());
	}
}

impl TaskResultCallback for Box<dyn Fn(&TaskResult) + Send> {
	fn on_result(&self, result: &TaskResult) {
		self(result)
	}
}

#[derive(Debug)]
enum InsightMessage {
	Batch(UpdateEventBatch),
	Reprocess,
	Shutdown,
}

pub struct InsightWorker<C, S> {
	sender: Sender<InsightMessage>,
	running: Arc<AtomicBool>,
	worker: Option<JoinHandle<InsightTask<C, S>>>,
}

impl<C, S> InsightWorker<C, S>
where
	C: MetadataCatalog + Send + 'static,
	S: StatsStore + Send + 'static,
{
	/// Moves `task` onto a new thread and starts consuming batches.
	pub fn spawn<F: TaskResultCallback>(config: WorkerConfig, task: InsightTask<C, S>, callback: F) -> Result<Self> {
		let (sender, receiver) = bounded(config.channel_capacity);
		let running = Arc::new(AtomicBool::new(true));

		let worker = thread::Builder::new()
			.name("insight-worker".to_string())
			.spawn(move || Self::worker_loop(receiver, task, callback, config))
			.map_err(|err| Error::Internal(format!("failed to spawn insight worker: {err}")))?;

		Ok(Self {
			sender,
			running,
			worker: Some(worker),
		})
	}

	/// Queues a batch without blocking. A full or closed queue hands the batch back.
	pub fn submit(&self, batch: UpdateEventBatch) -> std::result::Result<(), UpdateEventBatch> {
		match self.sender.try_send(InsightMessage::Batch(batch)) {
			Ok(()) => Ok(()),
			Err(err) => match err.into_inner() {
				InsightMessage::Batch(batch) => Err(batch),
				InsightMessage::Reprocess | InsightMessage::Shutdown => Ok(()),
			},
		}
	}

	/// Queues a batch, waiting for room in the queue.
	pub fn submit_blocking(&self, batch: UpdateEventBatch) -> Result<()> {
		self.send(InsightMessage::Batch(batch))
	}

	/// Queues a full reprocess of the task's catalog.
	pub fn request_reprocess(&self) -> Result<()> {
		self.send(InsightMessage::Reprocess)
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::Acquire)
	}

	/// Processes every queued message, then stops the thread and returns the task.
	pub fn stop(&mut self) -> Option<InsightTask<C, S>> {
		if !self.running.swap(false, Ordering::AcqRel) {
			return None;
		}

		let _ = self.sender.send(InsightMessage::Shutdown);

		let worker = self.worker.take()?;
		match worker.join() {
			Ok(task) => Some(task),
			Err(_) => {
				error!("insight worker panicked");
				None
			}
		}
	}

	fn send(&self, message: InsightMessage) -> Result<()> {
		if !self.is_running() {
			return Err(Error::Internal("insight worker is stopped".to_string()));
		}
		self.sender.send(message).map_err(|_| Error::Internal("insight worker is gone".to_string()))
	}

	fn worker_loop<F: TaskResultCallback>(
		receiver: Receiver<InsightMessage>,
		mut task: InsightTask<C, S>,
		callback: F,
		config: WorkerConfig,
	) -> InsightTask<C, S> {
		debug!(task = task.name(), "insight worker started");

		if config.reprocess_on_start {
			Self::recover(&mut task, &callback);
		}

		while let Ok(message) = receiver.recv() {
			match message {
				InsightMessage::Batch(batch) => {
					let result = task.process(&batch);
					let failed = !result.success;
					callback.on_result(&result);

					if failed && config.reprocess_on_failure {
						warn!(task = task.name(), sequence = batch.sequence, "batch failed, reprocessing");
						Self::recover(&mut task, &callback);
					}
				}
				InsightMessage::Reprocess => {
					let result = task.reprocess_catalog();
					callback.on_result(&result);
				}
				InsightMessage::Shutdown => {
					debug!("insight worker received shutdown signal");
					break;
				}
			}
		}

		debug!(task = task.name(), "insight worker stopped");
		task
	}

	/// Reseeds the task from the statistics store and rebuilds every table from a scan.
	fn recover<F: TaskResultCallback>(task: &mut InsightTask<C, S>, callback: &F) {
		let result = task.reprocess_catalog();
		callback.on_result(&result);
	}
}

impl<C, S> Drop for InsightWorker<C, S> {
	fn drop(&mut self) {
		if !self.running.swap(false, Ordering::AcqRel) {
			return;
		}
		let _ = self.sender.send(InsightMessage::Shutdown);
		if let Some(worker) = self.worker.take() {
			let _ = worker.join();
		}
	}
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error types shared by every insight crate.

/// Result type used throughout the insight crates.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("failed to scan table '{table}': {message}")]
	Scan {
		table: String,
		message: String,
	},

	#[error("handler for table '{table}' failed: {message}")]
	Handler {
		table: String,
		message: String,
	},

	#[error("failed to write statistics: {message}")]
	StoreWrite {
		message: String,
	},

	#[error("failed to read statistics: {message}")]
	StoreRead {
		message: String,
	},

	#[error("codec error: {0}")]
	Codec(String),

	#[error("table '{0}' not found")]
	TableNotFound(String),

	#[error("insight task has not been initialized")]
	NotInitialized,

	#[error("internal error: {0}")]
	Internal(String),
}

/// Coarse classification used by the task when deciding how a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Scan,
	Handler,
	StoreWrite,
	Other,
}

impl Error {
	pub fn scan(table: impl Into<String>, message: impl ToString) -> Self {
		Error::Scan {
			table: table.into(),
			message: message.to_string(),
		}
	}

	pub fn handler(table: impl Into<String>, message: impl ToString) -> Self {
		Error::Handler {
			table: table.into(),
			message: message.to_string(),
		}
	}

	pub fn store_write(message: impl ToString) -> Self {
		Error::StoreWrite {
			message: message.to_string(),
		}
	}

	pub fn store_read(message: impl ToString) -> Self {
		Error::StoreRead {
			message: message.to_string(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			// a table that disappeared or fails to decode is a scan problem
			Error::Scan {
				..
			}
			| Error::TableNotFound(_)
			| Error::Codec(_) => ErrorKind::Scan,
			Error::Handler {
				..
			} => ErrorKind::Handler,
			Error::StoreWrite {
				..
			} => ErrorKind::StoreWrite,
			Error::StoreRead {
				..
			}
			| Error::NotInitialized
			| Error::Internal(_) => ErrorKind::Other,
		}
	}
}

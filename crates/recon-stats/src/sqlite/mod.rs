// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite implementation of [`StatsStore`].
//!
//! Records live in a single `global_stats` table. Each bulk operation runs in its own
//! SQLite transaction; an insert batch and the update batch that follows it are not
//! linked.

mod config;

pub use config::{DbPath, SqliteConfig};
use parking_lot::Mutex;
use recon_core::{Error, Result, StatKey, StatRecord, StatsStore, Timestamp};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, instrument};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS global_stats (
	key TEXT PRIMARY KEY NOT NULL,
	value INTEGER NOT NULL,
	last_updated_timestamp INTEGER NOT NULL
)";

pub struct SqliteStatsStore {
	conn: Mutex<Connection>,
}

impl SqliteStatsStore {
	#[instrument(name = "stats::sqlite::new", level = "info", skip(config), fields(db_path = ?config.path))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		let conn = match &config.path {
			DbPath::Memory => Connection::open_in_memory(),
			DbPath::File(path) => Connection::open(path),
		}
		.map_err(|e| Error::Internal(format!("failed to open statistics database: {e}")))?;

		conn.busy_timeout(config.busy_timeout)
			.map_err(|e| Error::Internal(format!("failed to configure statistics database: {e}")))?;
		conn.execute(CREATE_TABLE, [])
			.map_err(|e| Error::Internal(format!("failed to create global_stats table: {e}")))?;

		debug!("statistics database ready");
		Ok(Self {
			conn: Mutex::new(conn),
		})
	}

	pub fn in_memory() -> Result<Self> {
		Self::new(SqliteConfig::in_memory())
	}

	/// Every stored record ordered by key.
	pub fn records(&self) -> Result<Vec<StatRecord>> {
		let conn = self.conn.lock();
		let mut stmt = conn
			.prepare_cached("SELECT key, value, last_updated_timestamp FROM global_stats ORDER BY key")
			.map_err(Error::store_read)?;
		let rows = stmt
			.query_map([], |row| {
				Ok(StatRecord::new(StatKey::new(row.get::<_, String>(0)?), row.get(1)?, Timestamp(row.get(2)?)))
			})
			.map_err(Error::store_read)?;
		rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::store_read)
	}
}

impl StatsStore for SqliteStatsStore {
	#[instrument(name = "stats::sqlite::fetch", level = "trace", skip(self))]
	fn fetch_by_key(&self, key: &str) -> Result<Option<StatRecord>> {
		let conn = self.conn.lock();
		conn.query_row(
			"SELECT key, value, last_updated_timestamp FROM global_stats WHERE key = ?1",
			params![key],
			|row| Ok(StatRecord::new(StatKey::new(row.get::<_, String>(0)?), row.get(1)?, Timestamp(row.get(2)?))),
		)
		.optional()
		.map_err(|e| Error::store_read(format!("failed to fetch '{key}': {e}")))
	}

	#[instrument(name = "stats::sqlite::insert_all", level = "trace", skip(self, records), fields(records = records.len()))]
	fn insert_all(&self, records: &[StatRecord]) -> Result<()> {
		if records.is_empty() {
			return Ok(());
		}

		let mut conn = self.conn.lock();
		let tx = conn.transaction().map_err(Error::store_write)?;
		{
			let mut stmt = tx
				.prepare_cached(
					"INSERT INTO global_stats (key, value, last_updated_timestamp) VALUES (?1, ?2, ?3)",
				)
				.map_err(Error::store_write)?;
			for record in records {
				stmt.execute(params![record.key.as_str(), record.value, record.updated_at.millis()])
					.map_err(|e| Error::store_write(format!("failed to insert '{}': {e}", record.key)))?;
			}
		}
		tx.commit().map_err(Error::store_write)
	}

	#[instrument(name = "stats::sqlite::update_all", level = "trace", skip(self, records), fields(records = records.len()))]
	fn update_all(&self, records: &[StatRecord]) -> Result<()> {
		if records.is_empty() {
			return Ok(());
		}

		let mut conn = self.conn.lock();
		let tx = conn.transaction().map_err(Error::store_write)?;
		{
			let mut stmt = tx
				.prepare_cached("UPDATE global_stats SET value = ?2, last_updated_timestamp = ?3 WHERE key = ?1")
				.map_err(Error::store_write)?;
			for record in records {
				let changed = stmt
					.execute(params![record.key.as_str(), record.value, record.updated_at.millis()])
					.map_err(|e| Error::store_write(format!("failed to update '{}': {e}", record.key)))?;
				if changed == 0 {
					return Err(Error::store_write(format!("record '{}' does not exist", record.key)));
				}
			}
		}
		tx.commit().map_err(Error::store_write)
	}

	fn current_timestamp(&self) -> Result<Timestamp> {
		let conn = self.conn.lock();
		conn.query_row("SELECT CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)", [], |row| row.get(0))
			.map(Timestamp)
			.map_err(Error::store_read)
	}
}

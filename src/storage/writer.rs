use super::schema::{self, SCHEMA_VERSION};
use crate::error::{Error, Result};
use crate::model::{ComponentMetric, DataRecord};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Writer for a dashboard database
pub struct Storage {
    conn: Connection,
    start_time: Instant,
    /// Checkpoint timestamps continue from here when reopening a database
    base_ms: i64,
    checkpoint_id: i64,
    /// Latest snapshot per component id since the last flush
    pending: HashMap<String, ComponentMetric>,
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )
}

impl Storage {
    /// Create a fresh database at `path`, replacing any tables already there
    pub fn create(path: &Path, label: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        configure(&conn)?;
        conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;

        schema::create_tables(&conn)?;
        schema::set_meta(&conn, "version", &SCHEMA_VERSION.to_string())?;
        schema::set_meta(&conn, "label", label)?;
        schema::set_meta(&conn, "created", &chrono::Utc::now().to_rfc3339())?;
        info!(path = %path.display(), label, "Created dashboard database");

        Ok(Storage {
            conn,
            start_time: Instant::now(),
            base_ms: 0,
            checkpoint_id: 0,
            pending: HashMap::new(),
        })
    }

    /// Reopen an existing database to append checkpoints
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatasetNotFound(path.display().to_string()));
        }
        let conn = Connection::open(path)?;
        configure(&conn)?;

        let version = schema::get_meta(&conn, "version").map_err(|_| {
            Error::invalid_data(path.display().to_string(), "not a perfdash database")
        })?;
        if version.as_deref() != Some(SCHEMA_VERSION.to_string().as_str()) {
            return Err(Error::invalid_data(
                path.display().to_string(),
                format!("unsupported schema version {}", version.unwrap_or_default()),
            ));
        }

        let base_ms: i64 = conn.query_row(
            "SELECT COALESCE(MAX(timestamp_ms), 0) FROM checkpoints",
            [],
            |row| row.get(0),
        )?;
        let checkpoint_id: i64 = conn
            .query_row("SELECT MAX(id) FROM checkpoints", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten()
            .unwrap_or(0);
        debug!(path = %path.display(), base_ms, checkpoint_id, "Reopened dashboard database");

        Ok(Storage {
            conn,
            start_time: Instant::now(),
            base_ms,
            checkpoint_id,
            pending: HashMap::new(),
        })
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        schema::set_meta(&self.conn, key, value)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replace the analytics records
    pub fn write_records(&mut self, records: &[DataRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO records (id, position, timestamp, source, category, value, status, correlation)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, r) in records.iter().enumerate() {
                stmt.execute(params![
                    r.id,
                    position as i64,
                    r.timestamp,
                    r.source.as_str(),
                    r.category.as_str(),
                    r.value,
                    r.status.as_str(),
                    r.correlation,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = records.len(), "Wrote records");
        Ok(())
    }

    /// Replace the component table
    pub fn write_components(&mut self, components: &[ComponentMetric]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM component_samples", [])?;
        tx.execute("DELETE FROM checkpoints", [])?;
        tx.execute("DELETE FROM components", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO components (id, position, name, render_time, memory_usage,
                     re_render_count, hook_count, children_count, last_update, status)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (position, c) in components.iter().enumerate() {
                stmt.execute(params![
                    c.id,
                    position as i64,
                    c.name,
                    c.render_time,
                    c.memory_usage,
                    c.re_render_count,
                    c.hook_count,
                    c.children_count,
                    c.last_update,
                    c.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        self.checkpoint_id = 0;
        self.base_ms = 0;
        debug!(count = components.len(), "Wrote components");
        Ok(())
    }

    /// Remember the current component metrics for the next checkpoint.
    /// Later snapshots of the same component replace earlier ones.
    pub fn record_component_snapshot(&mut self, components: &[ComponentMetric]) {
        for c in components {
            self.pending.insert(c.id.clone(), c.clone());
        }
    }

    /// Write pending snapshots as a new checkpoint. Returns false when there
    /// was nothing to write.
    pub fn flush_checkpoint(&mut self) -> Result<bool> {
        if self.pending.is_empty() {
            return Ok(false);
        }

        let tx = self.conn.transaction()?;

        let timestamp_ms = self.base_ms + self.start_time.elapsed().as_millis() as i64;
        tx.execute(
            "INSERT INTO checkpoints (timestamp_ms) VALUES (?)",
            [timestamp_ms],
        )?;
        self.checkpoint_id = tx.last_insert_rowid();

        {
            let mut sample = tx.prepare_cached(
                "INSERT INTO component_samples
                     (checkpoint_id, component_id, render_time, memory_usage, re_render_count, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            let mut latest = tx.prepare_cached(
                "UPDATE components
                 SET render_time = ?, memory_usage = ?, re_render_count = ?, last_update = ?, status = ?
                 WHERE id = ?",
            )?;

            for (id, c) in self.pending.drain() {
                sample.execute(params![
                    self.checkpoint_id,
                    id,
                    c.render_time,
                    c.memory_usage,
                    c.re_render_count,
                    c.status.as_str(),
                ])?;
                latest.execute(params![
                    c.render_time,
                    c.memory_usage,
                    c.re_render_count,
                    c.last_update,
                    c.status.as_str(),
                    id,
                ])?;
            }
        }

        tx.commit()?;
        debug!(checkpoint = self.checkpoint_id, timestamp_ms, "Flushed checkpoint");
        Ok(true)
    }

    pub fn checkpoint_count(&self) -> Result<u64> {
        super::reader::checkpoint_count(&self.conn)
    }
}

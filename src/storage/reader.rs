use super::schema::{self, SCHEMA_VERSION};
use crate::dataset::DashboardData;
use crate::error::{Error, Result};
use crate::model::{ComponentMetric, DataRecord};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Metadata stored alongside a dataset
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetMeta {
    pub version: i32,
    pub label: String,
    pub created: String,
    pub seed: Option<u64>,
}

/// Open an existing database. Never creates a new file.
pub fn open(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(Error::DatasetNotFound(path.display().to_string()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

pub fn load_meta(conn: &Connection) -> Result<DatasetMeta> {
    let version = schema::get_meta(conn, "version")?
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| Error::invalid_data("meta", "missing schema version"))?;
    if version != SCHEMA_VERSION {
        return Err(Error::invalid_data(
            "meta",
            format!("unsupported schema version {version}"),
        ));
    }
    Ok(DatasetMeta {
        version,
        label: schema::get_meta(conn, "label")?.unwrap_or_else(|| "unknown".to_string()),
        created: schema::get_meta(conn, "created")?.unwrap_or_else(|| "unknown".to_string()),
        seed: schema::get_meta(conn, "seed")?.and_then(|s| s.parse().ok()),
    })
}

struct RawRecord {
    id: String,
    timestamp: String,
    source: String,
    category: String,
    value: f64,
    status: String,
    correlation: f64,
}

impl RawRecord {
    fn parse(self) -> Result<DataRecord> {
        let context = format!("record {}", self.id);
        Ok(DataRecord {
            source: self.source.parse().map_err(|e| Error::invalid_data(&context, e))?,
            category: self.category.parse().map_err(|e| Error::invalid_data(&context, e))?,
            status: self.status.parse().map_err(|e| Error::invalid_data(&context, e))?,
            id: self.id,
            timestamp: self.timestamp,
            value: self.value,
            correlation: self.correlation,
        })
    }
}

pub fn load_records(conn: &Connection) -> Result<Vec<DataRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, source, category, value, status, correlation
         FROM records ORDER BY position ASC",
    )?;
    let raw = stmt
        .query_map([], |row| {
            Ok(RawRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                source: row.get(2)?,
                category: row.get(3)?,
                value: row.get(4)?,
                status: row.get(5)?,
                correlation: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raw.into_iter().map(RawRecord::parse).collect()
}

pub fn load_components(conn: &Connection) -> Result<Vec<ComponentMetric>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, render_time, memory_usage, re_render_count, hook_count,
                children_count, last_update, status
         FROM components ORDER BY position ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let status: String = row.get(8)?;
            Ok((
                ComponentMetric {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    render_time: row.get(2)?,
                    memory_usage: row.get(3)?,
                    re_render_count: row.get(4)?,
                    hook_count: row.get(5)?,
                    children_count: row.get(6)?,
                    last_update: row.get(7)?,
                    status: crate::model::ComponentStatus::Optimal,
                },
                status,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(mut component, status)| {
            component.status = status
                .parse()
                .map_err(|e| Error::invalid_data(format!("component {}", component.id), e))?;
            Ok(component)
        })
        .collect()
}

/// Records and components of a stored dataset
pub fn load_dashboard(path: &Path) -> Result<DashboardData> {
    let conn = open(path)?;
    let meta = load_meta(&conn)?;
    Ok(DashboardData {
        label: meta.label,
        records: load_records(&conn)?,
        components: load_components(&conn)?,
    })
}

/// (seconds since first checkpoint, render time) for one component
pub fn query_render_timeseries(conn: &Connection, component_id: &str) -> Result<Vec<(f64, f64)>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT c.timestamp_ms, s.render_time
        FROM checkpoints c
        JOIN component_samples s ON s.checkpoint_id = c.id AND s.component_id = ?1
        ORDER BY c.timestamp_ms ASC, c.id ASC
        "#,
    )?;
    let rows = stmt
        .query_map([component_id], |row| {
            let ts_ms: i64 = row.get(0)?;
            let render_time: f64 = row.get(1)?;
            Ok((ts_ms as f64 / 1000.0, render_time))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn checkpoint_count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM checkpoints", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Span between the first and last checkpoint in seconds
pub fn monitored_secs(conn: &Connection) -> Result<f64> {
    let span_ms: i64 = conn.query_row(
        "SELECT COALESCE(MAX(timestamp_ms) - MIN(timestamp_ms), 0) FROM checkpoints",
        [],
        |row| row.get(0),
    )?;
    Ok(span_ms as f64 / 1000.0)
}

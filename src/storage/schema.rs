use rusqlite::{Connection, OptionalExtension, params};

pub const SCHEMA_VERSION: i32 = 1;

/// Create all tables, dropping any left over from an earlier dataset
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS component_samples;
        DROP TABLE IF EXISTS checkpoints;
        DROP TABLE IF EXISTS components;
        DROP TABLE IF EXISTS records;
        DROP TABLE IF EXISTS meta;

        CREATE TABLE meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Analytics rows; position keeps the source order
        CREATE TABLE records (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            value REAL NOT NULL,
            status TEXT NOT NULL,
            correlation REAL NOT NULL
        );

        -- Latest metrics per component
        CREATE TABLE components (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            render_time REAL NOT NULL,
            memory_usage REAL NOT NULL,
            re_render_count INTEGER NOT NULL,
            hook_count INTEGER NOT NULL,
            children_count INTEGER NOT NULL,
            last_update TEXT NOT NULL,
            status TEXT NOT NULL
        );

        -- One row per monitoring interval
        CREATE TABLE checkpoints (
            id INTEGER PRIMARY KEY,
            timestamp_ms INTEGER NOT NULL
        );

        CREATE TABLE component_samples (
            checkpoint_id INTEGER NOT NULL,
            component_id TEXT NOT NULL,
            render_time REAL NOT NULL,
            memory_usage REAL NOT NULL,
            re_render_count INTEGER NOT NULL,
            status TEXT NOT NULL,
            PRIMARY KEY (checkpoint_id, component_id),
            FOREIGN KEY (checkpoint_id) REFERENCES checkpoints(id),
            FOREIGN KEY (component_id) REFERENCES components(id)
        );

        CREATE INDEX idx_samples_component ON component_samples(component_id);
        "#,
    )
}

/// Upsert a metadata entry
pub fn set_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached("INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)")?;
    stmt.execute(params![key, value])?;
    Ok(())
}

pub fn get_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
}

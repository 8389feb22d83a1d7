use crate::error::Result;
use crate::storage::reader;
use rusqlite::types::Value;
use std::path::Path;

/// Execute raw SQL and print tab-separated rows with a header line
pub fn run(file: &Path, sql: &str) -> Result<()> {
    let conn = reader::open(file)?;
    let mut out = std::io::stdout().lock();
    write_query(&conn, sql, &mut out)
}

pub fn write_query(conn: &rusqlite::Connection, sql: &str, out: &mut impl std::io::Write) -> Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let column_count = stmt.column_count();
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    writeln!(out, "{}", column_names.join("\t"))?;

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let values: Vec<String> = (0..column_count)
            .map(|i| {
                row.get::<_, Value>(i)
                    .map(|v| format_value(&v))
                    .unwrap_or_else(|_| "NULL".to_string())
            })
            .collect();
        writeln!(out, "{}", values.join("\t"))?;
    }

    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.replace(['\t', '\n'], " "),
        Value::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

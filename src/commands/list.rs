use crate::error::Result;
use crate::format::format_elapsed;
use crate::storage::reader;
use std::path::{Path, PathBuf};

pub const FILE_PREFIX: &str = "perfdash.";

/// Summary of one dashboard database
pub struct DatasetInfo {
    pub path: PathBuf,
    pub label: String,
    pub records: u64,
    pub components: u64,
    pub checkpoints: u64,
    pub monitored_secs: f64,
    pub created: String,
}

/// Find all perfdash databases in a directory, most recent first
pub fn find_datasets(dir: &Path) -> Result<Vec<DatasetInfo>> {
    let mut datasets = Vec::new();

    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "db")
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.starts_with(FILE_PREFIX)
        {
            match dataset_info(&path) {
                Ok(info) => datasets.push(info),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable database"),
            }
        }
    }

    datasets.sort_by(|a, b| b.created.cmp(&a.created));
    Ok(datasets)
}

pub fn most_recent_dataset(dir: &Path) -> Result<Option<PathBuf>> {
    let datasets = find_datasets(dir)?;
    Ok(datasets.into_iter().next().map(|d| d.path))
}

fn count(conn: &rusqlite::Connection, table: &str) -> Result<u64> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(n as u64)
}

fn dataset_info(path: &Path) -> Result<DatasetInfo> {
    let conn = reader::open(path)?;
    let meta = reader::load_meta(&conn)?;

    Ok(DatasetInfo {
        path: path.to_path_buf(),
        label: meta.label,
        records: count(&conn, "records")?,
        components: count(&conn, "components")?,
        checkpoints: reader::checkpoint_count(&conn)?,
        monitored_secs: reader::monitored_secs(&conn)?,
        created: meta.created,
    })
}

pub fn run(dir: Option<&Path>) -> Result<()> {
    let search_dir = dir.unwrap_or_else(|| Path::new("."));
    let datasets = find_datasets(search_dir)?;

    if datasets.is_empty() {
        println!("No perfdash databases found in {}", search_dir.display());
        return Ok(());
    }

    println!(
        "{:<44} {:>10} {:>8} {:>11} {:>12} {:>9}  {}",
        "FILE", "LABEL", "RECORDS", "COMPONENTS", "CHECKPOINTS", "MONITORED", "CREATED"
    );
    println!("{}", "-".repeat(124));

    for dataset in datasets {
        let filename = dataset
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        println!(
            "{:<44} {:>10} {:>8} {:>11} {:>12} {:>9}  {}",
            filename,
            dataset.label,
            dataset.records,
            dataset.components,
            dataset.checkpoints,
            format_elapsed(dataset.monitored_secs),
            dataset.created
        );
    }

    Ok(())
}

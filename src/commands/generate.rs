use crate::config::DashConfig;
use crate::dataset::DashboardData;
use crate::error::Result;
use crate::storage::Storage;
use std::path::{Path, PathBuf};
use tracing::info;

/// perfdash.<label>.<yymmddHHMMSS>.db
pub fn default_output_path(label: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%y%m%d%H%M%S");
    PathBuf::from(format!("{}{label}.{stamp}.db", super::list::FILE_PREFIX))
}

/// Write `data` to a fresh database at `path`
pub fn write_dataset(path: &Path, data: &DashboardData, seed: Option<u64>) -> Result<Storage> {
    let mut storage = Storage::create(path, &data.label)?;
    if let Some(seed) = seed {
        storage.set_meta("seed", &seed.to_string())?;
    }
    storage.write_records(&data.records)?;
    storage.write_components(&data.components)?;
    Ok(storage)
}

pub fn run(
    output: Option<PathBuf>,
    records: Option<usize>,
    seed: Option<u64>,
    config: &DashConfig,
) -> Result<PathBuf> {
    let count = records.unwrap_or(config.generator.records);
    let seed = seed.unwrap_or(config.generator.seed);

    let data = DashboardData::generated(seed, count);
    let path = output.unwrap_or_else(|| default_output_path(&data.label));
    write_dataset(&path, &data, Some(seed))?;

    info!(path = %path.display(), records = count, seed, "Generated dataset");
    println!(
        "Wrote {} records and {} components to {}",
        data.records.len(),
        data.components.len(),
        path.display()
    );
    Ok(path)
}

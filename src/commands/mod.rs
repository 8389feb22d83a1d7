pub mod generate;
pub mod list;
pub mod monitor;
pub mod query;
pub mod table;
pub mod view;

use crate::config::DashConfig;
use crate::dataset::DashboardData;
use crate::error::Result;
use crate::storage::load_dashboard;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where a command's data came from
#[derive(Clone, Debug, PartialEq)]
pub enum DataOrigin {
    File(PathBuf),
    Generated { seed: u64 },
}

/// Load `file`, else the most recent database in the current directory,
/// else generated data from the configured seed.
pub fn resolve_dataset(file: Option<&Path>, config: &DashConfig) -> Result<(DashboardData, DataOrigin)> {
    resolve_dataset_in(file, Path::new("."), config)
}

pub fn resolve_dataset_in(
    file: Option<&Path>,
    dir: &Path,
    config: &DashConfig,
) -> Result<(DashboardData, DataOrigin)> {
    let path = match file {
        Some(f) => Some(f.to_path_buf()),
        None => list::most_recent_dataset(dir)?,
    };
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading dataset");
            Ok((load_dashboard(&path)?, DataOrigin::File(path)))
        }
        None => {
            let seed = config.generator.seed;
            info!(seed, records = config.generator.records, "No database found, generating data");
            Ok((
                DashboardData::generated(seed, config.generator.records),
                DataOrigin::Generated { seed },
            ))
        }
    }
}

use super::{DataOrigin, resolve_dataset};
use crate::config::DashConfig;
use crate::error::Result;
use std::path::Path;
use tracing::info;

/// Open the dashboard on `file`, the most recent database, or generated data
pub fn run(file: Option<&Path>, live: bool, config: &DashConfig) -> Result<()> {
    let (data, origin) = resolve_dataset(file, config)?;
    match &origin {
        DataOrigin::File(path) => info!(path = %path.display(), live, "Opening dashboard"),
        DataOrigin::Generated { seed } => info!(seed, live, "Opening dashboard on generated data"),
    }
    crate::tui::run(data, config, live)
}

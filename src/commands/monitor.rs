use crate::config::DashConfig;
use crate::dataset::DashboardData;
use crate::error::{Error, Result};
use crate::model::ComponentMetric;
use crate::perf::{LiveSimulator, StressRate};
use crate::storage::{Storage, reader};
use crate::table::Dataset;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Totals reported when monitoring stops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub ticks: u64,
    pub operations: u64,
    pub checkpoints: u64,
    pub escalations: u64,
}

/// Open `file` for appending, or create a new database seeded from the
/// configured generator
fn prepare_storage(
    file: Option<PathBuf>,
    config: &DashConfig,
) -> Result<(PathBuf, Storage, Vec<ComponentMetric>)> {
    if let Some(path) = file.as_deref()
        && path.is_file()
    {
        let conn = reader::open(path)?;
        let components = reader::load_components(&conn)?;
        let storage = Storage::open(path)?;
        return Ok((path.to_path_buf(), storage, components));
    }

    let data = DashboardData::generated(config.generator.seed, config.generator.records);
    let path = file.unwrap_or_else(|| super::generate::default_output_path("monitor"));
    let storage = super::generate::write_dataset(&path, &data, Some(config.generator.seed))?;
    Ok((path, storage, data.components))
}

pub fn run(
    file: Option<PathBuf>,
    interval: Duration,
    duration: Option<Duration>,
    rate: Option<u32>,
    config: &DashConfig,
) -> Result<()> {
    let rate = match rate {
        Some(r) => StressRate::new(r)?,
        None => config.live.stress_rate,
    };
    let (path, mut storage, components) = prepare_storage(file, config)?;
    if components.is_empty() {
        warn!(path = %path.display(), "Database has no components to monitor");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| Error::Terminal(format!("Failed to set Ctrl-C handler: {e}")))?;

    let mut dataset = Dataset::new(components);
    let mut simulator = LiveSimulator::new(
        StdRng::seed_from_u64(config.generator.seed),
        rate,
        config.live.tick,
    );

    eprintln!("Output: {}", path.display());
    eprintln!("Monitoring at {rate} (Ctrl-C to stop)...");
    let stats = monitor_loop(
        &mut storage,
        &mut dataset,
        &mut simulator,
        interval,
        duration,
        &running,
    )?;

    eprintln!(
        "Stopped after {} ticks: {} operations, {} checkpoints, {} status escalations",
        stats.ticks, stats.operations, stats.checkpoints, stats.escalations
    );
    Ok(())
}

/// Tick the simulator until `running` clears or `duration` elapses,
/// flushing a checkpoint every `interval`
pub fn monitor_loop<R: rand::Rng>(
    storage: &mut Storage,
    dataset: &mut Dataset<ComponentMetric>,
    simulator: &mut LiveSimulator<R>,
    interval: Duration,
    duration: Option<Duration>,
    running: &AtomicBool,
) -> Result<MonitorStats> {
    let start = Instant::now();
    let mut last_checkpoint = Instant::now();
    let mut stats = MonitorStats::default();

    while running.load(Ordering::SeqCst) {
        if let Some(max_duration) = duration
            && start.elapsed() >= max_duration
        {
            break;
        }

        std::thread::sleep(simulator.tick_interval());
        let summary = simulator.tick(dataset, chrono::Local::now().time());
        stats.ticks += 1;
        stats.operations += summary.operations as u64;
        stats.escalations += summary.escalated as u64;
        storage.record_component_snapshot(dataset.records());

        if last_checkpoint.elapsed() >= interval {
            if storage.flush_checkpoint()? {
                stats.checkpoints += 1;
            }
            last_checkpoint = Instant::now();
        }
    }

    if storage.flush_checkpoint()? {
        stats.checkpoints += 1;
    }
    info!(
        ticks = stats.ticks,
        checkpoints = stats.checkpoints,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Monitoring stopped"
    );
    Ok(stats)
}

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::NaiveTime;
use rand::Rng;
use tracing::debug;

use crate::model::{ComponentMetric, ComponentStatus};
use crate::table::Dataset;

use super::controls::StressRate;

/// Render-time samples kept per component
pub const HISTORY_LEN: usize = 12;
/// Upper bound on simulated operations applied in one tick
pub const MAX_OPS_PER_TICK: usize = 64;

const RENDER_TIME_FLOOR: f64 = 0.1;
const MEMORY_FLOOR: f64 = 0.1;

/// Outcome of one simulation tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSummary {
    pub operations: usize,
    pub escalated: usize,
}

/// Drives the component metrics with random load
pub struct LiveSimulator<R> {
    rng: R,
    rate: StressRate,
    tick: Duration,
    history: HashMap<String, VecDeque<f64>>,
    ticks: u64,
}

impl<R: Rng> LiveSimulator<R> {
    pub fn new(rng: R, rate: StressRate, tick: Duration) -> Self {
        LiveSimulator {
            rng,
            rate,
            tick,
            history: HashMap::new(),
            ticks: 0,
        }
    }

    pub fn set_rate(&mut self, rate: StressRate) {
        self.rate = rate;
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Operations applied per tick at the current rate
    pub fn operations_per_tick(&self) -> usize {
        let ops = (f64::from(self.rate.get()) * self.tick.as_secs_f64()).round() as usize;
        ops.clamp(1, MAX_OPS_PER_TICK)
    }

    /// Recent render times for a component, oldest first
    pub fn history(&self, id: &str) -> Option<&VecDeque<f64>> {
        self.history.get(id)
    }

    /// Apply one tick of simulated load. Every call changes the dataset
    /// generation, even when it holds no components.
    pub fn tick(&mut self, dataset: &mut Dataset<ComponentMetric>, now: NaiveTime) -> TickSummary {
        let operations = self.operations_per_tick();
        let stamp = now.format("%H:%M:%S").to_string();
        let rng = &mut self.rng;

        let escalated = dataset.update(|components| {
            if components.is_empty() {
                return 0;
            }
            let before: Vec<ComponentStatus> = components.iter().map(|c| c.status).collect();

            for c in components.iter_mut() {
                c.re_render_count -= c.re_render_count / 20;
            }
            for _ in 0..operations {
                let idx = rng.gen_range(0..components.len());
                apply_operation(rng, &mut components[idx], &stamp);
            }
            for c in components.iter_mut() {
                c.status = ComponentStatus::classify(c.render_time, c.re_render_count);
            }

            components
                .iter()
                .zip(before)
                .filter(|(c, prev)| severity(c.status) > severity(*prev))
                .count()
        });

        for c in dataset.records() {
            let samples = self.history.entry(c.id.clone()).or_default();
            if samples.len() == HISTORY_LEN {
                samples.pop_front();
            }
            samples.push_back(c.render_time);
        }
        self.ticks += 1;

        debug!(
            tick = self.ticks,
            operations,
            escalated,
            generation = dataset.generation(),
            "Simulation tick"
        );
        TickSummary {
            operations,
            escalated,
        }
    }
}

fn apply_operation<R: Rng + ?Sized>(rng: &mut R, c: &mut ComponentMetric, stamp: &str) {
    let drift = c.render_time * rng.gen_range(-0.08..0.08) + rng.gen_range(-0.4..0.4);
    c.render_time = round_tenth((c.render_time + drift).max(RENDER_TIME_FLOOR));
    c.memory_usage = round_tenth((c.memory_usage + rng.gen_range(-0.2..0.2)).max(MEMORY_FLOOR));
    c.re_render_count = c.re_render_count.saturating_add(1);
    c.last_update.clear();
    c.last_update.push_str(stamp);
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn severity(status: ComponentStatus) -> u8 {
    match status {
        ComponentStatus::Optimal => 0,
        ComponentStatus::Warning => 1,
        ComponentStatus::Critical => 2,
    }
}

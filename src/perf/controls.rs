use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RenderMode {
    #[default]
    Concurrent,
    Legacy,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Concurrent => "concurrent",
            RenderMode::Legacy => "legacy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RenderMode::Concurrent => "Non-blocking updates enabled",
            RenderMode::Legacy => "Synchronous rendering active",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RenderingEngine {
    #[default]
    Canvas,
    Svg,
}

impl RenderingEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderingEngine::Canvas => "canvas",
            RenderingEngine::Svg => "svg",
        }
    }
}

/// Simulated operations per second
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StressRate(u32);

impl StressRate {
    pub const CHOICES: [u32; 5] = [100, 500, 1_000, 5_000, 10_000];

    pub fn new(ops_per_sec: u32) -> Result<Self> {
        if Self::CHOICES.contains(&ops_per_sec) {
            Ok(StressRate(ops_per_sec))
        } else {
            Err(Error::InvalidArgument(format!(
                "stress rate must be one of 100, 500, 1000, 5000, 10000 ops/sec, got {ops_per_sec}"
            )))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Next choice, wrapping to the lowest
    pub fn next(self) -> Self {
        let idx = Self::CHOICES.iter().position(|r| *r == self.0).unwrap_or(0);
        StressRate(Self::CHOICES[(idx + 1) % Self::CHOICES.len()])
    }
}

impl Default for StressRate {
    fn default() -> Self {
        StressRate(1_000)
    }
}

impl TryFrom<u32> for StressRate {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        StressRate::new(value)
    }
}

impl From<StressRate> for u32 {
    fn from(rate: StressRate) -> u32 {
        rate.0
    }
}

impl fmt::Display for StressRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ops/sec", self.0)
    }
}

/// Render settings toggled from the components tab
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceControls {
    pub render_mode: RenderMode,
    pub virtual_scrolling: bool,
    pub engine: RenderingEngine,
    pub stress_rate: StressRate,
}

impl Default for PerformanceControls {
    fn default() -> Self {
        PerformanceControls {
            render_mode: RenderMode::Concurrent,
            virtual_scrolling: true,
            engine: RenderingEngine::Canvas,
            stress_rate: StressRate::default(),
        }
    }
}

impl PerformanceControls {
    pub fn with_rate(stress_rate: StressRate) -> Self {
        PerformanceControls {
            stress_rate,
            ..Self::default()
        }
    }

    pub fn toggle_render_mode(&mut self) {
        self.render_mode = match self.render_mode {
            RenderMode::Concurrent => RenderMode::Legacy,
            RenderMode::Legacy => RenderMode::Concurrent,
        };
        info!(mode = self.render_mode.as_str(), "Render mode changed");
    }

    pub fn toggle_virtual_scrolling(&mut self) {
        self.virtual_scrolling = !self.virtual_scrolling;
        info!(enabled = self.virtual_scrolling, "Virtual scrolling changed");
    }

    pub fn toggle_engine(&mut self) {
        self.engine = match self.engine {
            RenderingEngine::Canvas => RenderingEngine::Svg,
            RenderingEngine::Svg => RenderingEngine::Canvas,
        };
        info!(engine = self.engine.as_str(), "Rendering engine changed");
    }

    pub fn set_stress_rate(&mut self, rate: StressRate) {
        self.stress_rate = rate;
        info!(rate = rate.get(), "Stress test rate changed");
    }

    pub fn cycle_stress_rate(&mut self) {
        self.set_stress_rate(self.stress_rate.next());
    }
}

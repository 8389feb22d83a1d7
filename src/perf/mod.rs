//! Simulated performance monitoring: render controls and live load.

pub mod controls;
pub mod simulator;

pub use controls::{PerformanceControls, RenderMode, RenderingEngine, StressRate};
pub use simulator::{HISTORY_LEN, LiveSimulator, TickSummary};

pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod model;
pub mod perf;
pub mod storage;
pub mod table;
pub mod tui;
pub mod viz;

pub use error::{Error, Result};

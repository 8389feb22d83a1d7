//! Record types shown by the dashboard tables and sidebar.

pub mod analytics;
pub mod component;
pub mod filters;
pub mod insight;

pub use analytics::{Category, DataRecord, RecordField, RecordStatus, Source};
pub use component::{ComponentField, ComponentMetric, ComponentStatus};
pub use filters::{AdvancedFilters, DateRange};
pub use insight::{ErrorLog, Impact, InsightCategory, InsightTab, KeyMetric, LogLevel, Recommendation};

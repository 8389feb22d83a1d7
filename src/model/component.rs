use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::table::{PageSize, Record, SortDirection, TableConfig, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Optimal,
    Warning,
    Critical,
}

impl ComponentStatus {
    pub const ALL: [ComponentStatus; 3] = [
        ComponentStatus::Optimal,
        ComponentStatus::Warning,
        ComponentStatus::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Optimal => "optimal",
            ComponentStatus::Warning => "warning",
            ComponentStatus::Critical => "critical",
        }
    }

    /// Classify a live sample. Either threshold is enough to escalate.
    pub fn classify(render_time_ms: f64, re_render_count: u32) -> Self {
        if render_time_ms >= 28.0 || re_render_count >= 200 {
            ComponentStatus::Critical
        } else if render_time_ms >= 14.0 || re_render_count >= 40 {
            ComponentStatus::Warning
        } else {
            ComponentStatus::Optimal
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown component status '{s}'")))
    }
}

/// Render metrics for one UI component
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetric {
    pub id: String,
    pub name: String,
    /// Milliseconds
    pub render_time: f64,
    /// Megabytes
    pub memory_usage: f64,
    pub re_render_count: u32,
    pub hook_count: u32,
    pub children_count: u32,
    /// HH:MM:SS
    pub last_update: String,
    pub status: ComponentStatus,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ComponentField {
    Id,
    Name,
    RenderTime,
    MemoryUsage,
    ReRenderCount,
    HookCount,
    ChildrenCount,
    LastUpdate,
    Status,
}

impl ComponentField {
    /// Columns shown in the table, in order
    pub const COLUMNS: [ComponentField; 8] = [
        ComponentField::Name,
        ComponentField::RenderTime,
        ComponentField::MemoryUsage,
        ComponentField::ReRenderCount,
        ComponentField::HookCount,
        ComponentField::ChildrenCount,
        ComponentField::Status,
        ComponentField::LastUpdate,
    ];

    /// Columns the user can sort by
    pub const SORTABLE: [ComponentField; 4] = [
        ComponentField::Name,
        ComponentField::RenderTime,
        ComponentField::MemoryUsage,
        ComponentField::ReRenderCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ComponentField::Id => "id",
            ComponentField::Name => "name",
            ComponentField::RenderTime => "renderTime",
            ComponentField::MemoryUsage => "memoryUsage",
            ComponentField::ReRenderCount => "reRenderCount",
            ComponentField::HookCount => "hookCount",
            ComponentField::ChildrenCount => "childrenCount",
            ComponentField::LastUpdate => "lastUpdate",
            ComponentField::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComponentField::Id => "Id",
            ComponentField::Name => "Component",
            ComponentField::RenderTime => "Render Time",
            ComponentField::MemoryUsage => "Memory",
            ComponentField::ReRenderCount => "Re-renders",
            ComponentField::HookCount => "Hooks",
            ComponentField::ChildrenCount => "Children",
            ComponentField::LastUpdate => "Last Update",
            ComponentField::Status => "Status",
        }
    }

    pub fn is_sortable(self) -> bool {
        Self::SORTABLE.contains(&self)
    }
}

impl FromStr for ComponentField {
    type Err = Error;

    /// Accepts the camelCase name or a snake_case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_' && *c != '-').collect();
        ComponentMetric::FIELDS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown component field '{s}'")))
    }
}

impl Record for ComponentMetric {
    type Field = ComponentField;
    type Status = ComponentStatus;

    const FIELDS: &'static [ComponentField] = &[
        ComponentField::Id,
        ComponentField::Name,
        ComponentField::RenderTime,
        ComponentField::MemoryUsage,
        ComponentField::ReRenderCount,
        ComponentField::HookCount,
        ComponentField::ChildrenCount,
        ComponentField::LastUpdate,
        ComponentField::Status,
    ];

    fn value(&self, field: ComponentField) -> Option<Value<'_>> {
        Some(match field {
            ComponentField::Id => Value::Text(&self.id),
            ComponentField::Name => Value::Text(&self.name),
            ComponentField::RenderTime => Value::Number(self.render_time),
            ComponentField::MemoryUsage => Value::Number(self.memory_usage),
            ComponentField::ReRenderCount => Value::Number(f64::from(self.re_render_count)),
            ComponentField::HookCount => Value::Number(f64::from(self.hook_count)),
            ComponentField::ChildrenCount => Value::Number(f64::from(self.children_count)),
            ComponentField::LastUpdate => Value::Text(&self.last_update),
            ComponentField::Status => Value::Text(self.status.as_str()),
        })
    }

    fn status(&self) -> ComponentStatus {
        self.status
    }
}

impl TableConfig<ComponentField> {
    /// Component metrics: every row on one page, slowest first, new columns
    /// descending
    pub const fn components() -> Self {
        TableConfig {
            page_size: PageSize::Unbounded,
            initial_sort: (ComponentField::RenderTime, SortDirection::Descending),
            new_field_direction: SortDirection::Descending,
            status_filter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::component_metrics;
    use crate::table::{StatusFilter, ViewState, run};
    use pretty_assertions::assert_eq;

    fn names<'a>(rows: &[&'a ComponentMetric]) -> Vec<&'a str> {
        rows.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_default_view_is_slowest_first() {
        let components = component_metrics();
        let cfg = TableConfig::components();
        let state = ViewState::new(&cfg);
        let model = run(&components, &state, &cfg);
        assert_eq!(
            names(&model.rows),
            vec![
                "Dashboard",
                "ChartContainer",
                "DataTable",
                "MetricCard",
                "LoadingSpinner",
                "IconButton",
                "Tooltip",
                "Badge"
            ]
        );
        assert_eq!(model.total_pages, 1);
    }

    #[test]
    fn test_status_filter_and_name_sort() {
        let components = component_metrics();
        let cfg = TableConfig::components();
        let mut state = ViewState::new(&cfg);
        state.set_status(StatusFilter::Only(ComponentStatus::Warning));
        state.toggle_sort(ComponentField::Name, &cfg);
        assert_eq!(state.direction, SortDirection::Descending);
        let model = run(&components, &state, &cfg);
        assert_eq!(names(&model.rows), vec!["Tooltip", "MetricCard", "DataTable"]);
    }

    #[test]
    fn test_no_match_yields_empty_page() {
        let components = component_metrics();
        let cfg = TableConfig::components();
        let mut state = ViewState::new(&cfg);
        state.set_search("nothing-like-this");
        let model = run(&components, &state, &cfg);
        assert!(model.rows.is_empty());
        assert_eq!(model.total_pages, 1);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(ComponentStatus::classify(6.2, 34), ComponentStatus::Optimal);
        assert_eq!(ComponentStatus::classify(14.0, 0), ComponentStatus::Warning);
        assert_eq!(ComponentStatus::classify(8.7, 156), ComponentStatus::Warning);
        assert_eq!(ComponentStatus::classify(28.7, 23), ComponentStatus::Critical);
        assert_eq!(ComponentStatus::classify(14.5, 203), ComponentStatus::Critical);
    }

    #[test]
    fn test_field_parse_accepts_snake_case() {
        assert_eq!("render_time".parse::<ComponentField>().unwrap(), ComponentField::RenderTime);
        assert_eq!("reRenderCount".parse::<ComponentField>().unwrap(), ComponentField::ReRenderCount);
        assert_eq!("NAME".parse::<ComponentField>().unwrap(), ComponentField::Name);
        assert!("fps".parse::<ComponentField>().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&component_metrics()[0]).unwrap();
        assert!(json.contains("\"renderTime\":24.3"));
        assert!(json.contains("\"status\":\"warning\""));
    }
}

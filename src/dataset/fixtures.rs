//! Built-in component metrics and code insights.

use crate::model::{
    ComponentMetric, ComponentStatus, ErrorLog, Impact, InsightCategory, KeyMetric, LogLevel,
    Recommendation,
};

pub const INSIGHT_SUMMARY: &str = "Your app is performing well with 60fps maintained. \
Consider memoizing frequently updating components.";

#[allow(clippy::too_many_arguments)]
fn component(
    id: u32,
    name: &str,
    render_time: f64,
    memory_usage: f64,
    re_render_count: u32,
    hook_count: u32,
    children_count: u32,
    last_update: &str,
    status: ComponentStatus,
) -> ComponentMetric {
    ComponentMetric {
        id: id.to_string(),
        name: name.to_string(),
        render_time,
        memory_usage,
        re_render_count,
        hook_count,
        children_count,
        last_update: last_update.to_string(),
        status,
    }
}

pub fn component_metrics() -> Vec<ComponentMetric> {
    use ComponentStatus::*;
    vec![
        component(1, "DataTable", 24.3, 8.7, 45, 12, 156, "15:22:01", Warning),
        component(2, "ChartContainer", 28.7, 12.4, 23, 8, 4, "15:22:00", Critical),
        component(3, "MetricCard", 18.9, 3.2, 67, 5, 2, "15:21:59", Warning),
        component(4, "Dashboard", 32.1, 15.6, 12, 15, 8, "15:21:58", Optimal),
        component(5, "IconButton", 12.4, 1.8, 89, 3, 1, "15:21:57", Optimal),
        component(6, "Tooltip", 8.7, 2.1, 156, 4, 0, "15:21:56", Warning),
        component(7, "Badge", 6.2, 0.9, 34, 1, 0, "15:21:55", Optimal),
        component(8, "LoadingSpinner", 14.5, 2.7, 203, 2, 0, "15:21:54", Critical),
    ]
}

fn recommendation(
    id: u32,
    title: &str,
    description: &str,
    impact: Impact,
    category: InsightCategory,
    code: Option<&str>,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        impact,
        category,
        code: code.map(str::to_string),
    }
}

pub fn recommendations() -> Vec<Recommendation> {
    vec![
        recommendation(
            1,
            "Memoize Expensive Calculations",
            "Cache heavy computations in the DataTable component",
            Impact::High,
            InsightCategory::Performance,
            Some("let processed = cache.render(&dataset, &state, &config);"),
        ),
        recommendation(
            2,
            "Implement Virtual Scrolling",
            "Large lists causing performance bottlenecks",
            Impact::High,
            InsightCategory::Rendering,
            None,
        ),
        recommendation(
            3,
            "Code Splitting Opportunity",
            "Chart components can be lazy loaded",
            Impact::Medium,
            InsightCategory::Bundle,
            None,
        ),
        recommendation(
            4,
            "Memory Leak Prevention",
            "Release event listeners when a view is torn down",
            Impact::Medium,
            InsightCategory::Memory,
            None,
        ),
    ]
}

pub fn error_logs() -> Vec<ErrorLog> {
    vec![
        ErrorLog {
            id: "1".to_string(),
            timestamp: "15:22:01".to_string(),
            level: LogLevel::Error,
            message: "Cannot read property \"map\" of undefined".to_string(),
            component: "DataTable".to_string(),
            stack_trace: Some(
                "at DataTable.render (DataTable.tsx:45)\nat performWork (react-dom.js:123)"
                    .to_string(),
            ),
        },
        ErrorLog {
            id: "2".to_string(),
            timestamp: "15:21:45".to_string(),
            level: LogLevel::Warning,
            message: "Component re-rendered 15 times in 1 second".to_string(),
            component: "MetricCard".to_string(),
            stack_trace: None,
        },
        ErrorLog {
            id: "3".to_string(),
            timestamp: "15:21:30".to_string(),
            level: LogLevel::Info,
            message: "Performance mark: chart-render-start".to_string(),
            component: "ChartContainer".to_string(),
            stack_trace: None,
        },
        ErrorLog {
            id: "4".to_string(),
            timestamp: "15:21:15".to_string(),
            level: LogLevel::Warning,
            message: "Memory usage exceeded 50MB threshold".to_string(),
            component: "App".to_string(),
            stack_trace: None,
        },
    ]
}

pub fn key_metrics() -> Vec<KeyMetric> {
    [
        ("Bundle Size", "2.4 MB"),
        ("Components", "127 active"),
        ("Hooks", "89 instances"),
    ]
    .into_iter()
    .map(|(label, value)| KeyMetric {
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

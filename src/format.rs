//! Display formatting shared by the CLI tables and the terminal UI.

use crate::model::{ComponentField, ComponentMetric, DataRecord, RecordField};

/// Insert `,` every three digits of the integer part
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "1,234.56"
pub fn format_value(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (int, frac) = text.split_once('.').unwrap_or((&text, "00"));
    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac}", group_thousands(int))
}

pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Correlation with explicit sign, e.g. "+0.532"
pub fn format_correlation(c: f64) -> String {
    format!("{c:+.3}")
}

pub fn format_ms(ms: f64) -> String {
    format!("{ms:.1}ms")
}

pub fn format_mb(mb: f64) -> String {
    format!("{mb:.1}MB")
}

/// Elapsed time in the largest fitting units, e.g. "1h5m", "3m", "42s"
pub fn format_elapsed(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    match (h, m, s) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m{s}s"),
        (h, 0, _) => format!("{h}h"),
        (h, m, _) => format!("{h}h{m}m"),
    }
}

/// Display text for one analytics cell
pub fn record_cell(record: &DataRecord, field: RecordField) -> String {
    match field {
        RecordField::Id => record.id.clone(),
        RecordField::Timestamp => record.timestamp.replace('T', " ").trim_end_matches('Z').to_string(),
        RecordField::Source => record.source.to_string(),
        RecordField::Category => record.category.to_string(),
        RecordField::Value => format_value(record.value),
        RecordField::Status => record.status.to_string(),
        RecordField::Correlation => format_correlation(record.correlation),
    }
}

/// Display text for one component cell
pub fn component_cell(component: &ComponentMetric, field: ComponentField) -> String {
    match field {
        ComponentField::Id => component.id.clone(),
        ComponentField::Name => component.name.clone(),
        ComponentField::RenderTime => format_ms(component.render_time),
        ComponentField::MemoryUsage => format_mb(component.memory_usage),
        ComponentField::ReRenderCount => format_count(u64::from(component.re_render_count)),
        ComponentField::HookCount => component.hook_count.to_string(),
        ComponentField::ChildrenCount => component.children_count.to_string(),
        ComponentField::LastUpdate => component.last_update.clone(),
        ComponentField::Status => component.status.to_string(),
    }
}

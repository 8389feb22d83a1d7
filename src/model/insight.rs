use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Performance,
    Memory,
    Bundle,
    Rendering,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub category: InsightCategory,
    pub code: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorLog {
    pub id: String,
    /// HH:MM:SS
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub component: String,
    pub stack_trace: Option<String>,
}

/// Headline numbers shown on the overview tab
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyMetric {
    pub label: String,
    pub value: String,
}

/// Which pane of the code-insights sidebar is visible
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InsightTab {
    #[default]
    Insights,
    Recommendations,
    Errors,
}

impl InsightTab {
    pub fn next(self) -> Self {
        match self {
            InsightTab::Insights => InsightTab::Recommendations,
            InsightTab::Recommendations => InsightTab::Errors,
            InsightTab::Errors => InsightTab::Insights,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightTab::Insights => "Insights",
            InsightTab::Recommendations => "Recommendations",
            InsightTab::Errors => "Errors",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        let tab = InsightTab::default();
        assert_eq!(tab.next(), InsightTab::Recommendations);
        assert_eq!(tab.next().next().next(), InsightTab::Insights);
    }
}

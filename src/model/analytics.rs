use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::table::{PageSize, Record, SortDirection, TableConfig, Value};

/// Where an analytics record was collected
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Api,
    Database,
    Frontend,
    Mobile,
}

impl Source {
    pub const ALL: [Source; 4] = [Source::Api, Source::Database, Source::Frontend, Source::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::Api => "api",
            Source::Database => "database",
            Source::Frontend => "frontend",
            Source::Mobile => "mobile",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Performance,
    UserBehavior,
    Revenue,
    Engagement,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::UserBehavior,
        Category::Revenue,
        Category::Engagement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Performance => "performance",
            Category::UserBehavior => "user-behavior",
            Category::Revenue => "revenue",
            Category::Engagement => "engagement",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Active,
    Warning,
    Error,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 3] = [
        RecordStatus::Active,
        RecordStatus::Warning,
        RecordStatus::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Warning => "Warning",
            RecordStatus::Error => "Error",
        }
    }
}

macro_rules! label_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| Error::InvalidArgument(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

label_enum!(Source, "source");
label_enum!(Category, "category");
label_enum!(RecordStatus, "status");

/// One row of the analytics table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub id: String,
    /// ISO-8601, UTC
    pub timestamp: String,
    pub source: Source,
    pub category: Category,
    pub value: f64,
    pub status: RecordStatus,
    pub correlation: f64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordField {
    Id,
    Timestamp,
    Source,
    Category,
    Value,
    Status,
    Correlation,
}

impl RecordField {
    /// Columns shown in the table, in order. The id is searchable but hidden.
    pub const COLUMNS: [RecordField; 6] = [
        RecordField::Timestamp,
        RecordField::Source,
        RecordField::Category,
        RecordField::Value,
        RecordField::Status,
        RecordField::Correlation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecordField::Id => "id",
            RecordField::Timestamp => "timestamp",
            RecordField::Source => "source",
            RecordField::Category => "category",
            RecordField::Value => "value",
            RecordField::Status => "status",
            RecordField::Correlation => "correlation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordField::Id => "Id",
            RecordField::Timestamp => "Timestamp",
            RecordField::Source => "Source",
            RecordField::Category => "Category",
            RecordField::Value => "Value",
            RecordField::Status => "Status",
            RecordField::Correlation => "Correlation",
        }
    }
}

impl FromStr for RecordField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataRecord::FIELDS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown record field '{s}' (expected one of: id, timestamp, source, category, value, status, correlation)"
                ))
            })
    }
}

impl Record for DataRecord {
    type Field = RecordField;
    type Status = RecordStatus;

    const FIELDS: &'static [RecordField] = &[
        RecordField::Id,
        RecordField::Timestamp,
        RecordField::Source,
        RecordField::Category,
        RecordField::Value,
        RecordField::Status,
        RecordField::Correlation,
    ];

    fn value(&self, field: RecordField) -> Option<Value<'_>> {
        Some(match field {
            RecordField::Id => Value::Text(&self.id),
            RecordField::Timestamp => Value::Text(&self.timestamp),
            RecordField::Source => Value::Text(self.source.as_str()),
            RecordField::Category => Value::Text(self.category.as_str()),
            RecordField::Value => Value::Number(self.value),
            RecordField::Status => Value::Text(self.status.as_str()),
            RecordField::Correlation => Value::Number(self.correlation),
        })
    }

    fn status(&self) -> RecordStatus {
        self.status
    }
}

impl TableConfig<RecordField> {
    /// Analytics table: 50 rows per page, newest first, new columns ascending
    pub const fn records() -> Self {
        TableConfig {
            page_size: PageSize::fixed(50),
            initial_sort: (RecordField::Timestamp, SortDirection::Descending),
            new_field_direction: SortDirection::Ascending,
            status_filter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{StatusFilter, ViewState, run};

    fn record(id: &str, status: RecordStatus) -> DataRecord {
        DataRecord {
            id: id.to_string(),
            timestamp: "2024-03-01T10:00:00Z".to_string(),
            source: Source::Api,
            category: Category::UserBehavior,
            value: 1234.5,
            status,
            correlation: -0.25,
        }
    }

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("API".parse::<Source>().unwrap(), Source::Api);
        assert_eq!("User-Behavior".parse::<Category>().unwrap(), Category::UserBehavior);
        assert_eq!("warning".parse::<RecordStatus>().unwrap(), RecordStatus::Warning);
        assert!("sideways".parse::<RecordStatus>().is_err());
        assert_eq!("Correlation".parse::<RecordField>().unwrap(), RecordField::Correlation);
    }

    #[test]
    fn test_search_matches_mixed_case_status() {
        let records = vec![record("rec-0001", RecordStatus::Warning), record("rec-0002", RecordStatus::Active)];
        let cfg = TableConfig::records();
        let mut state = ViewState::new(&cfg);
        state.set_search("warn");
        let model = run(&records, &state, &cfg);
        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.rows[0].id, "rec-0001");
    }

    #[test]
    fn test_search_covers_hidden_id_and_enum_labels() {
        let records = vec![record("rec-0042", RecordStatus::Active)];
        let cfg = TableConfig::records();
        let mut state = ViewState::new(&cfg);
        state.set_search("0042");
        assert_eq!(run(&records, &state, &cfg).total_count, 1);
        state.set_search("user-beh");
        assert_eq!(run(&records, &state, &cfg).total_count, 1);
        state.set_search("1234.5");
        assert_eq!(run(&records, &state, &cfg).total_count, 1);
    }

    #[test]
    fn test_records_config_defaults() {
        let cfg = TableConfig::records();
        let mut state: ViewState<RecordField, RecordStatus> = ViewState::new(&cfg);
        assert_eq!(state.sort_field, RecordField::Timestamp);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(state.status, StatusFilter::All);
        state.toggle_sort(RecordField::Value, &cfg);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_serializes_lowercase_labels() {
        let json = serde_json::to_string(&record("rec-0001", RecordStatus::Error)).unwrap();
        assert!(json.contains("\"source\":\"api\""));
        assert!(json.contains("\"category\":\"user-behavior\""));
        assert!(json.contains("\"status\":\"Error\""));
    }
}

//! Record filters applied ahead of the table pipeline.
//!
//! The defaults cover every day of 2024 and every source and category, so
//! an untouched filter set keeps all generated records.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use tracing::info;

use super::analytics::{Category, DataRecord, Source};
use crate::error::{Error, Result};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Parse a `YYYY-MM-DD` day
pub fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{s}' ({e}). Expected YYYY-MM-DD"))
}

/// Inclusive range of calendar days
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange {
            start: day(2024, 1, 1),
            end: day(2024, 12, 31),
        }
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Whether the day of an ISO-8601 timestamp lies in the range.
    /// Timestamps that do not begin with `YYYY-MM-DD` never match.
    pub fn contains(&self, timestamp: &str) -> bool {
        timestamp
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .is_some_and(|d| self.start <= d && d <= self.end)
    }

    /// Move the start by whole months. Ignored when it would pass the end.
    pub fn shift_start(&mut self, months: i32) {
        if let Some(start) = shift_months(self.start, months)
            && start <= self.end
        {
            self.start = start;
        }
    }

    /// Move the end by whole months. Ignored when it would pass the start.
    pub fn shift_end(&mut self, months: i32) {
        if let Some(end) = shift_months(self.end, months)
            && end >= self.start
        {
            self.end = end;
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let step = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    }
}

/// Date range, data source and category restrictions on analytics records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvancedFilters {
    pub date_range: DateRange,
    /// `None` keeps every source
    pub source: Option<Source>,
    /// `None` keeps every category
    pub category: Option<Category>,
}

impl AdvancedFilters {
    pub fn matches(&self, record: &DataRecord) -> bool {
        self.source.is_none_or(|s| record.source == s)
            && self.category.is_none_or(|c| record.category == c)
            && self.date_range.contains(&record.timestamp)
    }

    /// Matching records in their original order
    pub fn apply(&self, records: &[DataRecord]) -> Vec<DataRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    pub fn is_default(&self) -> bool {
        *self == AdvancedFilters::default()
    }

    pub fn reset(&mut self) {
        *self = AdvancedFilters::default();
        info!("Advanced filters reset");
    }

    /// All -> api -> database -> frontend -> mobile -> All
    pub fn cycle_source(&mut self) {
        self.source = cycle(&Source::ALL, self.source);
        info!(source = self.source_label(), "Source filter changed");
    }

    pub fn cycle_category(&mut self) {
        self.category = cycle(&Category::ALL, self.category);
        info!(category = self.category_label(), "Category filter changed");
    }

    pub fn source_label(&self) -> &'static str {
        self.source.map_or("all sources", Source::as_str)
    }

    pub fn category_label(&self) -> &'static str {
        self.category.map_or("all categories", Category::as_str)
    }
}

fn cycle<T: Copy + Eq>(all: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => all
            .iter()
            .position(|v| *v == value)
            .and_then(|i| all.get(i + 1))
            .copied(),
    }
}

/// "all" (any case) means no restriction, anything else must be a label
pub fn parse_choice<T: FromStr<Err = Error>>(s: &str) -> Result<Option<T>> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordStatus;
    use pretty_assertions::assert_eq;

    fn record(id: &str, timestamp: &str, source: Source, category: Category) -> DataRecord {
        DataRecord {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
            source,
            category,
            value: 1.0,
            status: RecordStatus::Active,
            correlation: 0.0,
        }
    }

    fn sample() -> Vec<DataRecord> {
        vec![
            record("a", "2024-01-01T00:00:00Z", Source::Api, Category::Revenue),
            record("b", "2024-06-15T12:30:00Z", Source::Mobile, Category::Revenue),
            record("c", "2024-12-31T23:59:59Z", Source::Api, Category::Engagement),
            record("d", "2025-01-01T00:00:00Z", Source::Api, Category::Revenue),
            record("e", "not a date", Source::Api, Category::Revenue),
        ]
    }

    fn ids(records: &[DataRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_all_of_2024() {
        let filters = AdvancedFilters::default();
        assert!(filters.is_default());
        assert_eq!(filters.date_range.to_string(), "2024-01-01..2024-12-31");
        assert_eq!(ids(&filters.apply(&sample())), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_source_and_category_combine() {
        let filters = AdvancedFilters {
            source: Some(Source::Api),
            category: Some(Category::Revenue),
            ..AdvancedFilters::default()
        };
        assert_eq!(ids(&filters.apply(&sample())), vec!["a"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(day(2024, 6, 15), day(2024, 6, 15)).unwrap();
        assert!(range.contains("2024-06-15T00:00:00Z"));
        assert!(range.contains("2024-06-15T23:59:59Z"));
        assert!(!range.contains("2024-06-14T23:59:59Z"));
        assert!(!range.contains("2024-06-16T00:00:00Z"));
        assert!(!range.contains("06/15/2024"));
        assert!(!range.contains(""));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = DateRange::new(day(2024, 5, 1), day(2024, 4, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_shifts_never_cross() {
        let mut range = DateRange::new(day(2024, 3, 1), day(2024, 4, 30)).unwrap();
        range.shift_start(1);
        assert_eq!(range.start, day(2024, 4, 1));
        range.shift_start(1);
        assert_eq!(range.start, day(2024, 4, 1));
        range.shift_end(-1);
        assert_eq!(range.end, day(2024, 4, 30));
        range.shift_end(2);
        assert_eq!(range.end, day(2024, 6, 30));
        range.shift_start(-4);
        assert_eq!(range.start, day(2023, 12, 1));
    }

    #[test]
    fn test_cycle_and_reset() {
        let mut filters = AdvancedFilters::default();
        filters.cycle_source();
        assert_eq!(filters.source, Some(Source::Api));
        for _ in 0..3 {
            filters.cycle_source();
        }
        assert_eq!(filters.source, Some(Source::Mobile));
        filters.cycle_source();
        assert_eq!(filters.source, None);

        filters.cycle_category();
        filters.date_range.shift_start(2);
        assert_eq!(filters.category_label(), "performance");
        assert!(!filters.is_default());
        filters.reset();
        assert!(filters.is_default());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice::<Source>("ALL").unwrap(), None);
        assert_eq!(parse_choice::<Source>("Mobile").unwrap(), Some(Source::Mobile));
        assert_eq!(
            parse_choice::<Category>("user-behavior").unwrap(),
            Some(Category::UserBehavior)
        );
        assert!(parse_choice::<Source>("web").is_err());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2024-02-29"), Ok(day(2024, 2, 29)));
        assert!(parse_day("2024-02-30").is_err());
    }
}

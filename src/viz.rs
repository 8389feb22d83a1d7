//! Chart series derived from the analytics records.

use std::str::FromStr;

use rand::Rng;

use crate::model::{Category, DataRecord};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.2;
pub const HEATMAP_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VisualizationKind {
    #[default]
    Bar,
    Scatter,
    Heatmap,
    Line,
}

impl VisualizationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VisualizationKind::Bar => "bar",
            VisualizationKind::Scatter => "scatter",
            VisualizationKind::Heatmap => "heatmap",
            VisualizationKind::Line => "line",
        }
    }

    pub fn next(self) -> Self {
        match self {
            VisualizationKind::Bar => VisualizationKind::Scatter,
            VisualizationKind::Scatter => VisualizationKind::Heatmap,
            VisualizationKind::Heatmap => VisualizationKind::Line,
            VisualizationKind::Line => VisualizationKind::Bar,
        }
    }
}

impl FromStr for VisualizationKind {
    type Err = std::convert::Infallible;

    /// Unrecognized names fall back to a bar chart
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "scatter" => VisualizationKind::Scatter,
            "heatmap" => VisualizationKind::Heatmap,
            "line" => VisualizationKind::Line,
            _ => VisualizationKind::Bar,
        })
    }
}

/// User-controlled chart parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartState {
    pub kind: VisualizationKind,
    /// `None` shows every category
    pub category: Option<Category>,
    pub zoom: f64,
}

impl Default for ChartState {
    fn default() -> Self {
        ChartState {
            kind: VisualizationKind::Bar,
            category: None,
            zoom: 1.0,
        }
    }
}

impl ChartState {
    pub fn zoom_in(&mut self) {
        self.zoom = round_tenth((self.zoom + ZOOM_STEP).min(ZOOM_MAX));
    }

    pub fn zoom_out(&mut self) {
        self.zoom = round_tenth((self.zoom - ZOOM_STEP).max(ZOOM_MIN));
    }

    /// All -> first category -> ... -> last category -> All
    pub fn cycle_category(&mut self, categories: &[Category]) {
        self.category = match self.category {
            None => categories.first().copied(),
            Some(current) => categories
                .iter()
                .position(|c| *c == current)
                .and_then(|i| categories.get(i + 1))
                .copied(),
        };
    }

    pub fn category_label(&self) -> &'static str {
        self.category.map_or("all categories", Category::as_str)
    }
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Distinct categories in first-seen order
pub fn categories(records: &[DataRecord]) -> Vec<Category> {
    let mut seen = Vec::new();
    for r in records {
        if !seen.contains(&r.category) {
            seen.push(r.category);
        }
    }
    seen
}

pub fn select(records: &[DataRecord], category: Option<Category>) -> Vec<&DataRecord> {
    records
        .iter()
        .filter(|r| category.is_none_or(|c| r.category == c))
        .collect()
}

/// Per-category value sums, categories in first-seen order
pub fn bar_series(records: &[&DataRecord]) -> Vec<(Category, f64)> {
    let mut sums: Vec<(Category, f64)> = Vec::new();
    for r in records {
        match sums.iter_mut().find(|(c, _)| *c == r.category) {
            Some((_, sum)) => *sum += r.value,
            None => sums.push((r.category, r.value)),
        }
    }
    sums
}

/// (value, correlation) per record
pub fn scatter_points(records: &[&DataRecord]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.value, r.correlation)).collect()
}

/// (index, value) in timestamp order
pub fn line_series(records: &[&DataRecord]) -> Vec<(f64, f64)> {
    let mut ordered: Vec<&DataRecord> = records.to_vec();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    ordered
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, r.value))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatCell {
    pub x: usize,
    pub y: usize,
    pub value: f64,
    /// [0, 1)
    pub intensity: f64,
}

/// 10x10 grid, row-major. Each cell samples a record's value (or a random
/// value in [0, 100) when there are no records) plus a random intensity.
pub fn heatmap<R: Rng + ?Sized>(rng: &mut R, records: &[&DataRecord]) -> Vec<HeatCell> {
    let mut cells = Vec::with_capacity(HEATMAP_SIZE * HEATMAP_SIZE);
    for y in 0..HEATMAP_SIZE {
        for x in 0..HEATMAP_SIZE {
            let value = if records.is_empty() {
                rng.gen_range(0.0..100.0)
            } else {
                records[rng.gen_range(0..records.len())].value
            };
            cells.push(HeatCell {
                x,
                y,
                value,
                intensity: rng.gen_range(0.0..1.0),
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordStatus, Source};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(category: Category, value: f64, timestamp: &str) -> DataRecord {
        DataRecord {
            id: "rec".to_string(),
            timestamp: timestamp.to_string(),
            source: Source::Mobile,
            category,
            value,
            status: RecordStatus::Active,
            correlation: 0.5,
        }
    }

    fn sample() -> Vec<DataRecord> {
        vec![
            record(Category::Revenue, 10.0, "2024-03-01T00:00:00Z"),
            record(Category::Performance, 5.0, "2024-01-01T00:00:00Z"),
            record(Category::Revenue, 2.5, "2024-02-01T00:00:00Z"),
        ]
    }

    #[test]
    fn test_unknown_kind_is_bar() {
        assert_eq!("pie".parse::<VisualizationKind>(), Ok(VisualizationKind::Bar));
        assert_eq!("Heatmap".parse::<VisualizationKind>(), Ok(VisualizationKind::Heatmap));
    }

    #[test]
    fn test_categories_first_seen() {
        assert_eq!(categories(&sample()), vec![Category::Revenue, Category::Performance]);
    }

    #[test]
    fn test_bar_sums_per_category() {
        let records = sample();
        let all = select(&records, None);
        assert_eq!(
            bar_series(&all),
            vec![(Category::Revenue, 12.5), (Category::Performance, 5.0)]
        );
        let revenue = select(&records, Some(Category::Revenue));
        assert_eq!(revenue.len(), 2);
    }

    #[test]
    fn test_line_follows_timestamps() {
        let records = sample();
        let all = select(&records, None);
        assert_eq!(line_series(&all), vec![(0.0, 5.0), (1.0, 2.5), (2.0, 10.0)]);
    }

    #[test]
    fn test_heatmap_is_reproducible() {
        let records = sample();
        let all = select(&records, None);
        let a = heatmap(&mut StdRng::seed_from_u64(9), &all);
        let b = heatmap(&mut StdRng::seed_from_u64(9), &all);
        assert_eq!(a, b);
        assert_eq!(a.len(), 100);
        assert!(a.iter().all(|c| [10.0, 5.0, 2.5].contains(&c.value)));
        assert!(a.iter().all(|c| (0.0..1.0).contains(&c.intensity)));
        assert_eq!((a[11].x, a[11].y), (1, 1));
    }

    #[test]
    fn test_heatmap_without_records() {
        let cells = heatmap(&mut StdRng::seed_from_u64(1), &[]);
        assert!(cells.iter().all(|c| (0.0..100.0).contains(&c.value)));
    }

    #[test]
    fn test_zoom_bounds() {
        let mut chart = ChartState::default();
        for _ in 0..10 {
            chart.zoom_in();
        }
        assert_eq!(chart.zoom, ZOOM_MAX);
        for _ in 0..10 {
            chart.zoom_out();
        }
        assert_eq!(chart.zoom, ZOOM_MIN);
    }

    #[test]
    fn test_category_cycle() {
        let cats = [Category::Revenue, Category::Engagement];
        let mut chart = ChartState::default();
        chart.cycle_category(&cats);
        assert_eq!(chart.category, Some(Category::Revenue));
        chart.cycle_category(&cats);
        assert_eq!(chart.category, Some(Category::Engagement));
        chart.cycle_category(&cats);
        assert_eq!(chart.category, None);
    }
}

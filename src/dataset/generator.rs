use chrono::DateTime;
use rand::Rng;

use crate::model::{Category, DataRecord, RecordStatus, Source};

/// 2024-01-01T00:00:00Z
const YEAR_START: i64 = 1_704_067_200;
/// 2024 is a leap year
const YEAR_SECONDS: i64 = 366 * 86_400;

pub const VALUE_MAX: f64 = 10_000.0;

/// Generate `count` analytics records. Ids continue from `start`, so
/// `start = 0` yields `rec-0001`, `rec-0002`, ...
///
/// Output depends only on the state of `rng`.
pub fn generate_records<R: Rng + ?Sized>(rng: &mut R, count: usize, start: usize) -> Vec<DataRecord> {
    (start..start + count)
        .map(|n| generate_record(rng, n + 1))
        .collect()
}

fn generate_record<R: Rng + ?Sized>(rng: &mut R, number: usize) -> DataRecord {
    let offset = rng.gen_range(0..YEAR_SECONDS);
    let timestamp = DateTime::from_timestamp(YEAR_START + offset, 0)
        .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default();

    DataRecord {
        id: format!("rec-{number:04}"),
        timestamp,
        source: Source::ALL[rng.gen_range(0..Source::ALL.len())],
        category: Category::ALL[rng.gen_range(0..Category::ALL.len())],
        value: floor_to(rng.gen_range(0.0..VALUE_MAX), 2),
        status: RecordStatus::ALL[rng.gen_range(0..RecordStatus::ALL.len())],
        correlation: round_to(rng.gen_range(-1.0..=1.0), 3),
    }
}

fn scale(decimals: i32) -> f64 {
    10f64.powi(decimals)
}

// Adding 0.0 turns a rounded -0.0 into 0.0
fn round_to(x: f64, decimals: i32) -> f64 {
    (x * scale(decimals)).round() / scale(decimals) + 0.0
}

// Flooring keeps values strictly under their exclusive upper bound
fn floor_to(x: f64, decimals: i32) -> f64 {
    (x * scale(decimals)).floor() / scale(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_same_seed_same_records() {
        let a = generate_records(&mut StdRng::seed_from_u64(7), 25, 0);
        let b = generate_records(&mut StdRng::seed_from_u64(7), 25, 0);
        assert_eq!(a, b);
        let c = generate_records(&mut StdRng::seed_from_u64(8), 25, 0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ids_are_sequential() {
        let records = generate_records(&mut StdRng::seed_from_u64(1), 3, 0);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec-0001", "rec-0002", "rec-0003"]);

        let more = generate_records(&mut StdRng::seed_from_u64(1), 2, 3);
        assert_eq!(more[0].id, "rec-0004");
    }

    #[test]
    fn test_values_within_ranges() {
        let records = generate_records(&mut StdRng::seed_from_u64(42), 500, 0);
        for r in &records {
            assert!((0.0..VALUE_MAX).contains(&r.value), "value {}", r.value);
            assert!((-1.0..=1.0).contains(&r.correlation), "correlation {}", r.correlation);
            assert!(r.timestamp.starts_with("2024-"), "timestamp {}", r.timestamp);
            assert_eq!(r.timestamp.len(), "2024-01-01T00:00:00Z".len());
        }
    }

    #[test]
    fn test_rounding_never_yields_negative_zero() {
        let rounded = round_to(-0.0004, 3);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(generate_records(&mut StdRng::seed_from_u64(0), 0, 0).is_empty());
    }
}

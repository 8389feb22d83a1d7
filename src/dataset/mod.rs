//! Record sources: seeded generation and built-in fixtures.

pub mod fixtures;
pub mod generator;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::{ComponentMetric, DataRecord};

pub use generator::generate_records;

/// Everything one dashboard session displays
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardData {
    pub label: String,
    pub records: Vec<DataRecord>,
    pub components: Vec<ComponentMetric>,
}

impl DashboardData {
    /// Generated records plus the component fixture
    pub fn generated(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = generate_records(&mut rng, count, 0);
        tracing::debug!(seed, count, "Generated analytics records");
        DashboardData {
            label: format!("seed{seed}"),
            records,
            components: fixtures::component_metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_is_reproducible() {
        let a = DashboardData::generated(3, 40);
        assert_eq!(a, DashboardData::generated(3, 40));
        assert_eq!(a.records.len(), 40);
        assert_eq!(a.components.len(), 8);
        assert_eq!(a.label, "seed3");
    }
}

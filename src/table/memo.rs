//! Memoized pipeline evaluation.
//!
//! The processed ordering is cached as indices into the dataset and reused
//! until the dataset generation or one of the filter/search/sort inputs
//! changes. Page changes only re-slice the cached ordering.

use super::pipeline::{RenderModel, paginate, process};
use super::record::Record;
use super::view::{SortDirection, StatusFilter, TableConfig, ViewState};

/// Record collection with a generation counter bumped on every change
#[derive(Clone, Debug, Default)]
pub struct Dataset<R> {
    records: Vec<R>,
    generation: u64,
}

impl<R> Dataset<R> {
    pub fn new(records: Vec<R>) -> Self {
        Dataset {
            records,
            generation: 0,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
        self.generation += 1;
    }

    /// Mutate records in place. Always counts as a change.
    pub fn update<T>(&mut self, f: impl FnOnce(&mut [R]) -> T) -> T {
        let out = f(&mut self.records);
        self.generation += 1;
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
struct CacheKey<F, S> {
    generation: u64,
    status: Option<StatusFilter<S>>,
    search: String,
    sort_field: F,
    direction: SortDirection,
}

/// Cached ordering for one table view
#[derive(Debug)]
pub struct PipelineCache<F, S> {
    key: Option<CacheKey<F, S>>,
    order: Vec<usize>,
    recomputes: u64,
}

impl<F, S> Default for PipelineCache<F, S> {
    fn default() -> Self {
        PipelineCache {
            key: None,
            order: Vec::new(),
            recomputes: 0,
        }
    }
}

impl<F: Copy + Eq, S: Copy + Eq> PipelineCache<F, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the filter/search/sort stages have actually run
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Rows matching the current filters, ignoring pagination
    pub fn matched(&self) -> usize {
        self.order.len()
    }

    pub fn render<'a, R>(
        &mut self,
        dataset: &'a Dataset<R>,
        state: &ViewState<F, S>,
        config: &TableConfig<F>,
    ) -> RenderModel<&'a R, F>
    where
        R: Record<Field = F, Status = S>,
        F: std::fmt::Debug,
        S: std::fmt::Debug,
    {
        let key = CacheKey {
            generation: dataset.generation(),
            // A disabled filter never affects the result
            status: config.status_filter.then_some(state.status),
            search: state.search.clone(),
            sort_field: state.sort_field,
            direction: state.direction,
        };
        if self.key.as_ref() != Some(&key) {
            let rows: Vec<(usize, &R)> = dataset.records().iter().enumerate().collect();
            self.order = process(rows, state, config)
                .into_iter()
                .map(|(idx, _)| idx)
                .collect();
            self.key = Some(key);
            self.recomputes += 1;
            tracing::trace!(rows = self.order.len(), "Pipeline recomputed");
        }

        let records = dataset.records();
        let page = paginate(&self.order, state.page, config.page_size);
        RenderModel {
            rows: page.rows.iter().map(|&idx| &records[idx]).collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_count: page.total_count,
            sort_field: state.sort_field,
            direction: state.direction,
            page_size: config.page_size,
        }
    }
}

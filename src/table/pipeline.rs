//! Filter, search, sort and paginate stages for table views.
//!
//! Every stage takes rows by value and hands back the subset or ordering it
//! produces. Rows are references (or index-tagged references) into the
//! caller's collection, so no stage copies or mutates a record.

use super::record::{Record, RowRef, Value, compare_values};
use super::view::{PageSize, SortDirection, StatusFilter, TableConfig, ViewState};

type FieldOf<T> = <<T as RowRef>::Record as Record>::Field;
type StatusOf<T> = <<T as RowRef>::Record as Record>::Status;

/// Keep rows whose status matches. `All` hands the input back untouched.
pub fn filter<T: RowRef>(rows: Vec<T>, status: &StatusFilter<StatusOf<T>>) -> Vec<T> {
    match status {
        StatusFilter::All => rows,
        StatusFilter::Only(_) => rows
            .into_iter()
            .filter(|row| status.matches(row.record().status()))
            .collect(),
    }
}

/// Keep rows where any field, stringified, contains `term` ignoring case.
/// The term is plain text; nothing in it is treated as a pattern.
pub fn search<T: RowRef>(rows: Vec<T>, term: &str) -> Vec<T> {
    if term.is_empty() {
        return rows;
    }
    let needle = term.to_lowercase();
    rows.into_iter()
        .filter(|row| record_matches(row.record(), &needle))
        .collect()
}

fn record_matches<R: Record>(record: &R, needle: &str) -> bool {
    R::FIELDS.iter().any(|&field| {
        record
            .value(field)
            .is_some_and(|value| value_contains(value, needle))
    })
}

fn value_contains(value: Value<'_>, needle: &str) -> bool {
    value.to_text().to_lowercase().contains(needle)
}

/// Stable sort by one field. Descending inverts the comparison, so equal
/// rows keep their incoming order in both directions.
pub fn sort<T: RowRef>(rows: &mut [T], field: FieldOf<T>, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_values(a.record().value(field), b.record().value(field));
        if direction.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// One page of an already processed row list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page<'r, T> {
    pub rows: &'r [T],
    /// Requested page, 1-based
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> Page<'_, T> {
    /// 1-based index of the first row on this page, 0 when the page is empty
    pub fn first_row(&self, page_size: PageSize) -> usize {
        if self.rows.is_empty() {
            return 0;
        }
        page_offset(self.page, page_size) + 1
    }

    /// 1-based index of the last row on this page, 0 when the page is empty
    pub fn last_row(&self, page_size: PageSize) -> usize {
        if self.rows.is_empty() {
            return 0;
        }
        page_offset(self.page, page_size) + self.rows.len()
    }
}

fn page_offset(page: usize, page_size: PageSize) -> usize {
    match page_size {
        PageSize::Fixed(size) => page.saturating_sub(1).saturating_mul(size.get()),
        PageSize::Unbounded => 0,
    }
}

/// Slice out `page` (1-based). A page past the end is empty, not an error.
pub fn paginate<T>(rows: &[T], page: usize, page_size: PageSize) -> Page<'_, T> {
    let total_count = rows.len();
    let total_pages = page_size.total_pages(total_count);
    let slice = match page_size {
        PageSize::Unbounded if page <= 1 => rows,
        PageSize::Unbounded => &rows[..0],
        PageSize::Fixed(_) if page == 0 => &rows[..0],
        PageSize::Fixed(size) => {
            let start = page_offset(page, page_size).min(total_count);
            let end = start.saturating_add(size.get()).min(total_count);
            &rows[start..end]
        }
    };
    Page {
        rows: slice,
        page,
        total_pages,
        total_count,
    }
}

/// Everything a presentation layer needs to draw one table view
#[derive(Clone, Debug, PartialEq)]
pub struct RenderModel<T, F> {
    pub rows: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub sort_field: F,
    pub direction: SortDirection,
    pub page_size: PageSize,
}

impl<T, F> RenderModel<T, F> {
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            page_offset(self.page, self.page_size) + 1
        }
    }

    pub fn last_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            page_offset(self.page, self.page_size) + self.rows.len()
        }
    }

    /// "Showing 1 to 50 of 500 records"
    pub fn summary(&self, noun: &str) -> String {
        format!(
            "Showing {} to {} of {} {}",
            self.first_row(),
            self.last_row(),
            self.total_count,
            noun
        )
    }
}

/// Filter, search and sort `rows` according to the view state.
pub fn process<T: RowRef>(
    rows: Vec<T>,
    state: &ViewState<FieldOf<T>, StatusOf<T>>,
    config: &TableConfig<FieldOf<T>>,
) -> Vec<T> {
    let rows = if config.status_filter {
        filter(rows, &state.status)
    } else {
        rows
    };
    let mut rows = search(rows, &state.search);
    sort(&mut rows, state.sort_field, state.direction);
    rows
}

/// The whole pipeline as a pure function of records and view state.
pub fn run<'a, R: Record>(
    records: &'a [R],
    state: &ViewState<R::Field, R::Status>,
    config: &TableConfig<R::Field>,
) -> RenderModel<&'a R, R::Field> {
    let processed = process(records.iter().collect::<Vec<&R>>(), state, config);
    let page = paginate(&processed, state.page, config.page_size);
    RenderModel {
        rows: page.rows.to_vec(),
        page: page.page,
        total_pages: page.total_pages,
        total_count: page.total_count,
        sort_field: state.sort_field,
        direction: state.direction,
        page_size: config.page_size,
    }
}

use std::num::NonZeroUsize;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Status predicate applied before search. `All` passes everything through.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: Copy + Eq> StatusFilter<S> {
    pub fn matches(&self, status: S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Step through `All -> statuses[0] -> ... -> statuses[n-1] -> All`
    pub fn cycle(self, statuses: &[S]) -> Self {
        match self {
            StatusFilter::All => statuses
                .first()
                .map_or(StatusFilter::All, |s| StatusFilter::Only(*s)),
            StatusFilter::Only(current) => statuses
                .iter()
                .position(|s| *s == current)
                .and_then(|idx| statuses.get(idx + 1))
                .map_or(StatusFilter::All, |s| StatusFilter::Only(*s)),
        }
    }
}

/// Rows per page for a table instance
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageSize {
    Fixed(NonZeroUsize),
    Unbounded,
}

impl PageSize {
    pub const fn fixed(rows: usize) -> Self {
        match NonZeroUsize::new(rows) {
            Some(n) => PageSize::Fixed(n),
            None => PageSize::Unbounded,
        }
    }

    /// Number of pages needed for `count` rows, never less than one
    pub fn total_pages(self, count: usize) -> usize {
        match self {
            PageSize::Fixed(size) => count.div_ceil(size.get()).max(1),
            PageSize::Unbounded => 1,
        }
    }
}

/// Per-instance constants of a table view. These are not user-editable;
/// each table in the dashboard has its own.
#[derive(Clone, Copy, Debug)]
pub struct TableConfig<F> {
    pub page_size: PageSize,
    /// Sort applied when the view is first shown
    pub initial_sort: (F, SortDirection),
    /// Direction used when the user switches to a different column
    pub new_field_direction: SortDirection,
    /// When false the status filter is ignored
    pub status_filter: bool,
}

/// Transient view parameters for one table, owned by whoever displays it.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState<F, S> {
    pub sort_field: F,
    pub direction: SortDirection,
    pub search: String,
    pub status: StatusFilter<S>,
    /// 1-based
    pub page: usize,
}

impl<F: Copy + Eq, S: Copy + Eq> ViewState<F, S> {
    pub fn new(config: &TableConfig<F>) -> Self {
        ViewState {
            sort_field: config.initial_sort.0,
            direction: config.initial_sort.1,
            search: String::new(),
            status: StatusFilter::All,
            page: 1,
        }
    }

    /// Header click semantics: the active column flips direction, any other
    /// column becomes active with the instance's default direction.
    pub fn toggle_sort(&mut self, field: F, config: &TableConfig<F>) {
        if self.sort_field == field {
            self.direction = self.direction.flipped();
        } else {
            self.sort_field = field;
            self.direction = config.new_field_direction;
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn set_status(&mut self, status: StatusFilter<S>) {
        self.status = status;
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    /// Recover from a result set that shrank under the current page by
    /// returning to the first page. Returns true if the page changed.
    pub fn clamp_page(&mut self, total_pages: usize) -> bool {
        if self.page == 0 || self.page > total_pages.max(1) {
            self.page = 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Col {
        Name,
        Value,
    }

    fn config(new_field_direction: SortDirection) -> TableConfig<Col> {
        TableConfig {
            page_size: PageSize::fixed(10),
            initial_sort: (Col::Name, SortDirection::Descending),
            new_field_direction,
            status_filter: true,
        }
    }

    #[test]
    fn test_toggle_same_field_flips() {
        let cfg = config(SortDirection::Ascending);
        let mut state: ViewState<Col, u8> = ViewState::new(&cfg);
        assert_eq!(state.direction, SortDirection::Descending);
        state.toggle_sort(Col::Name, &cfg);
        assert_eq!(state.direction, SortDirection::Ascending);
        state.toggle_sort(Col::Name, &cfg);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn test_new_field_uses_instance_default() {
        let asc = config(SortDirection::Ascending);
        let mut state: ViewState<Col, u8> = ViewState::new(&asc);
        state.toggle_sort(Col::Value, &asc);
        assert_eq!(state.sort_field, Col::Value);
        assert_eq!(state.direction, SortDirection::Ascending);

        let desc = config(SortDirection::Descending);
        let mut state: ViewState<Col, u8> = ViewState::new(&desc);
        state.direction = SortDirection::Ascending;
        state.toggle_sort(Col::Value, &desc);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn test_total_pages_floor_is_one() {
        assert_eq!(PageSize::fixed(50).total_pages(0), 1);
        assert_eq!(PageSize::fixed(50).total_pages(50), 1);
        assert_eq!(PageSize::fixed(50).total_pages(51), 2);
        assert_eq!(PageSize::fixed(50).total_pages(120), 3);
        assert_eq!(PageSize::Unbounded.total_pages(10_000), 1);
        assert_eq!(PageSize::fixed(0), PageSize::Unbounded);
    }

    #[test]
    fn test_clamp_page_returns_to_first() {
        let cfg = config(SortDirection::Ascending);
        let mut state: ViewState<Col, u8> = ViewState::new(&cfg);
        state.page = 3;
        assert!(!state.clamp_page(3));
        assert_eq!(state.page, 3);
        assert!(state.clamp_page(2));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let cfg = config(SortDirection::Ascending);
        let mut state: ViewState<Col, u8> = ViewState::new(&cfg);
        state.prev_page();
        assert_eq!(state.page, 1);
        state.next_page(2);
        state.next_page(2);
        assert_eq!(state.page, 2);
        state.go_to_page(9, 2);
        assert_eq!(state.page, 2);
        state.go_to_page(0, 2);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_status_cycle() {
        let statuses = [1u8, 2, 3];
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter = filter.cycle(&statuses);
            seen.push(filter);
        }
        assert_eq!(
            seen,
            vec![
                StatusFilter::Only(1),
                StatusFilter::Only(2),
                StatusFilter::Only(3),
                StatusFilter::All
            ]
        );
        assert!(StatusFilter::All.matches(7u8));
        assert!(!StatusFilter::Only(1u8).matches(2));
    }
}

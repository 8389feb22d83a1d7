//! Generic tabular data view: filter, search, sort and paginate over an
//! in-memory collection of uniform records.

pub mod memo;
pub mod pipeline;
pub mod record;
pub mod view;

pub use memo::{Dataset, PipelineCache};
pub use pipeline::{Page, RenderModel, filter, paginate, process, run, search, sort};
pub use record::{Record, RowRef, Value, collate, compare_values};
pub use view::{PageSize, SortDirection, StatusFilter, TableConfig, ViewState};

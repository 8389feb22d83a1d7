use crate::cli::TableKind;
use crate::config::DashConfig;
use crate::error::{Error, Result};
use crate::format::{component_cell, record_cell};
use crate::model::filters::parse_choice;
use crate::model::{AdvancedFilters, ComponentField, ComponentMetric, DataRecord, DateRange, RecordField};
use crate::table::{Record, RenderModel, SortDirection, StatusFilter, TableConfig, ViewState, run as run_pipeline};
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

use super::{DataOrigin, resolve_dataset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// User-supplied view parameters for one invocation
#[derive(Clone, Debug, Default)]
pub struct TableOptions {
    pub search: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: usize,
    pub format: OutputFormat,
}

/// How one record type is laid out as columns
struct Layout<R: Record> {
    noun: &'static str,
    columns: &'static [R::Field],
    label: fn(R::Field) -> &'static str,
    name: fn(R::Field) -> &'static str,
    cell: fn(&R, R::Field) -> String,
    numeric: fn(R::Field) -> bool,
}

fn record_layout() -> Layout<DataRecord> {
    Layout {
        noun: "records",
        columns: &RecordField::COLUMNS,
        label: RecordField::label,
        name: RecordField::name,
        cell: record_cell,
        numeric: |f| matches!(f, RecordField::Value | RecordField::Correlation),
    }
}

fn component_layout() -> Layout<ComponentMetric> {
    Layout {
        noun: "components",
        columns: &ComponentField::COLUMNS,
        label: ComponentField::label,
        name: ComponentField::name,
        cell: component_cell,
        numeric: |f| {
            matches!(
                f,
                ComponentField::RenderTime
                    | ComponentField::MemoryUsage
                    | ComponentField::ReRenderCount
                    | ComponentField::HookCount
                    | ComponentField::ChildrenCount
            )
        },
    }
}

/// Build the view state from command line options
pub fn view_state<F, S>(options: &TableOptions, config: &TableConfig<F>) -> Result<ViewState<F, S>>
where
    F: Copy + Eq + FromStr<Err = Error>,
    S: Copy + Eq + FromStr<Err = Error>,
{
    let mut state = ViewState::new(config);
    if let Some(term) = &options.search {
        state.set_search(term.as_str());
    }
    if let Some(status) = &options.status
        && !status.eq_ignore_ascii_case("all")
    {
        state.set_status(StatusFilter::Only(status.parse()?));
    }
    if let Some(sort) = &options.sort {
        let field: F = sort.parse()?;
        if field != state.sort_field {
            state.toggle_sort(field, config);
        }
    }
    if let Some(direction) = options.direction {
        state.direction = direction;
    }
    state.page = options.page.max(1);
    Ok(state)
}

/// Record filters from command line options; unset options keep their defaults
pub fn advanced_filters(options: &TableOptions) -> Result<AdvancedFilters> {
    let mut filters = AdvancedFilters::default();
    if let Some(source) = &options.source {
        filters.source = parse_choice(source)?;
    }
    if let Some(category) = &options.category {
        filters.category = parse_choice(category)?;
    }
    filters.date_range = DateRange::new(
        options.from.unwrap_or(filters.date_range.start),
        options.to.unwrap_or(filters.date_range.end),
    )?;
    Ok(filters)
}

fn render<R>(
    records: &[R],
    layout: &Layout<R>,
    options: &TableOptions,
    config: &TableConfig<R::Field>,
    origin: &DataOrigin,
    out: &mut impl std::io::Write,
) -> Result<()>
where
    R: Record + Serialize,
    R::Field: FromStr<Err = Error>,
    R::Status: FromStr<Err = Error>,
{
    let state = view_state(options, config)?;
    let model = run_pipeline(records, &state, config);
    if model.rows.is_empty() && model.total_count > 0 {
        tracing::warn!(page = model.page, total_pages = model.total_pages, "Requested page is past the end");
    }

    match options.format {
        OutputFormat::Table => write_table(&model, layout, origin, out),
        OutputFormat::Json => write_json(&model, layout, origin, out),
        OutputFormat::Csv => write_csv(&model, layout, out),
    }
}

fn write_table<R: Record>(
    model: &RenderModel<&R, R::Field>,
    layout: &Layout<R>,
    origin: &DataOrigin,
    out: &mut impl std::io::Write,
) -> Result<()> {
    match origin {
        DataOrigin::File(path) => writeln!(out, "# {}", path.display())?,
        DataOrigin::Generated { seed } => writeln!(out, "# generated (seed {seed})")?,
    }
    writeln!(
        out,
        "# Sorted by {} {}",
        (layout.name)(model.sort_field),
        model.direction.label()
    )?;

    if model.rows.is_empty() {
        writeln!(out, "No {} match your current filters.", layout.noun)?;
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(layout.columns.iter().map(|&f| {
                let mut label = (layout.label)(f).to_string();
                if f == model.sort_field {
                    label.push_str(if model.direction.is_descending() { " v" } else { " ^" });
                }
                Cell::new(label)
            }));
        for row in &model.rows {
            table.add_row(layout.columns.iter().map(|&f| {
                let cell = Cell::new((layout.cell)(row, f));
                if (layout.numeric)(f) {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            }));
        }
        writeln!(out, "{table}")?;
    }

    writeln!(
        out,
        "{} | Page {} of {}",
        model.summary(layout.noun),
        model.page,
        model.total_pages
    )?;
    Ok(())
}

#[derive(Serialize)]
struct JsonPage<'a, R> {
    source: String,
    table: &'static str,
    sort_field: &'static str,
    direction: SortDirection,
    page: usize,
    total_pages: usize,
    total_count: usize,
    rows: &'a [&'a R],
}

fn write_json<R: Record + Serialize>(
    model: &RenderModel<&R, R::Field>,
    layout: &Layout<R>,
    origin: &DataOrigin,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let page = JsonPage {
        source: match origin {
            DataOrigin::File(path) => path.display().to_string(),
            DataOrigin::Generated { seed } => format!("generated:{seed}"),
        },
        table: layout.noun,
        sort_field: (layout.name)(model.sort_field),
        direction: model.direction,
        page: model.page,
        total_pages: model.total_pages,
        total_count: model.total_count,
        rows: &model.rows,
    };
    serde_json::to_writer_pretty(&mut *out, &page)?;
    writeln!(out)?;
    Ok(())
}

fn write_csv<R: Record>(
    model: &RenderModel<&R, R::Field>,
    layout: &Layout<R>,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(R::FIELDS.iter().map(|&f| (layout.name)(f)))?;
    for row in &model.rows {
        writer.write_record(
            R::FIELDS
                .iter()
                .map(|&f| row.value(f).map(|v| v.to_text().into_owned()).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write(
    kind: TableKind,
    file: Option<&Path>,
    options: &TableOptions,
    config: &DashConfig,
    out: &mut impl std::io::Write,
) -> Result<()> {
    let (data, origin) = resolve_dataset(file, config)?;
    write_data(kind, &data.records, &data.components, options, &origin, out)
}

fn write_data(
    kind: TableKind,
    records: &[DataRecord],
    components: &[ComponentMetric],
    options: &TableOptions,
    origin: &DataOrigin,
    out: &mut impl std::io::Write,
) -> Result<()> {
    match kind {
        TableKind::Records => render(
            &advanced_filters(options)?.apply(records),
            &record_layout(),
            options,
            &TableConfig::records(),
            origin,
            out,
        ),
        TableKind::Components => render(
            components,
            &component_layout(),
            options,
            &TableConfig::components(),
            origin,
            out,
        ),
    }
}

pub fn run(kind: TableKind, file: Option<&Path>, options: &TableOptions, config: &DashConfig) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write(kind, file, options, config, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DashboardData, fixtures};
    use crate::model::{ComponentStatus, RecordStatus};

    fn output(kind: TableKind, options: &TableOptions) -> String {
        let data = DashboardData::generated(42, 120);
        let mut out = Vec::new();
        write_data(
            kind,
            &data.records,
            &fixtures::component_metrics(),
            options,
            &DataOrigin::Generated { seed: 42 },
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn options() -> TableOptions {
        TableOptions {
            page: 1,
            ..TableOptions::default()
        }
    }

    #[test]
    fn test_records_summary_line() {
        let text = output(TableKind::Records, &TableOptions { page: 3, ..options() });
        assert!(text.contains("Showing 101 to 120 of 120 records | Page 3 of 3"), "{text}");
        assert!(text.contains("# Sorted by timestamp desc"));
    }

    #[test]
    fn test_components_empty_result_message() {
        let text = output(
            TableKind::Components,
            &TableOptions {
                search: Some("zzz-nothing".to_string()),
                ..options()
            },
        );
        assert!(text.contains("No components match your current filters."));
        assert!(text.contains("Showing 0 to 0 of 0 components | Page 1 of 1"));
    }

    #[test]
    fn test_csv_has_every_field() {
        let text = output(
            TableKind::Components,
            &TableOptions {
                status: Some("critical".to_string()),
                format: OutputFormat::Csv,
                ..options()
            },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,name,renderTime,memoryUsage,reRenderCount,hookCount,childrenCount,lastUpdate,status"
        );
        assert_eq!(lines[1], "2,ChartContainer,28.7,12.4,23,8,4,15:22:00,critical");
        assert_eq!(lines[2], "8,LoadingSpinner,14.5,2.7,203,2,0,15:21:54,critical");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_quotes_special_characters() {
        let mut components = fixtures::component_metrics();
        components[0].name = "Data\rTable".to_string();
        components[1].name = "Chart, \"big\"".to_string();
        let mut out = Vec::new();
        write_data(
            TableKind::Components,
            &[],
            &components,
            &TableOptions {
                sort: Some("id".to_string()),
                direction: Some(SortDirection::Ascending),
                format: OutputFormat::Csv,
                ..options()
            },
            &DataOrigin::Generated { seed: 42 },
            &mut out,
        )
        .unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(names[0], "Data\rTable");
        assert_eq!(names[1], "Chart, \"big\"");
        assert_eq!(names.len(), 8);
        assert!(String::from_utf8(out).unwrap().contains("\"Data\rTable\""));
    }

    #[test]
    fn test_record_filters_run_before_pipeline() {
        let data = DashboardData::generated(42, 120);
        let expected = data
            .records
            .iter()
            .filter(|r| r.source == crate::model::Source::Api && r.timestamp.as_str() < "2024-07-01")
            .count();
        let text = output(
            TableKind::Records,
            &TableOptions {
                source: Some("API".to_string()),
                to: NaiveDate::from_ymd_opt(2024, 6, 30),
                format: OutputFormat::Json,
                ..options()
            },
        );
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_count"], expected);
        let rows = value["rows"].as_array().unwrap();
        assert!(rows.iter().all(|r| r["source"] == "api"));
        assert!(rows.iter().all(|r| r["timestamp"].as_str().unwrap() < "2024-07-01"));
    }

    #[test]
    fn test_default_record_filters_keep_everything() {
        let filters = advanced_filters(&options()).unwrap();
        assert!(filters.is_default());
        let text = output(
            TableKind::Records,
            &TableOptions {
                source: Some("all".to_string()),
                category: Some("ALL".to_string()),
                ..options()
            },
        );
        assert!(text.contains("of 120 records"), "{text}");
    }

    #[test]
    fn test_inverted_date_range_is_invalid_argument() {
        let err = advanced_filters(&TableOptions {
            from: NaiveDate::from_ymd_opt(2024, 9, 1),
            to: NaiveDate::from_ymd_opt(2024, 8, 1),
            ..options()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = advanced_filters(&TableOptions {
            category: Some("sales".to_string()),
            ..options()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_json_page() {
        let text = output(
            TableKind::Components,
            &TableOptions {
                sort: Some("name".to_string()),
                direction: Some(SortDirection::Ascending),
                format: OutputFormat::Json,
                ..options()
            },
        );
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_count"], 8);
        assert_eq!(value["sort_field"], "name");
        assert_eq!(value["direction"], "ascending");
        assert_eq!(value["rows"][0]["name"], "Badge");
        assert_eq!(value["source"], "generated:42");
    }

    #[test]
    fn test_view_state_from_options() {
        let config = TableConfig::records();
        let state: ViewState<RecordField, RecordStatus> = view_state(
            &TableOptions {
                sort: Some("value".to_string()),
                status: Some("warning".to_string()),
                page: 0,
                ..TableOptions::default()
            },
            &config,
        )
        .unwrap();
        assert_eq!(state.sort_field, RecordField::Value);
        assert_eq!(state.direction, SortDirection::Ascending);
        assert_eq!(state.status, StatusFilter::Only(RecordStatus::Warning));
        assert_eq!(state.page, 1);

        let config = TableConfig::components();
        let state: ViewState<ComponentField, ComponentStatus> = view_state(
            &TableOptions {
                sort: Some("renderTime".to_string()),
                status: Some("ALL".to_string()),
                ..options()
            },
            &config,
        )
        .unwrap();
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(state.status, StatusFilter::All);
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let config = TableConfig::records();
        let result: Result<ViewState<RecordField, RecordStatus>> = view_state(
            &TableOptions {
                sort: Some("latency".to_string()),
                ..options()
            },
            &config,
        );
        assert_eq!(result.unwrap_err().exit_code(), crate::error::exit_code::INVALID_ARGUMENTS);
    }
}

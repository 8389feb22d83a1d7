use super::app::{App, COMPONENT_WIDTHS, InputMode, RECORD_WIDTHS, Tab};
use crate::dataset::fixtures;
use crate::dataset::generator::VALUE_MAX;
use crate::format;
use crate::model::{
    AdvancedFilters, ComponentField, ComponentStatus, Impact, InsightTab, LogLevel, RecordField,
    RecordStatus,
};
use crate::perf::HISTORY_LEN;
use crate::table::{SortDirection, StatusFilter};
use crate::viz::{self, HEATMAP_SIZE, VisualizationKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        Wrap,
    },
};

const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Table status
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.tab {
        Tab::Analytics => render_analytics(frame, app, chunks[1]),
        Tab::Components => render_components(frame, app, chunks[1]),
    }
    render_status_line(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Min(40), Constraint::Length(26)]).split(area);

    let elapsed = app.elapsed();
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;

    let badge = if !app.is_live() {
        Span::styled(" VIEW ", Style::default().bg(Color::Blue).fg(Color::White))
    } else if app.is_paused() {
        Span::styled(" PAUSED ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        Span::styled(" LIVE ", Style::default().bg(Color::Green).fg(Color::Black))
    };

    let status = Line::from(vec![
        Span::styled(
            "perfdash",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        badge,
        Span::raw(format!(
            " {} │ {:02}:{:02}:{:02} │ {} records",
            app.label(),
            hours,
            minutes,
            seconds,
            format::format_count(app.records().len() as u64)
        )),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[0]);

    let active_style = Style::default().bg(Color::Cyan).fg(Color::Black);
    let inactive_style = Style::default().fg(Color::DarkGray);
    let style_for = |tab: Tab| {
        if app.tab == tab {
            active_style
        } else {
            inactive_style
        }
    };
    let tabs = Line::from(vec![
        Span::styled("[Analytics]", style_for(Tab::Analytics)),
        Span::raw(" "),
        Span::styled("[Components]", style_for(Tab::Components)),
    ]);
    frame.render_widget(Paragraph::new(tabs), chunks[1]);
}

fn table_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_empty(frame: &mut Frame, block: Block<'static>, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn header_label(label: &str, active: bool, direction: SortDirection) -> String {
    if !active {
        return label.to_string();
    }
    let indicator = if direction.is_descending() { "v" } else { "^" };
    format!("{} {}", label, indicator)
}

fn header_row(labels: Vec<String>) -> Row<'static> {
    let cells = labels.into_iter().map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells).height(1)
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn render_analytics(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(5)]).split(area);
    render_filter_bar(frame, app, rows[0]);
    let area = rows[1];

    if !app.chart_visible {
        render_records_table(frame, app, area);
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    render_records_table(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let filters = app.filters;
    let defaults = AdvancedFilters::default();
    let key = |k: &'static str| Span::styled(k, Style::default().bg(Color::DarkGray));
    // Values that differ from the defaults are highlighted
    let value = |text: String, changed: bool| {
        if changed {
            Span::styled(text, Style::default().fg(Color::Yellow))
        } else {
            Span::raw(text)
        }
    };
    let range = filters.date_range;
    let line = Line::from(vec![
        key(" s "),
        value(format!(" {} ", filters.source_label()), filters.source.is_some()),
        key(" C "),
        value(format!(" {} ", filters.category_label()), filters.category.is_some()),
        key(" </> "),
        value(
            format!(" from {} ", range.start),
            range.start != defaults.date_range.start,
        ),
        key(" {/} "),
        value(format!(" to {} ", range.end), range.end != defaults.date_range.end),
        key(" x "),
        Span::raw(" reset"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_records_table(frame: &mut Frame, app: &mut App, area: Rect) {
    app.set_table_area(area);
    let selected = app.selected_row();
    let model = app.record_model();
    let block = table_block("Records");

    if model.rows.is_empty() {
        render_empty(frame, block, "No records match your current filters.", area);
        return;
    }

    let header = header_row(
        RecordField::COLUMNS
            .iter()
            .map(|f| header_label(f.label(), *f == model.sort_field, model.direction))
            .collect(),
    );

    let rows: Vec<Row> = model
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cells = RecordField::COLUMNS.iter().map(|field| {
                let text = format::record_cell(record, *field);
                match field {
                    RecordField::Status => {
                        Cell::from(text).style(Style::default().fg(record_status_color(record.status)))
                    }
                    RecordField::Correlation => {
                        let color = if record.correlation >= 0.0 {
                            Color::Green
                        } else {
                            Color::Red
                        };
                        Cell::from(text).style(Style::default().fg(color))
                    }
                    _ => Cell::from(text),
                }
            });
            Row::new(cells).style(row_style(i == selected))
        })
        .collect();

    let widths = RECORD_WIDTHS.map(Constraint::Length);
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_chart(frame: &mut Frame, app: &mut App, area: Rect) {
    let chart = app.chart;
    let title = format!(
        " {} │ {} │ {:.1}x ",
        chart.kind.as_str(),
        chart.category_label(),
        chart.zoom
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if chart.kind == VisualizationKind::Heatmap {
        let cells = app.heatmap_cells().to_vec();
        let lines: Vec<Line> = cells
            .chunks(HEATMAP_SIZE)
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|cell| Span::styled("██", Style::default().fg(heat_color(cell.intensity))))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let selected = viz::select(app.records(), chart.category);
    if selected.is_empty() {
        render_empty(frame, block, "No data...", area);
        return;
    }

    match chart.kind {
        VisualizationKind::Bar => {
            let bars: Vec<(&str, u64)> = viz::bar_series(&selected)
                .into_iter()
                .map(|(category, sum)| (category.as_str(), sum.max(0.0).round() as u64))
                .collect();
            let bar_width = ((6.0 * chart.zoom).round() as u16).max(1);
            let widget = BarChart::default()
                .block(block)
                .bar_width(bar_width)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Green))
                .value_style(Style::default().fg(Color::Black).bg(Color::Green))
                .data(bars.as_slice());
            frame.render_widget(widget, area);
        }
        VisualizationKind::Scatter | VisualizationKind::Line => {
            let (points, x_max, y_bounds, graph_type, y_title) = if chart.kind == VisualizationKind::Scatter {
                (
                    viz::scatter_points(&selected),
                    VALUE_MAX / chart.zoom,
                    [-1.0, 1.0],
                    GraphType::Scatter,
                    "corr",
                )
            } else {
                let points = viz::line_series(&selected);
                let n = points.len().max(1) as f64;
                (points, n / chart.zoom, [0.0, VALUE_MAX], GraphType::Line, "value")
            };
            let visible: Vec<(f64, f64)> = points.into_iter().filter(|(x, _)| *x <= x_max).collect();

            let datasets = vec![
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(graph_type)
                    .style(Style::default().fg(Color::Green))
                    .data(&visible),
            ];
            let widget = Chart::new(datasets)
                .block(block)
                .x_axis(
                    Axis::default()
                        .style(Style::default().fg(Color::DarkGray))
                        .bounds([0.0, x_max])
                        .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", x_max))]),
                )
                .y_axis(
                    Axis::default()
                        .title(y_title)
                        .style(Style::default().fg(Color::DarkGray))
                        .bounds(y_bounds)
                        .labels(vec![
                            Span::raw(format!("{:.0}", y_bounds[0])),
                            Span::raw(format!("{:.0}", y_bounds[1])),
                        ]),
                );
            frame.render_widget(widget, area);
        }
        VisualizationKind::Heatmap => {}
    }
}

fn render_components(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);
    render_controls(frame, app, rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);
    render_components_table(frame, app, chunks[0]);
    render_insights(frame, app, chunks[1]);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let c = app.controls;
    let key = |k: &'static str| Span::styled(k, Style::default().bg(Color::DarkGray));
    let line = Line::from(vec![
        key(" R "),
        Span::raw(format!(" {} ({}) ", c.render_mode.as_str(), c.render_mode.description())),
        key(" V "),
        Span::raw(format!(
            " virtual scrolling {} ",
            if c.virtual_scrolling { "on" } else { "off" }
        )),
        key(" E "),
        Span::raw(format!(" {} ", c.engine.as_str())),
        key(" S "),
        Span::raw(format!(" {} ", c.stress_rate)),
    ]);
    let block = Block::default()
        .title(" Performance Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_components_table(frame: &mut Frame, app: &mut App, area: Rect) {
    app.set_table_area(area);
    let selected = app.selected_row();
    let model = app.component_model();
    let block = table_block("Components");

    if model.rows.is_empty() {
        render_empty(frame, block, "No components match your current filters.", area);
        return;
    }

    let mut labels: Vec<String> = ComponentField::COLUMNS
        .iter()
        .map(|f| header_label(f.label(), *f == model.sort_field, model.direction))
        .collect();
    labels.push("Trend".to_string());
    let header = header_row(labels);

    let entries: Vec<(String, Vec<Cell>)> = model
        .rows
        .iter()
        .map(|component| {
            let cells = ComponentField::COLUMNS
                .iter()
                .map(|field| {
                    let text = format::component_cell(component, *field);
                    match field {
                        ComponentField::Status | ComponentField::RenderTime => Cell::from(text)
                            .style(Style::default().fg(component_status_color(component.status))),
                        _ => Cell::from(text),
                    }
                })
                .collect();
            (component.id.clone(), cells)
        })
        .collect();

    let histories: Vec<Vec<f64>> = entries
        .iter()
        .map(|(id, _)| {
            app.history(id)
                .map(|h| h.iter().copied().collect())
                .unwrap_or_default()
        })
        .collect();
    let global_max = histories
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max);

    let rows: Vec<Row> = entries
        .into_iter()
        .zip(&histories)
        .enumerate()
        .map(|(i, ((_, mut cells), history))| {
            cells.push(Cell::from(render_sparkline(history, HISTORY_LEN, global_max)));
            Row::new(cells).style(row_style(i == selected))
        })
        .collect();

    let mut widths: Vec<Constraint> = COMPONENT_WIDTHS.iter().map(|w| Constraint::Length(*w)).collect();
    widths.push(Constraint::Length(HISTORY_LEN as u16 + 2));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

/// Render-time trend, oldest on the left. Scaled against the largest value
/// across all rows so rows are comparable.
fn render_sparkline(values: &[f64], width: usize, global_max: f64) -> Line<'static> {
    let data_points = values.len().min(width);
    let empty_slots = width.saturating_sub(data_points);

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(width);
    for _ in 0..empty_slots {
        spans.push(Span::styled("·", Style::default().fg(Color::DarkGray)));
    }

    for &val in &values[values.len() - data_points..] {
        let char_idx = if global_max <= 0.0 {
            0
        } else {
            ((val / global_max * 7.0).round() as usize).min(7)
        };
        let color = match char_idx {
            7 => Color::Red,
            6 => Color::LightRed,
            5 => Color::Yellow,
            4 => Color::LightYellow,
            3 => Color::Green,
            2 => Color::LightGreen,
            1 => Color::Cyan,
            _ => Color::DarkGray,
        };
        spans.push(Span::styled(
            SPARKLINE_CHARS[char_idx].to_string(),
            Style::default().fg(color),
        ));
    }

    Line::from(spans)
}

fn render_insights(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Code Insights: {} ", app.insight_tab.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = Vec::new();

    match app.insight_tab {
        InsightTab::Insights => {
            lines.push(Line::from(fixtures::INSIGHT_SUMMARY));
            lines.push(Line::from(""));
            for metric in app.key_metrics() {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<18}", metric.label), dim),
                    Span::styled(metric.value.clone(), bold),
                ]));
            }
        }
        InsightTab::Recommendations => {
            for rec in app.recommendations() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {} ", rec.impact.as_str()),
                        Style::default().fg(Color::Black).bg(impact_color(rec.impact)),
                    ),
                    Span::raw(" "),
                    Span::styled(rec.title.clone(), bold),
                ]));
                lines.push(Line::from(rec.description.clone()));
                if let Some(code) = &rec.code {
                    for code_line in code.lines() {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", code_line),
                            Style::default().fg(Color::Cyan),
                        )));
                    }
                }
                lines.push(Line::from(""));
            }
        }
        InsightTab::Errors => {
            for log in app.error_logs() {
                lines.push(Line::from(vec![
                    Span::styled(format!("[{}] ", log.timestamp), dim),
                    Span::styled(
                        format!("{:<7} ", log.level.as_str()),
                        Style::default().fg(log_level_color(log.level)),
                    ),
                    Span::styled(log.component.clone(), bold),
                ]));
                lines.push(Line::from(log.message.clone()));
                if let Some(trace) = &log.stack_trace {
                    lines.push(Line::from(Span::styled(format!("  {}", trace), dim)));
                }
                lines.push(Line::from(""));
            }
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn status_filter_label<S>(filter: StatusFilter<S>, label: impl Fn(S) -> &'static str) -> &'static str {
    match filter {
        StatusFilter::All => "all",
        StatusFilter::Only(s) => label(s),
    }
}

fn render_status_line(frame: &mut Frame, app: &mut App, area: Rect) {
    let (summary, page, total_pages, search, status) = match app.tab {
        Tab::Analytics => {
            let model = app.record_model();
            let (summary, page, total) = (model.summary("records"), model.page, model.total_pages);
            (
                summary,
                page,
                total,
                app.record_view.search.clone(),
                status_filter_label(app.record_view.status, RecordStatus::as_str),
            )
        }
        Tab::Components => {
            let model = app.component_model();
            let (summary, page, total) = (model.summary("components"), model.page, model.total_pages);
            (
                summary,
                page,
                total,
                app.component_view.search.clone(),
                status_filter_label(app.component_view.status, ComponentStatus::as_str),
            )
        }
    };

    let mut spans = vec![
        Span::raw(format!(" {} │ Page {} of {} │ status: {} │ ", summary, page, total_pages, status)),
    ];
    if app.mode == InputMode::Search {
        spans.push(Span::styled(
            format!("/{}█", search),
            Style::default().fg(Color::Yellow),
        ));
    } else if !search.is_empty() {
        spans.push(Span::raw(format!("search: \"{}\"", search)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &str| Span::styled(format!(" {} ", k), Style::default().bg(Color::DarkGray));
    let mut spans = vec![key("q"), Span::raw(" quit ")];

    if app.mode == InputMode::Search {
        spans.push(key("Enter"));
        spans.push(Span::raw(" done "));
        spans.push(key("^u"));
        spans.push(Span::raw(" clear "));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
        return;
    }

    if app.is_live() {
        spans.push(key("p"));
        spans.push(Span::raw(" pause "));
    }
    spans.push(key("1/2"));
    spans.push(Span::raw(" tab "));
    spans.push(key("/"));
    spans.push(Span::raw(" search "));
    spans.push(key("f"));
    spans.push(Span::raw(" status "));
    spans.push(key("o/r"));
    spans.push(Span::raw(" sort "));
    spans.push(key("[/]"));
    spans.push(Span::raw(" page "));

    match app.tab {
        Tab::Analytics => {
            let chart_label = if app.chart_visible {
                "hide chart"
            } else {
                "show chart"
            };
            spans.push(key("c"));
            spans.push(Span::raw(format!(" {} ", chart_label)));
            if app.chart_visible {
                spans.push(key("v"));
                spans.push(Span::raw(" kind "));
                spans.push(key("t"));
                spans.push(Span::raw(" category "));
                spans.push(key("+/-"));
                spans.push(Span::raw(" zoom "));
            }
        }
        Tab::Components => {
            spans.push(key("i"));
            spans.push(Span::raw(" insights "));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn record_status_color(status: RecordStatus) -> Color {
    match status {
        RecordStatus::Active => Color::Green,
        RecordStatus::Warning => Color::Yellow,
        RecordStatus::Error => Color::Red,
    }
}

fn component_status_color(status: ComponentStatus) -> Color {
    match status {
        ComponentStatus::Optimal => Color::Green,
        ComponentStatus::Warning => Color::Yellow,
        ComponentStatus::Critical => Color::Red,
    }
}

fn impact_color(impact: Impact) -> Color {
    match impact {
        Impact::High => Color::Red,
        Impact::Medium => Color::Yellow,
        Impact::Low => Color::Green,
    }
}

fn log_level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warning => Color::Yellow,
        LogLevel::Info => Color::Blue,
    }
}

fn heat_color(intensity: f64) -> Color {
    if intensity >= 0.75 {
        Color::Red
    } else if intensity >= 0.5 {
        Color::Yellow
    } else if intensity >= 0.25 {
        Color::Green
    } else {
        Color::DarkGray
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashConfig;
    use crate::dataset::DashboardData;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_header_label_marks_active_column() {
        assert_eq!(header_label("Value", true, SortDirection::Ascending), "Value ^");
        assert_eq!(header_label("Value", true, SortDirection::Descending), "Value v");
        assert_eq!(header_label("Value", false, SortDirection::Descending), "Value");
    }

    #[test]
    fn test_sparkline_pads_left() {
        let line = render_sparkline(&[1.0, 2.0], 4, 2.0);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "··▅█");
    }

    #[test]
    fn test_footer_summary_is_drawn() {
        let mut app = App::new(DashboardData::generated(3, 120), &DashConfig::default(), false);
        app.refresh();
        let screen = draw(&mut app);
        assert!(screen.contains("Showing 1 to 50 of 120 records"));
        assert!(screen.contains("Page 1 of 3"));
    }

    #[test]
    fn test_filter_bar_shows_active_filters() {
        let mut app = App::new(DashboardData::generated(3, 120), &DashConfig::default(), false);
        app.refresh();
        let screen = draw(&mut app);
        assert!(screen.contains("all sources"));
        assert!(screen.contains("from 2024-01-01"));
        assert!(screen.contains("to 2024-12-31"));

        app.handle_key(KeyCode::Char('s'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('>'), KeyModifiers::NONE);
        app.refresh();
        let screen = draw(&mut app);
        assert!(screen.contains(" api "));
        assert!(screen.contains("from 2024-02-01"));
    }

    #[test]
    fn test_empty_components_message() {
        let mut app = App::new(DashboardData::generated(3, 5), &DashConfig::default(), false);
        app.handle_key(KeyCode::Char('2'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('/'), KeyModifiers::NONE);
        for c in "zzz".chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        app.refresh();
        let screen = draw(&mut app);
        assert!(screen.contains("No components match your current filters."));
        assert!(screen.contains("Showing 0 to 0 of 0 components"));
    }
}

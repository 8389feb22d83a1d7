use crate::config::DashConfig;
use crate::dataset::{DashboardData, fixtures};
use crate::error::Result;
use crate::model::{
    AdvancedFilters, ComponentField, ComponentMetric, ComponentStatus, DataRecord, ErrorLog,
    InsightTab, KeyMetric, Recommendation, RecordField, RecordStatus,
};
use crate::perf::{LiveSimulator, PerformanceControls};
use crate::table::{Dataset, PipelineCache, RenderModel, TableConfig, ViewState};
use crate::viz::{self, ChartState, HeatCell, VisualizationKind};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, prelude::*};
use std::collections::VecDeque;
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tracing::debug;

use super::ui;

/// Column widths of the analytics table, in `RecordField::COLUMNS` order
pub const RECORD_WIDTHS: [u16; 6] = [20, 10, 16, 12, 9, 12];
/// Column widths of the components table, in `ComponentField::COLUMNS` order
pub const COMPONENT_WIDTHS: [u16; 8] = [16, 12, 10, 11, 7, 9, 10, 12];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analytics,
    Components,
}

impl Tab {
    fn next(self) -> Self {
        match self {
            Tab::Analytics => Tab::Components,
            Tab::Components => Tab::Analytics,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keystrokes edit the search term of the active table
    Search,
}

/// Index of the column under `pos` (relative to the table's inner left
/// edge), given fixed column widths separated by one space.
pub fn column_at(widths: &[u16], pos: u16) -> Option<usize> {
    let mut offset = 0u16;
    for (i, w) in widths.iter().enumerate() {
        if pos < offset + w {
            return Some(i);
        }
        offset += w + 1;
        if pos < offset {
            return None;
        }
    }
    None
}

/// Dashboard state shared by both tabs
pub struct App {
    label: String,
    /// Every loaded record; `records` holds the subset passing `filters`
    all_records: Vec<DataRecord>,
    pub filters: AdvancedFilters,
    records: Dataset<DataRecord>,
    components: Dataset<ComponentMetric>,

    record_config: TableConfig<RecordField>,
    component_config: TableConfig<ComponentField>,
    pub record_view: ViewState<RecordField, RecordStatus>,
    pub component_view: ViewState<ComponentField, ComponentStatus>,
    record_cache: PipelineCache<RecordField, RecordStatus>,
    component_cache: PipelineCache<ComponentField, ComponentStatus>,

    pub tab: Tab,
    pub mode: InputMode,
    selected_row: usize,
    running: bool,
    paused: bool,
    start_time: Instant,

    pub chart_visible: bool,
    pub chart: ChartState,
    chart_rng: StdRng,
    heatmap: Option<(ChartState, Vec<HeatCell>)>,

    pub controls: PerformanceControls,
    pub insight_tab: InsightTab,
    recommendations: Vec<Recommendation>,
    error_logs: Vec<ErrorLog>,
    key_metrics: Vec<KeyMetric>,

    simulator: Option<LiveSimulator<StdRng>>,
    last_tick: Instant,

    table_area: Rect,
}

impl App {
    pub fn new(data: DashboardData, config: &DashConfig, live: bool) -> Self {
        let seed = config.generator.seed;
        let controls = PerformanceControls::with_rate(config.live.stress_rate);
        let simulator = live.then(|| {
            LiveSimulator::new(
                StdRng::seed_from_u64(seed.wrapping_add(1)),
                controls.stress_rate,
                config.live.tick,
            )
        });
        let record_config = TableConfig::records();
        let component_config = TableConfig::components();
        let filters = AdvancedFilters::default();

        App {
            label: data.label,
            records: Dataset::new(filters.apply(&data.records)),
            all_records: data.records,
            filters,
            components: Dataset::new(data.components),
            record_view: ViewState::new(&record_config),
            component_view: ViewState::new(&component_config),
            record_config,
            component_config,
            record_cache: PipelineCache::new(),
            component_cache: PipelineCache::new(),
            tab: Tab::default(),
            mode: InputMode::default(),
            selected_row: 0,
            running: true,
            paused: false,
            start_time: Instant::now(),
            chart_visible: true,
            chart: ChartState::default(),
            chart_rng: StdRng::seed_from_u64(seed),
            heatmap: None,
            controls,
            insight_tab: InsightTab::default(),
            recommendations: fixtures::recommendations(),
            error_logs: fixtures::error_logs(),
            key_metrics: fixtures::key_metrics(),
            simulator,
            last_tick: Instant::now(),
            table_area: Rect::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while self.running {
            let poll_duration = if self.is_live() {
                Duration::from_millis(10)
            } else {
                Duration::from_millis(50)
            };

            if event::poll(poll_duration)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code, key.modifiers);
                    }
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            self.handle_click(mouse.column, mouse.row);
                        }
                        MouseEventKind::ScrollUp => self.move_selection(-3),
                        MouseEventKind::ScrollDown => self.move_selection(3),
                        _ => {}
                    },
                    _ => {}
                }
            }

            self.tick_live();
            self.refresh();

            terminal.draw(|frame| {
                ui::render(frame, self);
            })?;
        }

        Ok(())
    }

    /// Advance the simulation when a tick is due
    pub fn tick_live(&mut self) {
        if self.paused {
            return;
        }
        let Some(simulator) = self.simulator.as_mut() else {
            return;
        };
        if self.last_tick.elapsed() < simulator.tick_interval() {
            return;
        }
        simulator.tick(&mut self.components, chrono::Local::now().time());
        self.last_tick = Instant::now();
    }

    /// Recover pages that fell past the end of their table and keep the
    /// selection on the visible page.
    pub fn refresh(&mut self) {
        let total = self.record_model().total_pages;
        if self.record_view.clamp_page(total) {
            debug!(total, "Records page reset");
        }
        let total = self.component_model().total_pages;
        if self.component_view.clamp_page(total) {
            debug!(total, "Components page reset");
        }
        let rows = self.visible_rows();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key == KeyCode::Char('c') {
            self.running = false;
            return;
        }
        if self.mode == InputMode::Search {
            self.handle_search_key(key, ctrl);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => self.chart_visible = false,
            KeyCode::Char('p') if self.is_live() => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "Live updates toggled");
            }

            KeyCode::Char('1') => self.switch_tab(Tab::Analytics),
            KeyCode::Char('2') => self.switch_tab(Tab::Components),
            KeyCode::Char('m') | KeyCode::Tab => self.switch_tab(self.tab.next()),

            // === TABLE CONTROLS ===
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Char('f') => self.cycle_status_filter(),
            KeyCode::Char('o') => self.sort_next_column(),
            KeyCode::Char('r') => self.reverse_sort(),
            KeyCode::Char(']') | KeyCode::PageDown => self.next_page(),
            KeyCode::Char('[') | KeyCode::PageUp => self.prev_page(),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.selected_row = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected_row = self.visible_rows().saturating_sub(1);
            }

            // === CHART CONTROLS ===
            KeyCode::Char('c') if self.tab == Tab::Analytics => {
                self.chart_visible = !self.chart_visible;
            }
            KeyCode::Char('v') if self.tab == Tab::Analytics => {
                self.chart.kind = self.chart.kind.next();
            }
            KeyCode::Char('t') if self.tab == Tab::Analytics => {
                let categories = viz::categories(self.records.records());
                self.chart.cycle_category(&categories);
            }
            KeyCode::Char('+') | KeyCode::Char('=') if self.tab == Tab::Analytics => {
                self.chart.zoom_in();
            }
            KeyCode::Char('-') if self.tab == Tab::Analytics => self.chart.zoom_out(),

            // === RECORD FILTERS ===
            KeyCode::Char('s') if self.tab == Tab::Analytics => {
                self.filters.cycle_source();
                self.apply_filters();
            }
            KeyCode::Char('C') if self.tab == Tab::Analytics => {
                self.filters.cycle_category();
                self.apply_filters();
            }
            KeyCode::Char('<') if self.tab == Tab::Analytics => {
                self.filters.date_range.shift_start(-1);
                self.apply_filters();
            }
            KeyCode::Char('>') if self.tab == Tab::Analytics => {
                self.filters.date_range.shift_start(1);
                self.apply_filters();
            }
            KeyCode::Char('{') if self.tab == Tab::Analytics => {
                self.filters.date_range.shift_end(-1);
                self.apply_filters();
            }
            KeyCode::Char('}') if self.tab == Tab::Analytics => {
                self.filters.date_range.shift_end(1);
                self.apply_filters();
            }
            KeyCode::Char('x') if self.tab == Tab::Analytics => self.reset_filters(),

            // === PERFORMANCE CONTROLS ===
            KeyCode::Char('R') if self.tab == Tab::Components => {
                self.controls.toggle_render_mode();
            }
            KeyCode::Char('V') if self.tab == Tab::Components => {
                self.controls.toggle_virtual_scrolling();
            }
            KeyCode::Char('E') if self.tab == Tab::Components => self.controls.toggle_engine(),
            KeyCode::Char('S') if self.tab == Tab::Components => {
                self.controls.cycle_stress_rate();
                if let Some(simulator) = self.simulator.as_mut() {
                    simulator.set_rate(self.controls.stress_rate);
                }
            }
            KeyCode::Char('i') if self.tab == Tab::Components => {
                self.insight_tab = self.insight_tab.next();
            }

            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyCode, ctrl: bool) {
        match key {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Char('u') if ctrl => match self.tab {
                Tab::Analytics => self.record_view.set_search(""),
                Tab::Components => self.component_view.set_search(""),
            },
            KeyCode::Backspace => match self.tab {
                Tab::Analytics => self.record_view.pop_search_char(),
                Tab::Components => self.component_view.pop_search_char(),
            },
            KeyCode::Char(c) if !ctrl => match self.tab {
                Tab::Analytics => self.record_view.push_search_char(c),
                Tab::Components => self.component_view.push_search_char(c),
            },
            _ => {}
        }
    }

    /// Rebuild the filtered record set; the pipeline recomputes on the new
    /// dataset generation.
    fn apply_filters(&mut self) {
        let filtered = self.filters.apply(&self.all_records);
        debug!(kept = filtered.len(), total = self.all_records.len(), "Record filters applied");
        self.records.replace(filtered);
        self.heatmap = None;
        self.selected_row = 0;
    }

    /// Default date range, all sources and categories, bar chart
    fn reset_filters(&mut self) {
        self.filters.reset();
        self.chart.kind = VisualizationKind::Bar;
        self.apply_filters();
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected_row = 0;
        }
    }

    fn cycle_status_filter(&mut self) {
        match self.tab {
            Tab::Analytics => {
                let next = self.record_view.status.cycle(&RecordStatus::ALL);
                self.record_view.set_status(next);
            }
            Tab::Components => {
                let next = self.component_view.status.cycle(&ComponentStatus::ALL);
                self.component_view.set_status(next);
            }
        }
    }

    /// Make the column after the active one the sort column
    fn sort_next_column(&mut self) {
        match self.tab {
            Tab::Analytics => {
                let next = next_field(&RecordField::COLUMNS, self.record_view.sort_field);
                self.record_view.toggle_sort(next, &self.record_config);
            }
            Tab::Components => {
                let next = next_field(&ComponentField::SORTABLE, self.component_view.sort_field);
                self.component_view.toggle_sort(next, &self.component_config);
            }
        }
    }

    fn reverse_sort(&mut self) {
        match self.tab {
            Tab::Analytics => {
                let field = self.record_view.sort_field;
                self.record_view.toggle_sort(field, &self.record_config);
            }
            Tab::Components => {
                let field = self.component_view.sort_field;
                self.component_view.toggle_sort(field, &self.component_config);
            }
        }
    }

    fn next_page(&mut self) {
        match self.tab {
            Tab::Analytics => {
                let total = self.record_model().total_pages;
                self.record_view.next_page(total);
            }
            Tab::Components => {
                let total = self.component_model().total_pages;
                self.component_view.next_page(total);
            }
        }
        self.selected_row = 0;
    }

    fn prev_page(&mut self) {
        match self.tab {
            Tab::Analytics => self.record_view.prev_page(),
            Tab::Components => self.component_view.prev_page(),
        }
        self.selected_row = 0;
    }

    fn move_selection(&mut self, delta: i32) {
        let new_row = if delta >= 0 {
            self.selected_row.saturating_add(delta as usize)
        } else {
            self.selected_row.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.selected_row = new_row.min(self.visible_rows().saturating_sub(1));
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        let area = self.table_area;
        if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
            return;
        }
        // border (1) + header (1)
        if y == area.y + 1 {
            self.handle_table_header_click(x);
            return;
        }
        let clicked = y.saturating_sub(area.y).saturating_sub(2) as usize;
        if clicked < self.visible_rows() {
            self.selected_row = clicked;
        }
    }

    fn handle_table_header_click(&mut self, x: u16) {
        let pos = x.saturating_sub(self.table_area.x + 1);
        match self.tab {
            Tab::Analytics => {
                if let Some(i) = column_at(&RECORD_WIDTHS, pos) {
                    self.record_view
                        .toggle_sort(RecordField::COLUMNS[i], &self.record_config);
                }
            }
            Tab::Components => {
                if let Some(i) = column_at(&COMPONENT_WIDTHS, pos)
                    && ComponentField::COLUMNS[i].is_sortable()
                {
                    self.component_view
                        .toggle_sort(ComponentField::COLUMNS[i], &self.component_config);
                }
            }
        }
    }

    fn visible_rows(&mut self) -> usize {
        match self.tab {
            Tab::Analytics => self.record_model().rows.len(),
            Tab::Components => self.component_model().rows.len(),
        }
    }

    // Getters for UI

    pub fn record_model(&mut self) -> RenderModel<&DataRecord, RecordField> {
        self.record_cache
            .render(&self.records, &self.record_view, &self.record_config)
    }

    pub fn component_model(&mut self) -> RenderModel<&ComponentMetric, ComponentField> {
        self.component_cache
            .render(&self.components, &self.component_view, &self.component_config)
    }

    /// Pipeline recomputations so far, (records, components)
    pub fn recomputes(&self) -> (u64, u64) {
        (
            self.record_cache.recomputes(),
            self.component_cache.recomputes(),
        )
    }

    /// Heatmap cells for the current chart selection. Regenerated only when
    /// the category changes.
    pub fn heatmap_cells(&mut self) -> &[HeatCell] {
        let stale = self
            .heatmap
            .as_ref()
            .is_none_or(|(state, _)| state.category != self.chart.category);
        if stale {
            let selected = viz::select(self.records.records(), self.chart.category);
            let cells = viz::heatmap(&mut self.chart_rng, &selected);
            self.heatmap = Some((self.chart, cells));
        }
        self.heatmap
            .as_ref()
            .map_or(&[][..], |(_, cells)| cells.as_slice())
    }

    pub fn records(&self) -> &[DataRecord] {
        self.records.records()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.simulator.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn history(&self, component_id: &str) -> Option<&VecDeque<f64>> {
        self.simulator.as_ref()?.history(component_id)
    }

    pub fn ticks(&self) -> u64 {
        self.simulator.as_ref().map_or(0, LiveSimulator::ticks)
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn error_logs(&self) -> &[ErrorLog] {
        &self.error_logs
    }

    pub fn key_metrics(&self) -> &[KeyMetric] {
        &self.key_metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Set the table area for mouse click detection
    pub fn set_table_area(&mut self, area: Rect) {
        self.table_area = area;
    }
}

fn next_field<F: Copy + Eq>(fields: &[F], current: F) -> F {
    fields
        .iter()
        .position(|f| *f == current)
        .and_then(|i| fields.get(i + 1))
        .or_else(|| fields.first())
        .copied()
        .unwrap_or(current)
}

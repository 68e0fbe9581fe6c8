// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A thin shell (ratatui + crossterm) over [`Tracker`]: every status change is sent as an
//! [`UpdateIntent`] and nothing here touches the progress store directly.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap,
    },
};

use crate::model::{Node, ProgressStatus, Roadmap};
use crate::query;
use crate::store::ProgressSink;
use crate::tracker::{ApplyOutcome, Tracker, UpdateIntent};

mod theme;
mod viewport;

use theme::{status_glyph, TuiTheme};
use viewport::Viewport;

const TOAST_TTL: Duration = Duration::from_secs(3);
const CANVAS_LABEL_MAX_CHARS: usize = 18;
const FOOTER_KEY_COLOR: Color = Color::Cyan;

/// Runs the interactive terminal UI until the user quits.
pub fn run<S: ProgressSink>(tracker: Tracker<S>) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(tracker);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    tracing::info!("tui closed");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Home,
    /// Index into the catalog's roadmaps.
    Roadmap(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Inactive,
    Editing,
    Results,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    is_error: bool,
    expires_at: Instant,
}

struct App<S> {
    tracker: Tracker<S>,
    theme: TuiTheme,
    view: View,
    home_state: ListState,
    node_state: ListState,
    /// Indices into the open roadmap's nodes, in list order.
    visible_nodes: Vec<usize>,
    viewport: Viewport,
    search_mode: SearchMode,
    search_query: String,
    show_detail: bool,
    detail_scroll: u16,
    reset_armed: bool,
    toast: Option<Toast>,
    should_quit: bool,
}

impl<S: ProgressSink> App<S> {
    fn new(mut tracker: Tracker<S>) -> Self {
        let mut home_state = ListState::default();
        if !tracker.catalog().roadmaps().is_empty() {
            home_state.select(Some(0));
        }
        let startup_error = tracker.take_persist_error();

        let mut app = Self {
            tracker,
            theme: TuiTheme::default(),
            view: View::Home,
            home_state,
            node_state: ListState::default(),
            visible_nodes: Vec::new(),
            viewport: Viewport::default(),
            search_mode: SearchMode::Inactive,
            search_query: String::new(),
            show_detail: false,
            detail_scroll: 0,
            reset_armed: false,
            toast: None,
            should_quit: false,
        };
        if let Some(err) = startup_error {
            app.set_error_toast(format!("Progress not saved: {err}"));
        }
        app
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.search_mode == SearchMode::Editing {
            self.handle_search_edit_key(code);
            return false;
        }

        if code != KeyCode::Char('r') {
            self.reset_armed = false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('t') => self.toggle_theme(),
            _ => match self.view {
                View::Home => self.handle_home_key(code),
                View::Roadmap(_) if self.show_detail => self.handle_detail_key(code),
                View::Roadmap(_) => self.handle_roadmap_key(code),
            },
        }
        false
    }

    fn handle_home_key(&mut self, code: KeyCode) {
        let count = self.tracker.catalog().roadmaps().len();
        match code {
            KeyCode::Down | KeyCode::Char('j') => step_selection(&mut self.home_state, count, 1),
            KeyCode::Up | KeyCode::Char('k') => step_selection(&mut self.home_state, count, -1),
            KeyCode::Enter => {
                if let Some(idx) = self.home_state.selected() {
                    self.open_roadmap(idx);
                }
            }
            _ => {}
        }
    }

    fn handle_roadmap_key(&mut self, code: KeyCode) {
        let count = self.visible_nodes.len();
        match code {
            KeyCode::Esc => {
                if self.search_mode == SearchMode::Results {
                    self.clear_search();
                } else {
                    self.go_home();
                }
            }
            KeyCode::Tab | KeyCode::Char(']') => step_selection(&mut self.node_state, count, 1),
            KeyCode::BackTab | KeyCode::Char('[') => {
                step_selection(&mut self.node_state, count, -1)
            }
            KeyCode::Left | KeyCode::Char('h') => self.viewport.pan(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.viewport.pan(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.viewport.pan(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.viewport.pan(0, 1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.viewport.zoom_in(),
            KeyCode::Char('-') => self.viewport.zoom_out(),
            KeyCode::Char('0') => self.reset_viewport(),
            KeyCode::Char('c') => self.center_on_selected(),
            KeyCode::Char('/') => self.enter_search(),
            KeyCode::Char('r') => self.arm_or_reset(),
            KeyCode::Enter => {
                if self.selected_node().is_some() {
                    self.show_detail = true;
                    self.detail_scroll = 0;
                }
            }
            code => self.handle_status_key(code),
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.show_detail = false,
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1)
            }
            code => self.handle_status_key(code),
        }
    }

    fn handle_status_key(&mut self, code: KeyCode) {
        let status = match code {
            KeyCode::Char(ch @ '1'..='4') => {
                let idx = ch as usize - '1' as usize;
                ProgressStatus::ALL[idx]
            }
            KeyCode::Char(' ') => match self.selected_status() {
                Some(status) => status.cycle(),
                None => return,
            },
            _ => return,
        };
        self.set_selected_status(status);
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => {
                self.search_mode = if self.search_query.trim().is_empty() {
                    SearchMode::Inactive
                } else {
                    SearchMode::Results
                };
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.refresh_visible_nodes();
            }
            KeyCode::Char(ch) => {
                self.search_query.push(ch);
                self.refresh_visible_nodes();
            }
            _ => {}
        }
    }

    fn open_roadmap(&mut self, idx: usize) {
        let Some(roadmap) = self.tracker.catalog().roadmaps().get(idx) else {
            return;
        };
        tracing::debug!(roadmap_id = %roadmap.id(), "open roadmap");
        self.viewport = Viewport::fit(roadmap);
        self.view = View::Roadmap(idx);
        self.show_detail = false;
        self.search_mode = SearchMode::Inactive;
        self.search_query.clear();
        self.refresh_visible_nodes();
    }

    fn go_home(&mut self) {
        self.view = View::Home;
        self.show_detail = false;
        self.search_mode = SearchMode::Inactive;
        self.search_query.clear();
        self.visible_nodes.clear();
        self.node_state.select(None);
    }

    fn enter_search(&mut self) {
        self.search_mode = SearchMode::Editing;
        self.search_query.clear();
        self.refresh_visible_nodes();
    }

    fn clear_search(&mut self) {
        self.search_mode = SearchMode::Inactive;
        self.search_query.clear();
        self.refresh_visible_nodes();
    }

    /// Recomputes the node list for the current query, keeping the selected node when it
    /// still matches.
    fn refresh_visible_nodes(&mut self) {
        let previous = self.selected_node_index();
        self.visible_nodes = match self.current_roadmap() {
            Some(roadmap) => query::search_nodes(roadmap, &self.search_query),
            None => Vec::new(),
        };

        let selected = previous
            .and_then(|node_idx| self.visible_nodes.iter().position(|idx| *idx == node_idx))
            .or_else(|| (!self.visible_nodes.is_empty()).then_some(0));
        if self.search_mode != SearchMode::Inactive && !self.search_query.trim().is_empty() {
            // While searching the best match leads.
            self.node_state.select((!self.visible_nodes.is_empty()).then_some(0));
        } else {
            self.node_state.select(selected);
        }
    }

    fn toggle_theme(&mut self) {
        self.theme.toggle();
        self.set_toast(if self.theme.is_dark() { "Dark mode" } else { "Light mode" });
    }

    fn reset_viewport(&mut self) {
        if let Some(roadmap) = self.current_roadmap() {
            self.viewport = Viewport::fit(roadmap);
        }
    }

    fn center_on_selected(&mut self) {
        if let Some(position) = self.selected_node().map(Node::position) {
            self.viewport.center_on(position.x, position.y);
        }
    }

    fn arm_or_reset(&mut self) {
        let Some(roadmap_id) = self.current_roadmap().map(|roadmap| roadmap.id().to_string())
        else {
            return;
        };
        if !self.reset_armed {
            self.reset_armed = true;
            self.set_toast("Press r again to reset this roadmap");
            return;
        }

        self.reset_armed = false;
        match self.tracker.reset_roadmap(&roadmap_id) {
            ApplyOutcome::Persisted => self.set_toast("Roadmap progress reset"),
            ApplyOutcome::PersistFailed => self.report_persist_failure(),
        }
    }

    fn set_selected_status(&mut self, status: ProgressStatus) {
        let Some((roadmap_id, node_id, title)) = self.current_roadmap().and_then(|roadmap| {
            let node = self.selected_node()?;
            Some((roadmap.id().to_string(), node.id().to_string(), node.title().to_owned()))
        }) else {
            return;
        };

        match self.tracker.apply(UpdateIntent::new(roadmap_id, node_id, status)) {
            ApplyOutcome::Persisted => self.set_toast(format!("{title}: {}", status.label())),
            ApplyOutcome::PersistFailed => self.report_persist_failure(),
        }
    }

    fn report_persist_failure(&mut self) {
        let detail = self
            .tracker
            .take_persist_error()
            .unwrap_or_else(|| "unknown error".to_owned());
        self.set_error_toast(format!("Progress not saved: {detail}"));
    }

    fn current_roadmap(&self) -> Option<&Roadmap> {
        match self.view {
            View::Home => None,
            View::Roadmap(idx) => self.tracker.catalog().roadmaps().get(idx),
        }
    }

    fn selected_node_index(&self) -> Option<usize> {
        let list_idx = self.node_state.selected()?;
        self.visible_nodes.get(list_idx).copied()
    }

    fn selected_node(&self) -> Option<&Node> {
        let node_idx = self.selected_node_index()?;
        self.current_roadmap()?.nodes().get(node_idx)
    }

    fn selected_status(&self) -> Option<ProgressStatus> {
        let roadmap = self.current_roadmap()?;
        let node = self.selected_node()?;
        Some(self.tracker.status(roadmap.id().as_str(), node.id().as_str()))
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: false,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn set_error_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: true,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

fn step_selection(state: &mut ListState, count: usize, delta: isize) {
    if count == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0).min(count - 1);
    let next = (current as isize + delta).rem_euclid(count as isize) as usize;
    state.select(Some(next));
}

fn draw<S: ProgressSink>(frame: &mut Frame<'_>, app: &mut App<S>) {
    let area = frame.size();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    match app.view {
        View::Home => draw_home(frame, app, main_area),
        View::Roadmap(_) => draw_roadmap(frame, app, main_area),
    }

    let toast = match &app.toast {
        Some(toast) if toast.expires_at > Instant::now() => Some(toast.clone()),
        Some(_) => {
            app.toast = None;
            None
        }
        None => None,
    };

    if app.search_mode == SearchMode::Editing {
        let line = search_footer_line(app);
        frame.render_widget(Paragraph::new(line).style(app.theme.base_style()), status_area);
        let cursor_x = status_area
            .x
            .saturating_add(1)
            .saturating_add(app.search_query.chars().count() as u16)
            .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
        frame.set_cursor(cursor_x, status_area.y);
    } else {
        let line = footer_help_line(app, toast.as_ref());
        frame.render_widget(Paragraph::new(line).style(app.theme.base_style()), status_area);
    }

    if app.show_detail {
        draw_detail(frame, app, main_area);
    }
}

fn draw_home<S: ProgressSink>(frame: &mut Frame<'_>, app: &mut App<S>, area: Rect) {
    let theme = app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Trailmap", theme.base_style().add_modifier(Modifier::BOLD)),
        Span::styled("  pick a roadmap to track", theme.muted_style()),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(theme.muted_style()));
    frame.render_widget(header, rows[0]);

    let items = app
        .tracker
        .catalog()
        .roadmaps()
        .iter()
        .map(|roadmap| {
            let stats = app.tracker.stats(roadmap.id().as_str());
            let mut lines = vec![Line::from(vec![
                Span::raw(format!("{} ", roadmap.icon())),
                Span::styled(
                    roadmap.title().to_owned(),
                    theme.roadmap_title_style(roadmap.color()),
                ),
            ])];
            if !roadmap.description().is_empty() {
                let description = format!("   {}", roadmap.description());
                lines.push(Line::styled(description, theme.muted_style()));
            }
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {} ", progress_bar(stats.percentage, 20)),
                    theme.roadmap_gauge_style(roadmap.color()),
                ),
                Span::raw(format!(
                    "{}%  {}/{} topics  {} learning",
                    stats.percentage, stats.completed, stats.total, stats.learning
                )),
            ]));
            lines.push(Line::raw(""));
            ListItem::new(lines)
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border_style(true))
                .title(" Roadmaps "),
        )
        .highlight_style(theme.selection_style());
    frame.render_stateful_widget(list, rows[1], &mut app.home_state);

    let selected = app
        .home_state
        .selected()
        .and_then(|idx| app.tracker.catalog().roadmaps().get(idx));
    if let Some(roadmap) = selected {
        let stats = app.tracker.stats(roadmap.id().as_str());
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.muted_style())
                    .title(format!(" {} ", roadmap.title())),
            )
            .gauge_style(theme.roadmap_gauge_style(roadmap.color()))
            .ratio(f64::from(stats.percentage) / 100.0)
            .label(format!("{}%  {}/{} topics", stats.percentage, stats.completed, stats.total));
        frame.render_widget(gauge, rows[2]);
    }
}

fn draw_roadmap<S: ProgressSink>(frame: &mut Frame<'_>, app: &mut App<S>, area: Rect) {
    let theme = app.theme;
    let Some(roadmap) = app.current_roadmap() else {
        return;
    };
    let roadmap_id = roadmap.id().as_str();
    let stats = app.tracker.stats(roadmap_id);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[1]);

    let header = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.muted_style())
                .title(format!(" {} {} Roadmap ", roadmap.icon(), roadmap.title())),
        )
        .gauge_style(theme.roadmap_gauge_style(roadmap.color()))
        .ratio(f64::from(stats.percentage) / 100.0)
        .label(format!(
            "{}% Complete  {}/{} topics  {} learning",
            stats.percentage, stats.completed, stats.total, stats.learning
        ));
    frame.render_widget(header, rows[0]);

    let canvas = roadmap_canvas(app, roadmap, panes[0]);
    frame.render_widget(canvas, panes[0]);

    let items = app
        .visible_nodes
        .iter()
        .filter_map(|idx| roadmap.nodes().get(*idx))
        .map(|node| {
            let status = app.tracker.status(roadmap_id, node.id().as_str());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", status_glyph(status)), theme.status_style(status)),
                Span::raw(node.title().to_owned()),
            ]))
        })
        .collect::<Vec<_>>();
    let list_title = match app.search_mode {
        SearchMode::Inactive => format!(" Topics ({}) ", roadmap.nodes().len()),
        SearchMode::Editing | SearchMode::Results => format!(
            " Topics {}/{} /{} ",
            app.visible_nodes.len(),
            roadmap.nodes().len(),
            app.search_query
        ),
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border_style(!app.show_detail))
                .title(list_title),
        )
        .highlight_style(theme.selection_style());

    frame.render_stateful_widget(list, panes[1], &mut app.node_state);
}

fn roadmap_canvas<'a, S: ProgressSink>(
    app: &'a App<S>,
    roadmap: &'a Roadmap,
    area: Rect,
) -> Canvas<'a, impl Fn(&mut ratatui::widgets::canvas::Context<'_>) + 'a> {
    let theme = app.theme;
    let roadmap_id = roadmap.id().as_str();
    let x_bounds = app.viewport.x_bounds();
    let y_bounds = app.viewport.y_bounds();
    let inner_width = f64::from(area.width.saturating_sub(2).max(1));
    let units_per_cell = (x_bounds[1] - x_bounds[0]) / inner_width;
    let selected = app.selected_node_index();
    let searching = app.search_mode != SearchMode::Inactive && !app.search_query.trim().is_empty();

    let edge_color = theme.edge_color();
    let edges = roadmap
        .connections()
        .iter()
        .filter_map(|connection| {
            let from = roadmap.node(connection.from.as_str())?.position();
            let to = roadmap.node(connection.to.as_str())?.position();
            Some(CanvasLine {
                x1: from.x,
                y1: -from.y,
                x2: to.x,
                y2: -to.y,
                color: edge_color,
            })
        })
        .collect::<Vec<_>>();

    let labels = roadmap
        .nodes()
        .iter()
        .enumerate()
        .filter(|(idx, _)| !searching || app.visible_nodes.contains(idx))
        .map(|(idx, node)| {
            let status = app.tracker.status(roadmap_id, node.id().as_str());
            let text = format!("{} {}", status_glyph(status), truncate_label(node.title()));
            let mut style = theme.status_style(status);
            if selected == Some(idx) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            let half_width = text.chars().count() as f64 * units_per_cell / 2.0;
            let position = node.position();
            (position.x - half_width, -position.y, text, style)
        })
        .collect::<Vec<_>>();

    Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border_style(false))
                .title(format!(" Map  zoom {:.0}% ", app.viewport.zoom() * 100.0)),
        )
        .background_color(theme.base_style().bg.unwrap_or(Color::Reset))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            for edge in &edges {
                ctx.draw(edge);
            }
            ctx.layer();
            for (x, y, text, style) in &labels {
                ctx.print(*x, *y, Span::styled(text.clone(), *style));
            }
        })
}

fn truncate_label(title: &str) -> String {
    if title.chars().count() > CANVAS_LABEL_MAX_CHARS {
        let head = title.chars().take(CANVAS_LABEL_MAX_CHARS).collect::<String>();
        format!("{head}...")
    } else {
        title.to_owned()
    }
}

fn progress_bar(percentage: u8, width: usize) -> String {
    let filled = usize::from(percentage.min(100)) * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

// Popup, footer, and layout helpers.
include!("chrome.rs");

#[cfg(test)]
mod tests;

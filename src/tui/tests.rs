// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use rstest::{fixture, rstest};

use super::{detail_lines, draw, progress_bar, truncate_label, App, SearchMode, View};
use crate::catalog::builtin_catalog;
use crate::model::ProgressStatus;
use crate::progress::ProgressStore;
use crate::store::{MemorySink, ProgressSink, StoreError};
use crate::tracker::Tracker;

#[fixture]
fn app() -> App<MemorySink> {
    App::new(Tracker::open(builtin_catalog(), None, MemorySink::new()))
}

fn press(app: &mut App<impl ProgressSink>, keys: &[KeyCode]) {
    for key in keys {
        if app.handle_key_code(*key) {
            app.should_quit = true;
        }
    }
}

fn type_text(app: &mut App<impl ProgressSink>, text: &str) {
    for ch in text.chars() {
        app.handle_key_code(KeyCode::Char(ch));
    }
}

fn selected_node_id(app: &App<impl ProgressSink>) -> Option<String> {
    app.selected_node().map(|node| node.id().to_string())
}

fn render_to_string(app: &mut App<impl ProgressSink>, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

fn find_text(app: &mut App<impl ProgressSink>, text: &str) -> Option<ratatui::style::Color> {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    let wanted = text.chars().map(String::from).collect::<Vec<_>>();
    let width = buffer.area.width as usize;
    for y in 0..buffer.area.height {
        for x in 0..width.saturating_sub(wanted.len()) {
            let hit = wanted
                .iter()
                .enumerate()
                .all(|(offset, ch)| buffer.get((x + offset) as u16, y).symbol() == ch);
            if hit {
                return Some(buffer.get(x as u16, y).fg);
            }
        }
    }
    None
}

struct FailingSink {
    fail: Rc<Cell<bool>>,
}

impl ProgressSink for FailingSink {
    fn persist(&mut self, _store: &ProgressStore) -> Result<(), StoreError> {
        if self.fail.get() {
            Err(StoreError::Io {
                path: "progress.json".into(),
                source: std::io::Error::other("disk full"),
            })
        } else {
            Ok(())
        }
    }
}

#[rstest]
fn starts_on_home_with_first_roadmap_selected(app: App<MemorySink>) {
    assert_eq!(app.view, View::Home);
    assert_eq!(app.home_state.selected(), Some(0));
    assert!(app.toast.is_none());
}

#[rstest]
fn home_selection_wraps(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Up]);
    assert_eq!(app.home_state.selected(), Some(1));
    press(&mut app, &[KeyCode::Char('j')]);
    assert_eq!(app.home_state.selected(), Some(0));
}

#[rstest]
fn enter_opens_roadmap_and_esc_returns_home(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
    assert_eq!(app.view, View::Roadmap(1));
    assert_eq!(selected_node_id(&app).as_deref(), Some("photo-principles"));
    assert_eq!(app.visible_nodes.len(), 9);

    press(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.view, View::Home);
    assert!(app.selected_node().is_none());
}

#[rstest]
fn status_keys_issue_updates_that_persist(mut app: App<MemorySink>) {
    let writes_after_open = app.tracker.sink().writes();
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('3')]);

    assert_eq!(
        app.tracker.status("remote-sensing", "rs-fundamentals"),
        ProgressStatus::Completed
    );
    assert_eq!(app.tracker.sink().writes(), writes_after_open + 1);
    let persisted = ProgressStore::load(app.tracker.sink().blob());
    assert_eq!(
        persisted.get("remote-sensing", "rs-fundamentals"),
        Some(ProgressStatus::Completed)
    );
    assert!(app.toast.as_ref().is_some_and(|toast| !toast.is_error));
}

#[rstest]
fn space_cycles_the_selected_status(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter, KeyCode::Tab]);
    assert_eq!(selected_node_id(&app).as_deref(), Some("electromagnetic-spectrum"));

    press(&mut app, &[KeyCode::Char(' ')]);
    assert_eq!(
        app.tracker.status("remote-sensing", "electromagnetic-spectrum"),
        ProgressStatus::Learning
    );
    press(&mut app, &[KeyCode::Char(' '), KeyCode::Char(' '), KeyCode::Char(' ')]);
    assert_eq!(
        app.tracker.status("remote-sensing", "electromagnetic-spectrum"),
        ProgressStatus::NotStarted
    );
}

#[rstest]
fn search_filters_and_esc_restores_the_full_list(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('/')]);
    assert_eq!(app.search_mode, SearchMode::Editing);

    // `q` is text while editing, not quit.
    assert!(!app.handle_key_code(KeyCode::Char('q')));
    assert_eq!(app.search_query, "q");
    press(&mut app, &[KeyCode::Backspace]);

    type_text(&mut app, "spectrum");
    assert_eq!(selected_node_id(&app).as_deref(), Some("electromagnetic-spectrum"));

    press(&mut app, &[KeyCode::Enter]);
    assert_eq!(app.search_mode, SearchMode::Results);
    press(&mut app, &[KeyCode::Char('2')]);
    assert_eq!(
        app.tracker.status("remote-sensing", "electromagnetic-spectrum"),
        ProgressStatus::Learning
    );

    press(&mut app, &[KeyCode::Esc]);
    assert_eq!(app.search_mode, SearchMode::Inactive);
    assert_eq!(app.view, View::Roadmap(0));
    assert_eq!(app.visible_nodes.len(), 7);
    assert_eq!(selected_node_id(&app).as_deref(), Some("electromagnetic-spectrum"));
}

#[rstest]
fn backspace_widens_the_search(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('/')]);
    type_text(&mut app, "zzzz");
    assert!(app.visible_nodes.is_empty());
    assert!(app.selected_node().is_none());

    press(&mut app, &[KeyCode::Backspace; 4]);
    assert_eq!(app.visible_nodes.len(), 7);
}

#[rstest]
fn reset_needs_a_second_press(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('3'), KeyCode::Char('r')]);
    assert_eq!(
        app.tracker.status("remote-sensing", "rs-fundamentals"),
        ProgressStatus::Completed
    );

    // Any other key disarms.
    press(&mut app, &[KeyCode::Char('h'), KeyCode::Char('r')]);
    assert!(app.reset_armed);
    press(&mut app, &[KeyCode::Char('r')]);
    assert!(!app.reset_armed);
    assert_eq!(
        app.tracker.status("remote-sensing", "rs-fundamentals"),
        ProgressStatus::NotStarted
    );
    assert_eq!(app.tracker.stats("remote-sensing").completed, 0);
}

#[rstest]
fn zoom_and_pan_keys_drive_the_viewport(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter]);
    let fitted = app.viewport;

    press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('l')]);
    assert!(app.viewport.zoom() > 1.0);
    assert!(app.viewport.center().0 > fitted.center().0);

    press(&mut app, &[KeyCode::Char('0')]);
    assert_eq!(app.viewport, fitted);
}

#[rstest]
fn detail_popup_lists_resolved_prerequisites(mut app: App<MemorySink>) {
    // satellite-systems is the third topic and depends on electromagnetic-spectrum.
    press(&mut app, &[KeyCode::Enter, KeyCode::Tab, KeyCode::Tab, KeyCode::Enter]);
    assert!(app.show_detail);

    let text = detail_lines(&app)
        .expect("detail")
        .iter()
        .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(text.contains("Prerequisites"));
    assert!(text.contains("• Electromagnetic Spectrum"));

    // Status keys still work inside the popup; Esc only closes it.
    press(&mut app, &[KeyCode::Char('4'), KeyCode::Esc]);
    assert!(!app.show_detail);
    assert_eq!(app.view, View::Roadmap(0));
    assert_eq!(
        app.tracker.status("remote-sensing", "satellite-systems"),
        ProgressStatus::Skipped
    );
}

#[rstest]
fn theme_toggles_and_q_quits(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Char('t')]);
    assert!(app.theme.is_dark());
    press(&mut app, &[KeyCode::Char('t')]);
    assert!(!app.theme.is_dark());

    assert!(app.handle_key_code(KeyCode::Char('q')));
}

#[test]
fn persistence_failure_shows_an_error_toast_and_keeps_state() {
    let fail = Rc::new(Cell::new(false));
    let tracker = Tracker::open(builtin_catalog(), None, FailingSink { fail: fail.clone() });
    let mut app = App::new(tracker);

    fail.set(true);
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('2')]);

    let toast = app.toast.as_ref().expect("toast");
    assert!(toast.is_error);
    assert!(toast.message.contains("disk full"), "{}", toast.message);
    assert_eq!(
        app.tracker.status("remote-sensing", "rs-fundamentals"),
        ProgressStatus::Learning
    );
    assert!(app.tracker.last_persist_error().is_none());
}

#[test]
fn startup_persistence_failure_is_reported() {
    let fail = Rc::new(Cell::new(true));
    let tracker = Tracker::open(builtin_catalog(), None, FailingSink { fail });
    let app = App::new(tracker);

    assert!(app.toast.as_ref().is_some_and(|toast| toast.is_error));
}

#[rstest]
fn home_view_renders_roadmaps_and_stats(mut app: App<MemorySink>) {
    let screen = render_to_string(&mut app, 100, 30);
    assert!(screen.contains("Remote Sensing"));
    assert!(screen.contains("Photogrammetry"));
    assert!(screen.contains("0/7 topics"));
}

#[rstest]
fn home_list_tints_roadmaps_with_their_catalog_color(mut app: App<MemorySink>) {
    // Photogrammetry is not selected, so its title keeps the catalog tint.
    assert_eq!(find_text(&mut app, "Photogrammetry"), Some(ratatui::style::Color::Magenta));
}

#[rstest]
fn roadmap_view_renders_canvas_and_topic_list(mut app: App<MemorySink>) {
    press(&mut app, &[KeyCode::Enter, KeyCode::Char('3')]);
    let screen = render_to_string(&mut app, 120, 40);

    assert!(screen.contains("Remote Sensing Roadmap"));
    assert!(screen.contains("14% Complete"));
    assert!(screen.contains("Topics (7)"));
    assert!(screen.contains("Change Detection"));
}

#[test]
fn labels_and_bars_are_bounded() {
    assert_eq!(truncate_label("Short"), "Short");
    assert_eq!(truncate_label("Fundamentals of Remote Sensing"), "Fundamentals of Re...");
    assert_eq!(progress_bar(0, 4), "░░░░");
    assert_eq!(progress_bar(50, 4), "██░░");
    assert_eq!(progress_bar(100, 4), "████");
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Trailmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Footer, detail popup, and layout helpers used by TUI rendering.
fn footer_help_line<S: ProgressSink>(app: &App<S>, toast: Option<&Toast>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match app.view {
        View::Home => {
            push_footer_entry(&mut spans, "MOVE", "j/k");
            push_footer_entry(&mut spans, "OPEN", "enter");
        }
        View::Roadmap(_) if app.show_detail => {
            push_footer_entry(&mut spans, "STATUS", "1-4/space");
            push_footer_entry(&mut spans, "SCROLL", "j/k");
            push_footer_entry(&mut spans, "CLOSE", "esc");
        }
        View::Roadmap(_) => {
            push_footer_entry(&mut spans, "TOPIC", "tab/[]");
            push_footer_entry(&mut spans, "STATUS", "1-4/space");
            push_footer_entry(&mut spans, "PAN", "hjkl");
            push_footer_entry(&mut spans, "ZOOM", "+/-/0");
            push_footer_entry(&mut spans, "DETAIL", "enter");
            push_footer_entry(&mut spans, "SEARCH", "/");
            push_footer_entry(&mut spans, "RESET", "r");
            push_footer_entry(&mut spans, "BACK", "esc");
        }
    }
    push_footer_entry(&mut spans, "THEME", "t");
    push_footer_entry(&mut spans, "QUIT", "q");

    if let Some(toast) = toast {
        let style = if toast.is_error {
            app.theme.error_style().add_modifier(Modifier::BOLD)
        } else {
            app.theme.muted_style()
        };
        spans.push(Span::styled(format!(" {}", toast.message), style));
    }

    Line::from(spans)
}

fn search_footer_line<S: ProgressSink>(app: &App<S>) -> Line<'static> {
    Line::from(vec![
        Span::styled("/", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::raw(app.search_query.clone()),
        Span::styled(
            format!("   {} matches  enter keep  esc clear", app.visible_nodes.len()),
            app.theme.muted_style(),
        ),
    ])
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, key: &str) {
    spans.push(Span::raw(format!("{label} ")));
    spans.push(Span::styled(key.to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
    spans.push(Span::raw(" | "));
}

fn draw_detail<S: ProgressSink>(frame: &mut Frame<'_>, app: &App<S>, area: Rect) {
    let Some(lines) = detail_lines(app) else {
        return;
    };
    let title = app
        .selected_node()
        .map(|node| format!(" {} ", node.title()))
        .unwrap_or_default();

    let popup_area = centered_rect(area, 70, 80);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(lines)
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_style(true))
                .title(title),
        );
    frame.render_widget(popup, popup_area);
}

fn detail_lines<S: ProgressSink>(app: &App<S>) -> Option<Vec<Line<'static>>> {
    let roadmap = app.current_roadmap()?;
    let node = app.selected_node()?;
    let theme = app.theme;
    let roadmap_id = roadmap.id().as_str();
    let status = app.tracker.status(roadmap_id, node.id().as_str());
    let heading = theme.base_style().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(node.difficulty().as_str(), theme.difficulty_style(node.difficulty())),
            Span::styled(format!("  {}", node.category()), theme.muted_style()),
            Span::styled(format!("  ⏱ {}", node.estimated_time()), theme.muted_style()),
        ]),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(
                format!("{} {}", status_glyph(status), status.label()),
                theme.status_style(status),
            ),
        ]),
        Line::raw(""),
        Line::styled("Description", heading),
        Line::raw(node.description().to_owned()),
    ];

    let prerequisites = query::prerequisite_titles(app.tracker.catalog(), roadmap_id, node);
    if !prerequisites.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Prerequisites", heading));
        for title in prerequisites {
            lines.push(Line::raw(format!("  • {title}")));
        }
    }

    let groups = query::resource_groups(node);
    if !groups.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Learning Resources", heading));
        for (kind, resources) in groups {
            let label = kind.map_or("Other", |kind| kind.as_str());
            lines.push(Line::styled(format!("  {label}"), theme.muted_style()));
            for resource in resources {
                let mut entry = format!("    • {}", resource.title);
                if let Some(author) = &resource.author {
                    entry.push_str(&format!(" by {author}"));
                }
                if resource.is_free == Some(true) {
                    entry.push_str(" (free)");
                }
                lines.push(Line::raw(entry));
                if let Some(url) = &resource.url {
                    lines.push(Line::styled(format!("      {url}"), theme.muted_style()));
                }
            }
        }
    }

    Some(lines)
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

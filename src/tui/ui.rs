// Top-level frame layout: title bar, active view, status bar, toast

use crate::logging::LogLevel;
use crate::tui::app::{App, View};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    draw_title(f, app, chunks[0]);

    let theme = app.theme.clone();
    match app.view {
        View::Feed => app.feed.draw(f, chunks[1], &theme, true),
        View::Gallery => app.gallery.draw(f, chunks[1], &theme, true),
    }

    draw_status(f, app, chunks[2]);

    if let Some(toast) = &app.toast {
        toast.render(f, area, &app.theme);
    }
}

fn draw_title(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let tab = |view: View| {
        if app.view == view {
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        }
    };

    let line = Line::from(vec![
        Span::styled(
            " dashkit ",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(app.theme.border)),
        Span::styled("F1 Feed", tab(View::Feed)),
        Span::raw("  "),
        Span::styled("F2 Gallery", tab(View::Gallery)),
        Span::styled(
            format!("  ({})", app.theme.name),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_status(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.focus_hint()),
            Style::default().fg(app.theme.status_bar),
        ),
        Span::styled("│ Tab:view  t:theme  q:quit", Style::default().fg(app.theme.muted)),
    ];

    // The newest warning or error, so problems surface without a log panel
    if let Some(entry) = app.log_buffer.latest_at_least(LogLevel::Warn) {
        spans.push(Span::styled(
            format!("  {} {}", entry.level.as_str(), entry.message),
            Style::default().fg(app.theme.accent_system),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

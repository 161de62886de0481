// Chat entry rendering - renderable tree to styled terminal lines
//
// The feed stacks entries as flat line lists so one ScrollState can own the
// whole conversation. Media leaves render as framed placeholders at their
// styled height; containers stack their children.

use crate::theme::Theme;
use crate::tui::markdown;
use crate::widgets::chat::message::ChatMessage;
use crate::widgets::chat::renderable::Renderable;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

const BODY_INDENT: &str = "   ";

/// Render a full entry to lines: header, body, reactions, timestamp.
pub fn entry_lines(entry: &ChatMessage, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let body_width = width.saturating_sub(BODY_INDENT.len()).max(8);

    if entry.show_user || entry.show_avatar {
        let mut spans = Vec::new();
        if entry.show_avatar {
            spans.push(Span::raw(format!("{} ", entry.avatar())));
        }
        if entry.show_user {
            spans.push(Span::styled(
                entry.user().to_string(),
                Style::default()
                    .fg(role_color(entry.user(), theme))
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if entry.copy_text().is_some() {
            spans.push(Span::styled(
                "  ⧉",
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::from(spans));
    }

    for body_line in renderable_lines(entry.rendered(), body_width, theme) {
        lines.push(indent(body_line));
    }

    if entry.show_reaction_icons && !entry.reactions().is_empty() {
        let glyphs = entry.reaction_glyphs().join(" ");
        lines.push(indent(Line::from(Span::styled(
            glyphs,
            Style::default().fg(theme.reaction),
        ))));
    }

    if entry.show_timestamp {
        lines.push(indent(Line::from(Span::styled(
            entry.timestamp_label(),
            Style::default().fg(theme.muted),
        ))));
    }

    lines.push(Line::from(""));
    lines
}

/// Render one renderable node to lines.
pub fn renderable_lines(node: &Renderable, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    match node {
        Renderable::Column { children, .. } | Renderable::Row { children, .. } => {
            let mut lines = Vec::new();
            for child in children {
                lines.extend(renderable_lines(child, width, theme));
            }
            lines
        }
        Renderable::Text {
            text,
            markdown: true,
            ..
        } => markdown::render_markdown(text, width, theme),
        Renderable::Text { text, .. } => text
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(theme.foreground),
                ))
            })
            .collect(),
        Renderable::Image { data, name, style } => media_box(
            "🖼",
            &format!("{name} ({})", human_size(data.len())),
            style.height,
            width,
            theme,
        ),
        Renderable::Audio { path, name, style } => media_box(
            "🔊",
            &format!("{name} → {}", path.display()),
            style.height.map(|h| h.min(3)),
            width,
            theme,
        ),
        Renderable::Video { data, name, style } => media_box(
            "🎬",
            &format!("{name} ({})", human_size(data.len())),
            style.height,
            width,
            theme,
        ),
        Renderable::Document { data, name, style } => media_box(
            "📑",
            &format!("{name} ({}, embedded)", human_size(data.len())),
            style.height.map(|h| h.min(3)),
            width,
            theme,
        ),
        Renderable::Table { headers, rows, .. } => table_lines(headers, rows, width, theme),
    }
}

/// Human-readable byte size, e.g. `42 B`, `1.5 KB`, `3.0 MB`.
fn human_size(bytes: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

fn indent(line: Line<'static>) -> Line<'static> {
    if line.spans.is_empty() {
        return line;
    }
    let mut spans = vec![Span::raw(BODY_INDENT)];
    spans.extend(line.spans);
    Line::from(spans)
}

/// Accent color by conversational role
fn role_color(user: &str, theme: &Theme) -> ratatui::style::Color {
    match crate::widgets::chat::avatar::normalize(user).as_str() {
        "user" | "human" | "person" | "client" | "customer" => theme.accent_user,
        "system" | "error" | "exception" => theme.accent_system,
        _ => theme.accent_assistant,
    }
}

/// Framed placeholder for media we cannot draw in cells.
///
/// Honors the node's styled height; the label sits on the middle row.
fn media_box(
    icon: &str,
    label: &str,
    height: Option<u16>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let height = height.unwrap_or(3).max(3) as usize;
    let inner_width = width.saturating_sub(2).max(8);
    let border = Style::default().fg(theme.border);
    let text = Style::default().fg(theme.foreground);

    let mut label_text = format!("{icon} {label}");
    if label_text.width() > inner_width {
        let mut truncated = String::new();
        for c in label_text.chars() {
            if truncated.width() + 1 >= inner_width {
                break;
            }
            truncated.push(c);
        }
        truncated.push('…');
        label_text = truncated;
    }

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("┌{}┐", "─".repeat(inner_width)),
        border,
    )));
    for row in 0..height.saturating_sub(2) {
        if row == height.saturating_sub(2) / 2 {
            let pad = inner_width.saturating_sub(label_text.width());
            let left = pad / 2;
            lines.push(Line::from(vec![
                Span::styled("│", border),
                Span::raw(" ".repeat(left)),
                Span::styled(label_text.clone(), text),
                Span::raw(" ".repeat(pad - left)),
                Span::styled("│", border),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("│", border),
                Span::raw(" ".repeat(inner_width)),
                Span::styled("│", border),
            ]));
        }
    }
    lines.push(Line::from(Span::styled(
        format!("└{}┘", "─".repeat(inner_width)),
        border,
    )));
    lines
}

/// Fixed-width table: padded columns, header rule, width-truncated cells
fn table_lines(
    headers: &[String],
    rows: &[Vec<String>],
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let columns = headers.len().max(1);
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    widths.resize(columns, 0);
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let pad_row = |cells: &[String], style: Style| -> Line<'static> {
        let mut text = String::new();
        for (i, &cell_width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            text.push_str(&format!("{cell:<cell_width$}  "));
        }
        let mut truncated = String::new();
        for c in text.trim_end().chars() {
            if truncated.width() >= width {
                break;
            }
            truncated.push(c);
        }
        Line::from(Span::styled(truncated, style))
    };

    let mut lines = Vec::new();
    lines.push(pad_row(
        headers,
        Style::default()
            .fg(theme.heading)
            .add_modifier(Modifier::BOLD),
    ));
    let rule_width = (widths.iter().sum::<usize>() + 2 * columns).min(width);
    lines.push(Line::from(Span::styled(
        "─".repeat(rule_width),
        Style::default().fg(theme.border),
    )));
    for row in rows {
        lines.push(pad_row(row, Style::default().fg(theme.foreground)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::chat::content::{FileInput, Value};
    use bytes::Bytes;

    fn flat(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_entry_lines_include_header_body_timestamp() {
        let entry = ChatMessage::new("hello there").with_user("Assistant");
        let lines = flat(&entry_lines(&entry, 60, &Theme::dusk()));

        assert!(lines[0].contains("🤖"));
        assert!(lines[0].contains("Assistant"));
        assert!(lines.iter().any(|l| l.contains("hello there")));
        // Timestamp footer present in %H:%M shape
        assert!(lines
            .iter()
            .any(|l| l.trim().len() == 5 && l.trim().contains(':')));
    }

    #[test]
    fn test_visibility_flags_hide_chrome() {
        let mut entry = ChatMessage::new("body").with_user("Assistant");
        entry.show_avatar = false;
        entry.show_user = false;
        entry.show_timestamp = false;
        let lines = flat(&entry_lines(&entry, 60, &Theme::dusk()));

        assert!(!lines.iter().any(|l| l.contains("Assistant")));
        assert!(!lines.iter().any(|l| l.contains("🤖")));
    }

    #[test]
    fn test_table_rendering_has_header_rule() {
        let csv = Value::File(FileInput::new(
            Bytes::from_static(b"name,score\nAda,10"),
            "t.csv",
            "text/csv",
        ));
        let entry = ChatMessage::new(csv);
        let lines = flat(&entry_lines(&entry, 60, &Theme::dusk()));

        assert!(lines.iter().any(|l| l.contains("name") && l.contains("score")));
        assert!(lines.iter().any(|l| l.contains("─")));
        assert!(lines.iter().any(|l| l.contains("Ada")));
    }

    #[test]
    fn test_media_box_honors_height() {
        let lines = media_box("🖼", "pic.png", Some(6), 40, &Theme::dusk());
        assert_eq!(lines.len(), 6);
        let text = flat(&lines);
        assert!(text[0].starts_with('┌'));
        assert!(text[5].starts_with('└'));
        assert!(text.iter().any(|l| l.contains("pic.png")));
    }

    #[test]
    fn test_reactions_render_as_glyphs() {
        let mut entry = ChatMessage::new("hi");
        entry.toggle_reaction("favorite");
        let lines = flat(&entry_lines(&entry, 60, &Theme::dusk()));
        assert!(lines.iter().any(|l| l.contains('♥')));

        entry.show_reaction_icons = false;
        let lines = flat(&entry_lines(&entry, 60, &Theme::dusk()));
        assert!(!lines.iter().any(|l| l.contains('♥')));
    }
}

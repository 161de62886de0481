// Gallery view - markdown items behind paginator controls
//
// The classic paginator demo: a fixed list of markdown snippets sliced into
// pages, with the controls position switchable at runtime (top, bottom, or
// both rows at once, all live against the same state).

use crate::theme::Theme;
use crate::tui::traits::{Component, ComponentId, Copyable, Handled, Interactive};
use crate::widgets::paginator::{controls, PageState};
use crate::tui::markdown;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct GalleryView {
    pub pages: PageState<String>,
    pending_error: Option<String>,
}

impl GalleryView {
    pub fn new(items: Vec<String>, page_size: usize, page_size_options: Vec<usize>) -> Self {
        Self {
            pages: PageState::new(items, page_size).with_page_size_options(page_size_options),
            pending_error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let position = self.pages.position();
        let mut constraints = Vec::new();
        if position.shows_top() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(1));
        if position.shows_bottom() {
            constraints.push(Constraint::Length(1));
        }
        let chunks = Layout::vertical(constraints).split(area);

        let mut chunk_iter = chunks.iter();
        if position.shows_top() {
            controls::render(f, *chunk_iter.next().unwrap(), &self.pages, theme, focused);
        }
        let content = *chunk_iter.next().unwrap();
        if position.shows_bottom() {
            controls::render(f, *chunk_iter.next().unwrap(), &self.pages, theme, focused);
        }

        let inner_width = content.width.saturating_sub(4) as usize;
        let mut lines: Vec<Line> = Vec::new();
        for item in self.pages.current_slice() {
            lines.extend(markdown::render_markdown(item, inner_width, theme));
            lines.push(Line::from(""));
        }

        let border_color = if focused { theme.highlight } else { theme.border };
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(border_color))
                .title(format!(" Gallery ─ {} ", self.pages.page_label())),
        );
        f.render_widget(paragraph, content);
    }
}

impl Component for GalleryView {
    fn id(&self) -> ComponentId {
        ComponentId::Gallery
    }
}

impl Interactive for GalleryView {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match controls::handle_key(&mut self.pages, key) {
            Ok(handled) => handled,
            Err(error) => {
                self.pending_error = Some(error.to_string());
                Handled::Yes
            }
        }
    }

    fn focus_hint(&self) -> &'static str {
        "←→:page  Home/End:first/last  1-9:goto  +/-:size  p:controls"
    }
}

impl Copyable for GalleryView {
    /// Copy the current page's items as plain text
    fn copy_text(&self) -> Option<String> {
        let slice = self.pages.current_slice();
        if slice.is_empty() {
            return None;
        }
        Some(slice.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn gallery() -> GalleryView {
        let items = (1..=32).map(|i| format!("**Item {i}**")).collect();
        GalleryView::new(items, 5, vec![1, 5, 10, 20, 50])
    }

    #[test]
    fn test_navigation_routes_to_paginator() {
        let mut view = gallery();
        view.handle_key(key(KeyCode::End));
        assert_eq!(view.pages.page(), 7);
        assert_eq!(view.pages.current_slice().len(), 2);
    }

    #[test]
    fn test_goto_error_becomes_pending_toast() {
        let mut view = gallery();
        view.handle_key(key(KeyCode::Char('8')));
        assert!(view.take_error().unwrap().contains("out of range"));
    }

    #[test]
    fn test_copy_joins_current_page() {
        let view = gallery();
        let text = view.copy_text().unwrap();
        assert!(text.contains("**Item 1**"));
        assert!(text.contains("**Item 5**"));
        assert!(!text.contains("**Item 6**"));
    }
}

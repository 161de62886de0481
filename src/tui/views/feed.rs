// Feed view - a paginated chat conversation
//
// Chat entries live inside a paginator; the current page renders as one
// scrollable line list with auto-follow for streamed tokens. New messages
// jump to the last page so the conversation tail stays visible.

use crate::theme::Theme;
use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Component, ComponentId, Copyable, Handled, Interactive};
use crate::widgets::chat::message::ChatMessage;
use crate::widgets::chat::view as chat_view;
use crate::widgets::paginator::{controls, PageState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct FeedView {
    pub pages: PageState<ChatMessage>,
    pub scroll: ScrollState,
    /// Selected message within the current page, for copy; None follows
    /// the newest message
    selected: Option<usize>,
    /// Navigation error raised by the controls, drained by the App into a
    /// toast
    pending_error: Option<String>,
}

impl FeedView {
    pub fn new(page_size: usize, page_size_options: Vec<usize>) -> Self {
        Self {
            pages: PageState::new(Vec::new(), page_size)
                .with_page_size_options(page_size_options),
            scroll: ScrollState::new(),
            selected: None,
            pending_error: None,
        }
    }

    /// Append a message and follow it: last page, bottom of the viewport
    pub fn push_message(&mut self, message: ChatMessage) {
        self.pages.push_item(message);
        self.pages.last();
        self.selected = None;
        self.scroll.to_bottom();
    }

    /// Stream a token into the newest message of the conversation
    pub fn stream_into_newest(&mut self, token: &str) {
        let Some(last) = self.pages.len().checked_sub(1) else {
            return;
        };
        if let Some(message) = self.pages.item_mut(last) {
            message.stream(token);
        }
    }

    /// Toggle a reaction on the newest message
    pub fn react_to_newest(&mut self, reaction: &str) {
        let Some(last) = self.pages.len().checked_sub(1) else {
            return;
        };
        if let Some(message) = self.pages.item_mut(last) {
            message.toggle_reaction(reaction);
        }
    }

    /// The message the copy keybind targets: selected, else newest on page
    fn copy_target(&self) -> Option<&ChatMessage> {
        let slice = self.pages.current_slice();
        match self.selected {
            Some(index) => slice.get(index),
            None => slice.last(),
        }
    }

    /// Controls error waiting to be surfaced, if any
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

        let inner_width = content.width.saturating_sub(2) as usize;
        let mut lines: Vec<Line> = Vec::new();
        for (index, message) in self.pages.current_slice().iter().enumerate() {
            let mut entry = chat_view::entry_lines(message, inner_width, theme);
            if Some(index) == self.selected {
                if let Some(header) = entry.first_mut() {
                    header.style = Style::default().bg(theme.selection).fg(theme.selection_fg);
                }
            }
            lines.extend(entry);
        }

        let viewport = content.height.saturating_sub(2) as usize;
        self.scroll.sync(lines.len(), viewport);

        let title = if self.scroll.is_following() {
            " Conversation ".to_string()
        } else {
            " Conversation [scroll] ".to_string()
        };
        let border_color = if focused { theme.highlight } else { theme.border };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .scroll((self.scroll.offset() as u16, 0));
        f.render_widget(paragraph, content);
    }
}

impl Component for FeedView {
    fn id(&self) -> ComponentId {
        ComponentId::Feed
    }
}

impl Interactive for FeedView {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up => {
                self.scroll.up(1);
                Handled::Yes
            }
            KeyCode::Down => {
                self.scroll.down(1);
                Handled::Yes
            }
            KeyCode::PageUp => {
                self.scroll.page_up();
                Handled::Yes
            }
            KeyCode::PageDown => {
                self.scroll.page_down();
                Handled::Yes
            }
            // Message selection within the page; the first press picks up
            // the newest message, like auto-follow handing over control
            KeyCode::Char('k') => {
                let count = self.pages.current_slice().len();
                if count > 0 {
                    self.selected = Some(match self.selected {
                        None => count - 1,
                        Some(index) => index.saturating_sub(1),
                    });
                }
                Handled::Yes
            }
            KeyCode::Char('j') => {
                let count = self.pages.current_slice().len();
                if count > 0 {
                    self.selected = Some(match self.selected {
                        None => count - 1,
                        Some(index) => (index + 1).min(count - 1),
                    });
                }
                Handled::Yes
            }
            KeyCode::Esc if self.selected.is_some() => {
                self.selected = None;
                Handled::Yes
            }
            // Everything else may belong to the paginator controls
            _ => match controls::handle_key(&mut self.pages, key) {
                Ok(handled) => {
                    if handled == Handled::Yes {
                        self.selected = None;
                        self.scroll.to_top();
                    }
                    handled
                }
                Err(error) => {
                    self.pending_error = Some(error.to_string());
                    Handled::Yes
                }
            },
        }
    }

    fn focus_hint(&self) -> &'static str {
        "←→:page  +/-:size  p:controls  j/k:select  y:copy"
    }
}

impl Copyable for FeedView {
    fn copy_text(&self) -> Option<String> {
        self.copy_target().and_then(|message| message.copy_text())
    }

    fn copy_data(&self) -> Option<String> {
        self.copy_target().and_then(|message| message.copy_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn feed_with(count: usize) -> FeedView {
        let mut feed = FeedView::new(5, vec![1, 5, 10]);
        for i in 0..count {
            feed.push_message(ChatMessage::new(format!("message {i}")).with_user("Assistant"));
        }
        feed
    }

    #[test]
    fn test_push_follows_to_last_page() {
        let feed = feed_with(12);
        assert_eq!(feed.pages.page(), 3);
        assert_eq!(feed.pages.current_slice().len(), 2);
    }

    #[test]
    fn test_stream_reaches_newest_message() {
        let mut feed = feed_with(3);
        feed.stream_into_newest("!!");
        let last = feed.pages.items().last().unwrap();
        assert_eq!(last.value().as_text(), Some("message 2!!"));
    }

    #[test]
    fn test_copy_defaults_to_newest_on_page() {
        let feed = feed_with(3);
        assert_eq!(feed.copy_text(), Some("message 2".to_string()));
    }

    #[test]
    fn test_selection_changes_copy_target() {
        let mut feed = feed_with(3);
        feed.handle_key(key(KeyCode::Char('k')));
        feed.handle_key(key(KeyCode::Char('k')));
        assert_eq!(feed.copy_text(), Some("message 1".to_string()));
        feed.handle_key(key(KeyCode::Esc));
        assert_eq!(feed.copy_text(), Some("message 2".to_string()));
    }

    #[test]
    fn test_controls_error_is_queued_for_toast() {
        let mut feed = feed_with(3); // one page
        assert_eq!(feed.handle_key(key(KeyCode::Char('9'))), Handled::Yes);
        let error = feed.take_error().expect("goto error queued");
        assert!(error.contains("out of range"));
        assert!(feed.take_error().is_none());
    }
}

// TUI application state
//
// The App is a thin orchestrator: it owns the dashboard views, the theme,
// the toast, and the quit flag, and routes key events in layers
// (global keys first, then the active view through the Interactive trait).

use crate::config::Config;
use crate::demo::DemoEvent;
use crate::logging::LogBuffer;
use crate::theme::Theme;
use crate::tui::clipboard;
use crate::tui::toast::Toast;
use crate::tui::traits::{Copyable, Handled, Interactive};
use crate::tui::views::{FeedView, GalleryView};
use crate::widgets::chat::message::ChatMessage;
use crate::widgets::paginator::PageField;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// The dashboards the demo binary ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Feed,
    Gallery,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Feed => View::Gallery,
            View::Gallery => View::Feed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Feed => "Feed",
            View::Gallery => "Gallery",
        }
    }
}

pub struct App {
    pub view: View,
    pub feed: FeedView,
    pub gallery: GalleryView,
    pub theme: Theme,
    pub toast: Option<Toast>,
    pub log_buffer: LogBuffer,
    pub should_quit: bool,
    timestamp_format: String,
}

impl App {
    pub fn with_config(config: &Config, log_buffer: LogBuffer, start: View) -> Self {
        let mut feed = FeedView::new(config.page_size, config.page_size_options.clone());
        let mut gallery = GalleryView::new(
            crate::demo::gallery_items(),
            config.page_size,
            config.page_size_options.clone(),
        );

        // Observe page turns for the trace log
        feed.pages
            .watchers_mut()
            .watch(PageField::Page, |_| tracing::debug!("feed page turned"));
        gallery
            .pages
            .watchers_mut()
            .watch(PageField::Page, |_| tracing::debug!("gallery page turned"));

        Self {
            view: start,
            feed,
            gallery,
            theme: Theme::by_name(&config.theme),
            toast: None,
            log_buffer,
            should_quit: false,
            timestamp_format: config.timestamp_format.clone(),
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Periodic housekeeping: expire the toast, surface queued view errors
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
        if let Some(error) = self.feed.take_error().or_else(|| self.gallery.take_error()) {
            self.show_toast(format!("✗ {error}"));
        }
    }

    /// Apply a scripted demo event to the feed
    pub fn apply_demo_event(&mut self, event: DemoEvent) {
        match event {
            DemoEvent::Post {
                user,
                value,
                avatar,
            } => {
                let mut message = ChatMessage::new(value)
                    .with_user(user)
                    .with_timestamp_format(self.timestamp_format.clone());
                if let Some(avatar) = avatar {
                    message = message.with_avatar(avatar);
                }
                self.feed.push_message(message);
            }
            DemoEvent::Stream(token) => self.feed.stream_into_newest(&token),
            DemoEvent::React(reaction) => self.feed.react_to_newest(&reaction),
        }
    }

    /// Layered key dispatch: global keys, then the active view
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_global_keys(&key) {
            return;
        }
        let handled = match self.view {
            View::Feed => self.feed.handle_key(key),
            View::Gallery => self.gallery.handle_key(key),
        };
        if handled == Handled::No {
            tracing::trace!(?key, "unhandled key");
        }
        // Surface navigation errors immediately rather than on next tick
        if let Some(error) = self.feed.take_error().or_else(|| self.gallery.take_error()) {
            self.show_toast(format!("✗ {error}"));
        }
    }

    fn handle_global_keys(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Tab => {
                self.view = self.view.next();
                true
            }
            KeyCode::F(1) => {
                self.view = View::Feed;
                true
            }
            KeyCode::F(2) => {
                self.view = View::Gallery;
                true
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                true
            }
            // Copy: y = readable text, Y = structured data
            KeyCode::Char('y') => {
                self.copy_active(false);
                true
            }
            KeyCode::Char('Y') => {
                self.copy_active(true);
                true
            }
            _ => false,
        }
    }

    fn copy_active(&mut self, as_data: bool) {
        let content = match (self.view, as_data) {
            (View::Feed, false) => self.feed.copy_text(),
            (View::Feed, true) => self.feed.copy_data(),
            (View::Gallery, false) => self.gallery.copy_text(),
            (View::Gallery, true) => self.gallery.copy_data(),
        };
        let Some(content) = content else {
            self.show_toast("Nothing to copy");
            return;
        };
        if clipboard::copy_to_clipboard(&content).is_ok() {
            self.show_toast("✓ Copied to clipboard");
        } else {
            self.show_toast("✗ Failed to copy");
        }
    }

    /// Status-bar hints for the active view
    pub fn focus_hint(&self) -> &'static str {
        match self.view {
            View::Feed => self.feed.focus_hint(),
            View::Gallery => self.gallery.focus_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::chat::content::Value;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::with_config(&Config::default(), LogBuffer::new(), View::Feed)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.view, View::Gallery);
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.view, View::Feed);
    }

    #[test]
    fn test_demo_events_drive_the_feed() {
        let mut app = app();
        app.apply_demo_event(DemoEvent::Post {
            user: "Assistant".to_string(),
            value: Value::Text("hello".to_string()),
            avatar: None,
        });
        app.apply_demo_event(DemoEvent::Stream(" world".to_string()));

        let last = app.feed.pages.items().last().unwrap();
        assert_eq!(last.value().as_text(), Some("hello world"));
        assert_eq!(last.user(), "Assistant");
    }

    #[test]
    fn test_goto_error_becomes_toast() {
        let mut app = app();
        app.apply_demo_event(DemoEvent::Post {
            user: "User".to_string(),
            value: Value::Text("hi".to_string()),
            avatar: None,
        });
        app.handle_key_event(key(KeyCode::Char('9')));
        assert!(app.toast.is_some());
    }
}

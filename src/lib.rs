// dashkit - Paginator and chat-message widgets for reactive terminal dashboards
//
// The crate is organized in three layers:
// - widgets: the state machines and rendering models (paginator, chat message)
// - reactive: per-field change tracking and observer lists the widgets use
// - tui: the ratatui shell (event loop, views, markdown, theme, clipboard)
//
// The demo binary (src/main.rs) wires both widgets into example dashboards.

pub mod cli;
pub mod config;
pub mod demo;
pub mod logging;
pub mod reactive;
pub mod theme;
pub mod tui;
pub mod widgets;

pub use widgets::chat::message::ChatMessage;
pub use widgets::paginator::PageState;
pub use widgets::WidgetError;

// Paginator controls - the navigation row and its key bindings
//
// Stateless over PageState: rendering reads derived state, key handling
// translates presses into state-machine operations. The same row renders
// above the content, below it, or both, per the state's position; every
// rendered copy stays interactive because they all route here.

use crate::theme::Theme;
use crate::tui::traits::Handled;
use crate::widgets::paginator::PageState;
use crate::widgets::WidgetError;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render one controls row.
pub fn render<T>(f: &mut Frame, area: Rect, state: &PageState<T>, theme: &Theme, focused: bool) {
    let accent = if focused { theme.highlight } else { theme.muted };
    let button = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(theme.foreground);
    let dim = Style::default().fg(theme.muted);

    let at_first = state.page() == 1;
    let at_last = state.page() == state.num_pages();
    let edge = |disabled: bool| {
        if disabled {
            Style::default().fg(theme.border)
        } else {
            button
        }
    };

    let line = Line::from(vec![
        Span::styled(" « ", edge(at_first)),
        Span::styled(" ‹ ", edge(at_first)),
        Span::styled(format!(" {} ", state.page_label()), label),
        Span::styled(" › ", edge(at_last)),
        Span::styled(" » ", edge(at_last)),
        Span::styled("   ", dim),
        Span::styled(format!("{}/page ▾", state.page_size()), label),
        Span::styled("   ", dim),
        Span::styled(format!("controls: {} ▾", state.position().label()), dim),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

/// Translate a key press into a paginator operation.
///
/// Returns `Ok(Handled::No)` for keys the controls don't own. Errors carry
/// the invalid direct input (goto out of range, bad size) for the caller to
/// surface; boundary navigation clamps silently inside the state machine.
pub fn handle_key<T>(state: &mut PageState<T>, key: KeyEvent) -> Result<Handled, WidgetError> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            state.previous();
            Ok(Handled::Yes)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.next();
            Ok(Handled::Yes)
        }
        KeyCode::Home => {
            state.first();
            Ok(Handled::Yes)
        }
        KeyCode::End => {
            state.last();
            Ok(Handled::Yes)
        }
        // Page-size selector: step through the configured options
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let next = step_page_size(state, 1);
            state.resize(next)?;
            Ok(Handled::Yes)
        }
        KeyCode::Char('-') => {
            let previous = step_page_size(state, -1);
            state.resize(previous)?;
            Ok(Handled::Yes)
        }
        // Position selector
        KeyCode::Char('p') => {
            let next = state.position().cycle();
            state.set_position(next);
            Ok(Handled::Yes)
        }
        // Direct page selection, like picking from the dropdown
        KeyCode::Char(c @ '1'..='9') => {
            let page = (c as u8 - b'0') as usize;
            state.goto(page)?;
            Ok(Handled::Yes)
        }
        _ => Ok(Handled::No),
    }
}

/// Next/previous entry in `page_size_options`, clamped at the ends.
///
/// A current size that is not in the options list snaps to the first
/// option (the list validates UI input only, so this can happen after a
/// programmatic resize).
fn step_page_size<T>(state: &PageState<T>, direction: isize) -> usize {
    let options = state.page_size_options();
    let Some(index) = options.iter().position(|&s| s == state.page_size()) else {
        return options.first().copied().unwrap_or(1);
    };
    let stepped = index.saturating_add_signed(direction).min(options.len() - 1);
    options[stepped]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> PageState<usize> {
        PageState::new((1..=32).collect(), 5)
    }

    #[test]
    fn test_arrow_navigation() {
        let mut state = sample();
        assert_eq!(handle_key(&mut state, key(KeyCode::Right)), Ok(Handled::Yes));
        assert_eq!(state.page(), 2);
        handle_key(&mut state, key(KeyCode::Left)).unwrap();
        assert_eq!(state.page(), 1);
        handle_key(&mut state, key(KeyCode::End)).unwrap();
        assert_eq!(state.page(), 7);
        handle_key(&mut state, key(KeyCode::Home)).unwrap();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_page_size_steps_through_options() {
        let mut state = sample();
        handle_key(&mut state, key(KeyCode::Char('+'))).unwrap();
        assert_eq!(state.page_size(), 10);
        handle_key(&mut state, key(KeyCode::Char('-'))).unwrap();
        assert_eq!(state.page_size(), 5);
        // Clamped at the low end
        handle_key(&mut state, key(KeyCode::Char('-'))).unwrap();
        assert_eq!(state.page_size(), 1);
        handle_key(&mut state, key(KeyCode::Char('-'))).unwrap();
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_off_list_size_snaps_to_first_option() {
        let mut state = sample();
        state.resize(7).unwrap(); // not an option
        handle_key(&mut state, key(KeyCode::Char('+'))).unwrap();
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_digit_goto_surfaces_out_of_range() {
        let mut state = sample();
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('9'))),
            Err(WidgetError::OutOfRange { page: 9, pages: 7 })
        );
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('3'))),
            Ok(Handled::Yes)
        );
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_position_cycles() {
        use crate::widgets::paginator::ControlsPosition;
        let mut state = sample();
        handle_key(&mut state, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(state.position(), ControlsPosition::Bottom);
        handle_key(&mut state, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(state.position(), ControlsPosition::Both);
        handle_key(&mut state, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(state.position(), ControlsPosition::Top);
    }

    #[test]
    fn test_unowned_keys_bubble_up() {
        let mut state = sample();
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('q'))),
            Ok(Handled::No)
        );
    }
}

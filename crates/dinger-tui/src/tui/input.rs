// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (row selection).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use dinger_core::protocol::UserCommand;

use super::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key was handled locally or is
/// not bound.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm emits Release events on some platforms
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => Some(UserCommand::Quit),
            _ => None,
        };
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('r') => Some(UserCommand::Refresh),
        KeyCode::Char('t') => Some(UserCommand::ToggleDataSource),

        KeyCode::Char('j') | KeyCode::Down => {
            view_state.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_state.select_prev();
            None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            view_state.select_first();
            None
        }
        KeyCode::Char('G') | KeyCode::End => {
            view_state.select_last();
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

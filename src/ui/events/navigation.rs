//! Global key bindings
//!
//! Keys here apply regardless of the focused panel, but only while no text
//! field is capturing input.

use crate::actions::AppAction;
use crate::types::PanelFocus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys that map straight onto a shell action
pub fn global_action(key: &KeyEvent) -> Option<AppAction> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let action = match key.code {
        KeyCode::Tab => AppAction::FocusNext,
        KeyCode::BackTab => AppAction::FocusPrevious,
        KeyCode::Char('1') => AppAction::FocusPanel(PanelFocus::Endpoints),
        KeyCode::Char('2') => AppAction::FocusPanel(PanelFocus::Detail),
        KeyCode::Char('3') => AppAction::FocusPanel(PanelFocus::Request),
        KeyCode::Char('f') => AppAction::ToggleFullscreen,
        KeyCode::Char('?') => AppAction::ToggleHelp,
        KeyCode::Char('q') => AppAction::Quit,
        KeyCode::Char('a') => AppAction::OpenTokenInput,
        KeyCode::Char('A') => AppAction::ClearAuthToken,
        KeyCode::Char(',') => AppAction::OpenSourceInput,
        _ => return None,
    };
    Some(action)
}

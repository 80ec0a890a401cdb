use crate::editor::LineEditor;
use crate::state::{AppState, Overlay, SourceForm};
use crate::types::PanelFocus;

/// Shell-level state changes. Panel-local keys never become actions; panels
/// handle those themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Focus
    FocusNext,
    FocusPrevious,
    FocusPanel(PanelFocus),
    ToggleFullscreen,

    // Overlays
    ToggleHelp,
    OpenTokenInput,
    OpenSourceInput,
    SwitchSourceField,
    CloseOverlay,

    // Authentication
    SetAuthToken(String),
    ClearAuthToken,

    SetStatus(String),
    ClearStatus,

    /// Ctrl+R after a failed load
    Retry,
    Quit,
}

/// Apply an action to the application state
pub fn apply_action(action: AppAction, state: &mut AppState) {
    match action {
        AppAction::FocusNext => state.focus = state.focus.next(),
        AppAction::FocusPrevious => state.focus = state.focus.previous(),
        AppAction::FocusPanel(panel) => state.focus = panel,
        AppAction::ToggleFullscreen => state.fullscreen = !state.fullscreen,

        AppAction::ToggleHelp => {
            state.overlay = match state.overlay {
                Overlay::Help => Overlay::None,
                _ => Overlay::Help,
            };
        }
        AppAction::OpenTokenInput => {
            let current = state.auth.token.clone().unwrap_or_default();
            state.overlay =
                Overlay::Token(LineEditor::single_line(&current).with_batch_delay(state.batch_delay));
        }
        AppAction::OpenSourceInput => {
            state.overlay = Overlay::Source(SourceForm::new(
                state.spec_source.as_deref(),
                state.base_url.as_deref(),
                state.batch_delay,
            ));
        }
        AppAction::SwitchSourceField => {
            if let Overlay::Source(form) = &mut state.overlay {
                form.switch_field();
            }
        }
        AppAction::CloseOverlay => state.overlay = Overlay::None,

        AppAction::SetAuthToken(token) => {
            state.auth.set_token(token);
            state.status_message = Some(if state.auth.is_authenticated() {
                "Bearer token set".to_string()
            } else {
                "Bearer token cleared".to_string()
            });
        }
        AppAction::ClearAuthToken => {
            state.auth.clear_token();
            state.status_message = Some("Bearer token cleared".to_string());
        }

        AppAction::SetStatus(message) => state.status_message = Some(message),
        AppAction::ClearStatus => state.status_message = None,

        AppAction::Retry => {
            state.retry_count += 1;
            state.begin_loading();
        }
        AppAction::Quit => state.should_quit = true,
    }
}

//! Modal dialog handlers
//!
//! - Spec source configuration (spec location and base URL)
//! - Bearer token input
//! - Help overlay

use super::helpers::apply_many;
use super::Effect;
use crate::actions::{apply_action, AppAction};
use crate::config;
use crate::editor::EditOutcome;
use crate::state::{AppState, Overlay};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_overlay_key(key: KeyEvent, state: &mut AppState) -> Effect {
    match state.overlay {
        Overlay::Token(_) => {
            handle_token_input(key, state);
            Effect::None
        }
        Overlay::Source(_) => handle_source_input(key, state),
        Overlay::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
            ) {
                apply_action(AppAction::CloseOverlay, state);
            }
            Effect::None
        }
        Overlay::None => Effect::None,
    }
}

pub fn handle_overlay_paste(text: &str, state: &mut AppState) {
    match &mut state.overlay {
        Overlay::Token(editor) => editor.handle_paste(text.trim()),
        Overlay::Source(form) => form.active_editor().handle_paste(text.trim()),
        Overlay::None | Overlay::Help => {}
    }
}

fn handle_token_input(key: KeyEvent, state: &mut AppState) {
    let Overlay::Token(editor) = &mut state.overlay else {
        return;
    };
    match editor.handle_key(key) {
        EditOutcome::Commit(token) => {
            tracing::info!("bearer token updated");
            apply_many(
                state,
                [AppAction::CloseOverlay, AppAction::SetAuthToken(token)],
            );
        }
        EditOutcome::Cancel => apply_action(AppAction::CloseOverlay, state),
        EditOutcome::Continue => {}
    }
}

fn handle_source_input(key: KeyEvent, state: &mut AppState) -> Effect {
    let Overlay::Source(form) = &mut state.overlay else {
        return Effect::None;
    };

    if matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
        || (key.code == KeyCode::Down && !key.modifiers.contains(KeyModifiers::CONTROL))
        || key.code == KeyCode::Up
    {
        form.active_editor().flush();
        apply_action(AppAction::SwitchSourceField, state);
        return Effect::None;
    }

    match form.active_editor().handle_key(key) {
        EditOutcome::Commit(_) => {
            let submission = form.submission();
            let validation = config::validate_source(&submission.spec_source).and_then(|_| {
                match &submission.base_url {
                    Some(base_url) => config::validate_base_url(base_url),
                    None => Ok(()),
                }
            });
            match validation {
                Ok(()) => {
                    tracing::info!(
                        spec_source = %submission.spec_source,
                        base_url = ?submission.base_url,
                        "spec source submitted"
                    );
                    apply_action(AppAction::CloseOverlay, state);
                    Effect::SubmitSource(submission)
                }
                Err(message) => {
                    tracing::debug!(%message, "spec source rejected");
                    form.error = Some(message);
                    Effect::None
                }
            }
        }
        EditOutcome::Cancel => {
            apply_action(AppAction::CloseOverlay, state);
            Effect::None
        }
        EditOutcome::Continue => {
            form.error = None;
            Effect::None
        }
    }
}

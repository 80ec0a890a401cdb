//! Event handling for swagger-nav-tui
//!
//! Input is routed in this order:
//! - an open overlay (help, token, spec source) takes every key
//! - global bindings, unless a text field is capturing input
//! - the focused panel
//!
//! Handlers mutate [`AppState`] directly and return an [`Effect`] for work the
//! app loop has to start (loading a spec, sending a request).

mod execution;
mod helpers;
mod modals;
mod navigation;
mod yank;

use crate::actions::{apply_action, AppAction};
use crate::panels::PanelEvent;
use crate::state::AppState;
use crate::types::{ApiEndpoint, PanelFocus, RequestConfig, SourceSubmission};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Work requested by an event that the app loop performs
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// (Re)load the configured spec source
    LoadSpec,
    SubmitSource(SourceSubmission),
    Execute {
        endpoint: ApiEndpoint,
        config: RequestConfig,
        base_url: String,
    },
}

pub fn handle_event(event: Event, state: &mut AppState) -> Effect {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, state),
        Event::Paste(text) => {
            handle_paste(&text, state);
            Effect::None
        }
        _ => Effect::None,
    }
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> Effect {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        apply_action(AppAction::Quit, state);
        return Effect::None;
    }
    apply_action(AppAction::ClearStatus, state);

    if state.overlay.is_open() {
        return modals::handle_overlay_key(key, state);
    }

    if !state.is_capturing() {
        if let Some(action) = navigation::global_action(&key) {
            apply_action(action, state);
            return Effect::None;
        }
        match key.code {
            KeyCode::Char('y') if key.modifiers.is_empty() => {
                yank::handle_yank(state);
                return Effect::None;
            }
            KeyCode::Char('r') if ctrl => return execution::handle_retry(state),
            _ => {}
        }
    }

    let event = match state.focus {
        PanelFocus::Endpoints => {
            let event = state.endpoints.handle_key(key);
            state.sync_subject();
            event
        }
        PanelFocus::Detail => state.detail.handle_key(key, &state.spec.schemas),
        PanelFocus::Request => state.request.handle_key(key),
    };

    match event {
        PanelEvent::None => Effect::None,
        PanelEvent::EndpointSelected(endpoint) => {
            tracing::debug!(endpoint = %endpoint.key(), "endpoint selected");
            apply_action(AppAction::FocusPanel(PanelFocus::Detail), state);
            Effect::None
        }
        PanelEvent::SendRequest => execution::handle_send(state),
        PanelEvent::Status(message) => {
            apply_action(AppAction::SetStatus(message), state);
            Effect::None
        }
    }
}

/// Bracketed paste goes to whichever text field is capturing
pub fn handle_paste(text: &str, state: &mut AppState) {
    if state.overlay.is_open() {
        modals::handle_overlay_paste(text, state);
    } else if state.endpoints.is_capturing() {
        state.endpoints.handle_paste(text);
        state.sync_subject();
    } else if state.request.is_capturing() {
        state.request.handle_paste(text);
    }
}

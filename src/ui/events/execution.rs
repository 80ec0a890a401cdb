//! Request execution and spec reload

use super::helpers::can_execute_endpoint;
use super::Effect;
use crate::actions::{apply_action, AppAction};
use crate::state::AppState;
use crate::types::LoadingState;

/// Validate the request panel's subject and turn it into an execute effect
pub fn handle_send(state: &mut AppState) -> Effect {
    let Some(endpoint) = state.request.subject().cloned() else {
        return Effect::None;
    };

    let Some(base_url) = state.base_url.clone() else {
        tracing::debug!("cannot execute: base URL not configured");
        apply_action(
            AppAction::SetStatus("Base URL not configured (press , to set it)".to_string()),
            state,
        );
        return Effect::None;
    };

    if state.request.is_executing() {
        tracing::debug!(endpoint = %endpoint.key(), "request already in progress");
        return Effect::None;
    }

    let config = state.request.config().cloned().unwrap_or_default();
    if let Err(message) = can_execute_endpoint(&endpoint, Some(&config)) {
        tracing::debug!(%message, "cannot execute");
        apply_action(AppAction::SetStatus(message), state);
        return Effect::None;
    }

    state.request.mark_executing(endpoint.key());
    Effect::Execute {
        endpoint,
        config,
        base_url,
    }
}

/// Ctrl+R: reload after a failed load, or refresh a loaded spec
pub fn handle_retry(state: &mut AppState) -> Effect {
    if matches!(
        state.loading_state,
        LoadingState::Fetching | LoadingState::Parsing
    ) || state.spec_source.is_none()
    {
        return Effect::None;
    }
    if matches!(state.loading_state, LoadingState::Error(_)) {
        apply_action(AppAction::Retry, state);
    }
    Effect::LoadSpec
}

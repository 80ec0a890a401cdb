//! Yank (copy) handlers
//!
//! Endpoint list and detail panels copy the selected endpoint's path.
//! The request panel copies the value on the top visible response line,
//! or the top visible header value in the headers view.

use crate::actions::{apply_action, AppAction};
use crate::state::AppState;
use crate::types::PanelFocus;
use crate::ui::draw::{sorted_headers, try_format_json};
use arboard::Clipboard;

/// What `y` would copy in the current focus, if anything
pub fn yank_target(state: &AppState) -> Option<String> {
    match state.focus {
        PanelFocus::Endpoints | PanelFocus::Detail => {
            state.detail.subject().map(|endpoint| endpoint.path.clone())
        }
        PanelFocus::Request => {
            let response = state.request.response()?;
            if response.is_error {
                return None;
            }
            if state.request.shows_headers() {
                return sorted_headers(response)
                    .get(state.request.response_scroll())
                    .map(|(_, value)| value.to_string());
            }
            let formatted = try_format_json(&response.body);
            let line = formatted.lines().nth(state.request.response_scroll())?;
            let value = extract_json_value(line);
            (!value.is_empty()).then_some(value)
        }
    }
}

pub fn handle_yank(state: &mut AppState) {
    let Some(value) = yank_target(state) else {
        tracing::debug!("nothing to yank");
        return;
    };

    let message = match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(value.clone()))
    {
        Ok(()) => {
            tracing::debug!(%value, "yanked");
            format!("Copied: {}", value)
        }
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            format!("Failed to copy to clipboard: {}", e)
        }
    };
    apply_action(AppAction::SetStatus(message), state);
}

/// Extract the value portion from a JSON line
/// Examples:
///   "  "access_token": "abc123"," -> "abc123"
///   "  123" -> "123"
fn extract_json_value(line: &str) -> String {
    let trimmed = line.trim();

    match trimmed.split_once(':') {
        Some((_, value)) => value
            .trim()
            .trim_end_matches(',')
            .trim()
            .trim_matches('"')
            .to_string(),
        None => trimmed
            .trim_matches(|c| matches!(c, '{' | '}' | '[' | ']' | ','))
            .trim()
            .trim_matches('"')
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{ApiEndpoint, ApiResponse, ApiSpec, BackgroundEvent};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_extract_json_value_simple() {
        assert_eq!(
            extract_json_value("  \"access_token\": \"abc123\","),
            "abc123"
        );
        assert_eq!(extract_json_value("  \"name\": \"John\""), "John");
    }

    #[test]
    fn test_extract_json_value_number() {
        assert_eq!(extract_json_value("  \"age\": 30,"), "30");
        assert_eq!(extract_json_value("  \"active\": true,"), "true");
    }

    #[test]
    fn test_extract_json_value_no_colon() {
        assert_eq!(extract_json_value("  123"), "123");
        assert_eq!(extract_json_value("  {"), "");
        assert_eq!(extract_json_value("  \"tag\","), "tag");
    }

    #[test]
    fn test_yank_target_by_focus() {
        let mut state = AppState::new(&Config::default());
        state.handle_background(BackgroundEvent::SpecLoaded(ApiSpec {
            endpoints: vec![ApiEndpoint {
                method: "GET".into(),
                path: "/pets".into(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                responses: vec![],
            }],
            ..Default::default()
        }));
        state
            .endpoints
            .handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        state.sync_subject();
        assert_eq!(yank_target(&state).as_deref(), Some("/pets"));

        state.focus = PanelFocus::Request;
        assert_eq!(yank_target(&state), None);

        state.request.set_response(
            "GET /pets".into(),
            ApiResponse {
                status: 200,
                status_text: "OK".into(),
                headers: HashMap::new(),
                body: r#"{"id":7}"#.into(),
                duration: Duration::from_millis(3),
                is_error: false,
                error_message: None,
            },
        );
        // Line 0 is "{", line 1 is the id
        assert_eq!(yank_target(&state), None);
        state
            .request
            .handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        state.request.clamp_response_scroll(2);
        assert_eq!(state.request.response_scroll(), 1);
        assert_eq!(yank_target(&state).as_deref(), Some("7"));
    }

    #[test]
    fn test_yank_header_value_in_headers_view() {
        let mut state = AppState::new(&Config::default());
        state.handle_background(BackgroundEvent::SpecLoaded(ApiSpec {
            endpoints: vec![ApiEndpoint {
                method: "GET".into(),
                path: "/pets".into(),
                summary: None,
                description: None,
                tags: vec![],
                parameters: vec![],
                request_body: None,
                responses: vec![],
            }],
            ..Default::default()
        }));
        state
            .endpoints
            .handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        state.sync_subject();
        state.focus = PanelFocus::Request;
        state.request.set_response(
            "GET /pets".into(),
            ApiResponse {
                status: 200,
                status_text: "OK".into(),
                headers: HashMap::from([
                    ("x-total".to_string(), "42".to_string()),
                    ("content-type".to_string(), "application/json".to_string()),
                ]),
                body: "[]".into(),
                duration: Duration::from_millis(3),
                is_error: false,
                error_message: None,
            },
        );

        state
            .request
            .handle_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT));
        assert_eq!(yank_target(&state).as_deref(), Some("application/json"));
    }
}

//! Request panel
//!
//! Lists the values that go into a request (path, query and header
//! parameters plus the body), lets the user edit them and shows the last
//! response. Values are kept per endpoint so switching back and forth does
//! not lose them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use super::{handle_list_motion, PanelEvent};
use crate::editor::{prettify_json, EditOutcome, LineEditor};
use crate::rows::{cursor_after_toggle, flatten_groups, CollapseSet, Cursor, GroupSource, Row};
use crate::types::{ApiEndpoint, ApiResponse, ParameterLocation, RequestConfig};
use crate::viewport::ViewportState;

/// Lines moved per Ctrl+D / Ctrl+U
pub const SCROLL_LINES_PER_ACTION: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestField {
    Param {
        location: ParameterLocation,
        name: String,
        required: bool,
    },
    Body,
}

#[derive(Debug)]
pub struct RequestPanel {
    subject: Option<ApiEndpoint>,
    configs: HashMap<String, RequestConfig>,
    responses: HashMap<String, ApiResponse>,
    executing: Option<String>,
    collapsed: CollapseSet,
    cursor: Cursor,
    pub viewport: ViewportState,
    pub page_size: usize,
    editor: Option<(RequestField, LineEditor)>,
    response_scroll: usize,
    /// Response view lists headers instead of the body
    show_headers: bool,
    batch_delay: Duration,
}

impl RequestPanel {
    pub fn new(batch_delay: Duration) -> Self {
        Self {
            subject: None,
            configs: HashMap::new(),
            responses: HashMap::new(),
            executing: None,
            collapsed: CollapseSet::expanded(),
            cursor: Cursor::new(),
            viewport: ViewportState::new(),
            page_size: 10,
            editor: None,
            response_scroll: 0,
            show_headers: false,
            batch_delay,
        }
    }

    pub fn subject(&self) -> Option<&ApiEndpoint> {
        self.subject.as_ref()
    }

    /// Show a different endpoint. An edit in progress is dropped.
    pub fn set_subject(&mut self, endpoint: Option<ApiEndpoint>) {
        let old_key = self.subject.as_ref().map(ApiEndpoint::key);
        let new_key = endpoint.as_ref().map(ApiEndpoint::key);
        self.subject = endpoint;
        if old_key != new_key {
            self.editor = None;
            self.collapsed = CollapseSet::expanded();
            self.cursor = Cursor::new();
            self.viewport.reset();
            self.response_scroll = 0;
        }
    }

    /// Forget every stored value and response (a new spec was loaded)
    pub fn clear(&mut self) {
        self.set_subject(None);
        self.configs.clear();
        self.responses.clear();
        self.executing = None;
    }

    pub fn config(&self) -> Option<&RequestConfig> {
        let key = self.subject.as_ref()?.key();
        self.configs.get(&key)
    }

    pub fn response(&self) -> Option<&ApiResponse> {
        let key = self.subject.as_ref()?.key();
        self.responses.get(&key)
    }

    pub fn is_executing(&self) -> bool {
        match (&self.executing, &self.subject) {
            (Some(executing), Some(subject)) => *executing == subject.key(),
            _ => false,
        }
    }

    pub fn any_executing(&self) -> bool {
        self.executing.is_some()
    }

    pub fn mark_executing(&mut self, endpoint_key: String) {
        self.responses.remove(&endpoint_key);
        self.executing = Some(endpoint_key);
        self.response_scroll = 0;
    }

    pub fn set_response(&mut self, endpoint_key: String, response: ApiResponse) {
        if self.executing.as_deref() == Some(endpoint_key.as_str()) {
            self.executing = None;
        }
        self.response_scroll = 0;
        self.responses.insert(endpoint_key, response);
    }

    pub fn shows_headers(&self) -> bool {
        self.show_headers
    }

    pub fn response_scroll(&self) -> usize {
        self.response_scroll
    }

    /// Clamp the response scroll to the number of body lines
    pub fn clamp_response_scroll(&mut self, line_count: usize) {
        self.response_scroll = self.response_scroll.min(line_count.saturating_sub(1));
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn is_capturing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<(&RequestField, &LineEditor)> {
        self.editor.as_ref().map(|(field, editor)| (field, editor))
    }

    fn groups(&self) -> Vec<GroupSource<RequestField>> {
        let Some(endpoint) = &self.subject else {
            return Vec::new();
        };

        let params = |location: ParameterLocation| -> Vec<RequestField> {
            endpoint
                .parameters
                .iter()
                .filter(|p| p.location == location)
                .map(|p| RequestField::Param {
                    location,
                    name: p.name.clone(),
                    required: p.required || location == ParameterLocation::Path,
                })
                .collect()
        };

        let mut groups = Vec::new();
        for (id, label, location) in [
            ("path", "Path Parameters", ParameterLocation::Path),
            ("query", "Query Parameters", ParameterLocation::Query),
            ("header", "Headers", ParameterLocation::Header),
        ] {
            let items = params(location);
            if !items.is_empty() {
                groups.push(GroupSource {
                    id: id.to_string(),
                    label: label.to_string(),
                    items,
                });
            }
        }
        if endpoint.supports_body() {
            groups.push(GroupSource {
                id: "body".to_string(),
                label: "Body".to_string(),
                items: vec![RequestField::Body],
            });
        }
        groups
    }

    pub fn rows(&self) -> Vec<Row<RequestField>> {
        flatten_groups(&self.groups(), &self.collapsed, "", |_, _| true)
    }

    /// Stored value of a field for the current endpoint
    pub fn field_value(&self, field: &RequestField) -> String {
        let Some(config) = self.config() else {
            return String::new();
        };
        match field {
            RequestField::Param { location, name, .. } => {
                config.value(*location, name).unwrap_or_default().to_string()
            }
            RequestField::Body => config.body.clone().unwrap_or_default(),
        }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.editor
            .as_mut()
            .is_some_and(|(_, editor)| editor.tick(now))
    }

    pub fn next_flush_in(&self, now: Instant) -> Option<Duration> {
        self.editor
            .as_ref()
            .and_then(|(_, editor)| editor.next_flush_in(now))
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some((_, editor)) = self.editor.as_mut() {
            editor.handle_paste(text);
        }
    }

    fn start_editing(&mut self, field: RequestField) {
        let value = self.field_value(&field);
        let editor = match field {
            RequestField::Body => LineEditor::multi_line(&value).with_quote_normalization(),
            RequestField::Param { .. } => LineEditor::single_line(&value),
        }
        .with_batch_delay(self.batch_delay);
        debug!(?field, "editing request field");
        self.editor = Some((field, editor));
    }

    fn commit(&mut self, field: RequestField, value: String) -> PanelEvent {
        let Some(key) = self.subject.as_ref().map(ApiEndpoint::key) else {
            return PanelEvent::None;
        };
        let config = self.configs.entry(key).or_default();
        match field {
            RequestField::Param { location, name, .. } => {
                config.set_value(location, name, value);
                PanelEvent::None
            }
            RequestField::Body if value.trim().is_empty() => {
                config.body = None;
                PanelEvent::None
            }
            RequestField::Body => match prettify_json(&value) {
                Ok(pretty) => {
                    config.body = Some(pretty);
                    PanelEvent::None
                }
                Err(message) => {
                    warn!(%message, "request body kept as raw text");
                    config.body = Some(value);
                    PanelEvent::Status(message)
                }
            },
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PanelEvent {
        if let Some((field, editor)) = self.editor.as_mut() {
            return match editor.handle_key(key) {
                EditOutcome::Commit(value) => {
                    let field = field.clone();
                    self.editor = None;
                    self.commit(field, value)
                }
                EditOutcome::Cancel => {
                    self.editor = None;
                    PanelEvent::None
                }
                EditOutcome::Continue => PanelEvent::None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => {
                self.response_scroll = self.response_scroll.saturating_add(SCROLL_LINES_PER_ACTION);
                return PanelEvent::None;
            }
            KeyCode::Char('u') if ctrl => {
                self.response_scroll = self.response_scroll.saturating_sub(SCROLL_LINES_PER_ACTION);
                return PanelEvent::None;
            }
            KeyCode::Char('H') => {
                self.show_headers = !self.show_headers;
                self.response_scroll = 0;
                return PanelEvent::None;
            }
            _ => {}
        }

        let rows = self.rows();
        if handle_list_motion(&mut self.cursor, &key, rows.len(), self.page_size) {
            return PanelEvent::None;
        }

        let index = self.cursor.index();
        match key.code {
            KeyCode::Enter | KeyCode::Char('e') => match rows.get(index) {
                Some(Row::GroupHeader { id, .. }) if key.code == KeyCode::Enter => {
                    self.collapsed.toggle(id);
                    let after = self.rows().len();
                    let cursor = cursor_after_toggle(&rows, index, index, after);
                    self.cursor.set(cursor, after);
                }
                Some(row) => {
                    if let Some(field) = row.item() {
                        self.start_editing(field.clone());
                    }
                }
                None => {}
            },
            KeyCode::Char('s') | KeyCode::Char(' ') => return PanelEvent::SendRequest,
            _ => {}
        }
        PanelEvent::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiParameter;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn param(name: &str, location: ParameterLocation) -> ApiParameter {
        ApiParameter {
            name: name.to_string(),
            location,
            required: false,
            schema: None,
            description: None,
        }
    }

    fn endpoint(method: &str, path: &str) -> ApiEndpoint {
        ApiEndpoint {
            method: method.to_string(),
            path: path.to_string(),
            summary: None,
            description: None,
            tags: vec![],
            parameters: vec![
                param("petId", ParameterLocation::Path),
                param("verbose", ParameterLocation::Query),
            ],
            request_body: None,
            responses: vec![],
        }
    }

    fn panel(method: &str) -> RequestPanel {
        let mut panel = RequestPanel::new(Duration::ZERO);
        panel.set_subject(Some(endpoint(method, "/pets/{petId}")));
        panel
    }

    fn type_str(panel: &mut RequestPanel, s: &str) {
        for c in s.chars() {
            panel.handle_key(key(c));
        }
    }

    #[test]
    fn test_rows_group_fields_by_location() {
        let panel = panel("PUT");
        let rows = panel.rows();
        let headers: Vec<&str> = rows.iter().filter_map(Row::group_id).collect();
        assert_eq!(headers, vec!["path", "query", "body"]);
        assert_eq!(rows.len(), 6);
        assert!(matches!(
            rows[1].item(),
            Some(RequestField::Param { required: true, .. })
        ));
    }

    #[test]
    fn test_edit_param_commits_value() {
        let mut panel = panel("GET");
        panel.handle_key(key('j'));
        panel.handle_key(code(KeyCode::Enter));
        assert!(panel.is_capturing());

        type_str(&mut panel, "42");
        panel.handle_key(code(KeyCode::Enter));
        assert!(!panel.is_capturing());
        assert_eq!(panel.config().unwrap().path_params["petId"], "42");
    }

    #[test]
    fn test_cancel_discards_value() {
        let mut panel = panel("GET");
        panel.handle_key(key('j'));
        panel.handle_key(key('e'));
        type_str(&mut panel, "7");
        panel.handle_key(code(KeyCode::Esc));
        assert!(!panel.is_capturing());
        assert!(panel.config().is_none());
    }

    #[test]
    fn test_global_letters_are_captured_while_editing() {
        let mut panel = panel("GET");
        panel.handle_key(key('j'));
        panel.handle_key(code(KeyCode::Enter));
        assert_eq!(panel.handle_key(key('s')), PanelEvent::None);
        panel.handle_key(code(KeyCode::Enter));
        assert_eq!(panel.config().unwrap().path_params["petId"], "s");
        assert_eq!(panel.handle_key(key('s')), PanelEvent::SendRequest);
    }

    #[test]
    fn test_body_is_prettified_on_commit() {
        let mut panel = panel("POST");
        panel.handle_key(key('G'));
        panel.handle_key(code(KeyCode::Enter));
        panel.handle_paste(r#"{"name":"rex"}"#);
        panel.handle_key(code(KeyCode::Esc));
        panel.handle_key(code(KeyCode::Enter));
        assert_eq!(
            panel.config().unwrap().body.as_deref(),
            Some("{\n  \"name\": \"rex\"\n}")
        );
    }

    #[test]
    fn test_invalid_body_reports_status() {
        let mut panel = panel("POST");
        panel.handle_key(key('G'));
        panel.handle_key(code(KeyCode::Enter));
        panel.handle_paste("{oops");
        panel.handle_key(code(KeyCode::Esc));
        match panel.handle_key(code(KeyCode::Esc)) {
            PanelEvent::Status(message) => assert!(message.contains("Invalid JSON")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(panel.config().unwrap().body.as_deref(), Some("{oops"));
    }

    #[test]
    fn test_values_survive_switching_endpoints() {
        let mut panel = panel("GET");
        panel.handle_key(key('j'));
        panel.handle_key(code(KeyCode::Enter));
        type_str(&mut panel, "1");
        panel.handle_key(code(KeyCode::Enter));

        panel.set_subject(Some(endpoint("DELETE", "/pets/{petId}")));
        assert!(panel.config().is_none());
        panel.set_subject(Some(endpoint("GET", "/pets/{petId}")));
        assert_eq!(panel.field_value(&panel.rows()[1].item().unwrap().clone()), "1");
    }

    #[test]
    fn test_response_tracking() {
        let mut panel = panel("GET");
        let key = panel.subject().unwrap().key();
        panel.mark_executing(key.clone());
        assert!(panel.is_executing());
        panel.set_response(key, ApiResponse::error("boom".into()));
        assert!(!panel.is_executing());
        assert!(panel.response().unwrap().is_error);

        panel.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert_eq!(panel.response_scroll(), SCROLL_LINES_PER_ACTION);
        panel.clamp_response_scroll(3);
        assert_eq!(panel.response_scroll(), 2);
    }

    #[test]
    fn test_headers_toggle_resets_scroll() {
        let mut panel = panel("GET");
        panel.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(!panel.shows_headers());

        panel.handle_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT));
        assert!(panel.shows_headers());
        assert_eq!(panel.response_scroll(), 0);

        panel.handle_key(KeyEvent::new(KeyCode::Char('H'), KeyModifiers::SHIFT));
        assert!(!panel.shows_headers());
    }
}

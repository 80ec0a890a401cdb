use std::time::{Duration, Instant};

use crate::config::Config;
use crate::editor::LineEditor;
use crate::panels::{DetailPanel, EndpointListPanel, RequestPanel};
use crate::types::{
    ApiEndpoint, ApiSpec, AuthState, BackgroundEvent, LoadingState, PanelFocus, SourceInputField,
    SourceSubmission,
};

/// The two fields of the spec source modal
#[derive(Debug)]
pub struct SourceForm {
    pub spec_source: LineEditor,
    pub base_url: LineEditor,
    pub active: SourceInputField,
    pub error: Option<String>,
}

impl SourceForm {
    pub fn new(spec_source: Option<&str>, base_url: Option<&str>, batch_delay: Duration) -> Self {
        Self {
            spec_source: LineEditor::single_line(spec_source.unwrap_or_default())
                .with_batch_delay(batch_delay),
            base_url: LineEditor::single_line(base_url.unwrap_or_default())
                .with_batch_delay(batch_delay),
            active: SourceInputField::SpecSource,
            error: None,
        }
    }

    pub fn active_editor(&mut self) -> &mut LineEditor {
        match self.active {
            SourceInputField::SpecSource => &mut self.spec_source,
            SourceInputField::BaseUrl => &mut self.base_url,
        }
    }

    pub fn switch_field(&mut self) {
        self.active = match self.active {
            SourceInputField::SpecSource => SourceInputField::BaseUrl,
            SourceInputField::BaseUrl => SourceInputField::SpecSource,
        };
    }

    /// Flushes both editors and reads the trimmed values
    pub fn submission(&mut self) -> SourceSubmission {
        let base_url = self.base_url.value().trim().to_string();
        SourceSubmission {
            spec_source: self.spec_source.value().trim().to_string(),
            base_url: (!base_url.is_empty()).then_some(base_url),
        }
    }

    fn editors(&self) -> [&LineEditor; 2] {
        [&self.spec_source, &self.base_url]
    }
}

/// Modal layer drawn over the panels
#[derive(Debug, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Token(LineEditor),
    Source(SourceForm),
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, Overlay::None)
    }
}

#[derive(Debug)]
pub struct AppState {
    pub spec: ApiSpec,
    pub loading_state: LoadingState,
    pub retry_count: u32,
    pub spec_source: Option<String>,
    pub base_url: Option<String>,
    pub auth: AuthState,

    /// Which panel receives keys
    pub focus: PanelFocus,
    /// Focused panel takes the whole body area
    pub fullscreen: bool,
    pub overlay: Overlay,
    /// One-line message shown in the footer until the next key
    pub status_message: Option<String>,
    pub should_quit: bool,

    pub endpoints: EndpointListPanel,
    pub detail: DetailPanel,
    pub request: RequestPanel,

    pub batch_delay: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let batch_delay = config.ui.paste_batch_delay();
        Self {
            spec: ApiSpec::default(),
            loading_state: LoadingState::Idle,
            retry_count: 0,
            spec_source: config.server.spec_source.clone(),
            base_url: config.server.base_url.clone(),
            auth: AuthState::new(),
            focus: PanelFocus::Endpoints,
            fullscreen: false,
            overlay: Overlay::None,
            status_message: None,
            should_quit: false,
            endpoints: EndpointListPanel::new(config.ui.groups_expanded, batch_delay),
            detail: DetailPanel::new(),
            request: RequestPanel::new(batch_delay),
            batch_delay,
        }
    }

    /// True while keystrokes belong to a text field rather than to global bindings
    pub fn is_capturing(&self) -> bool {
        matches!(self.overlay, Overlay::Token(_) | Overlay::Source(_))
            || self.endpoints.is_capturing()
            || self.request.is_capturing()
    }

    /// Flush any paste batch whose timer has expired. Returns true if text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let overlay = match &mut self.overlay {
            Overlay::Token(editor) => editor.tick(now),
            Overlay::Source(form) => {
                let a = form.spec_source.tick(now);
                let b = form.base_url.tick(now);
                a || b
            }
            Overlay::None | Overlay::Help => false,
        };
        let endpoints = self.endpoints.tick(now);
        let request = self.request.tick(now);
        if endpoints {
            self.sync_subject();
        }
        overlay || endpoints || request
    }

    /// Time until the earliest pending paste batch is due
    pub fn next_flush_in(&self, now: Instant) -> Option<Duration> {
        let overlay = match &self.overlay {
            Overlay::Token(editor) => editor.next_flush_in(now),
            Overlay::Source(form) => form
                .editors()
                .iter()
                .filter_map(|e| e.next_flush_in(now))
                .min(),
            Overlay::None | Overlay::Help => None,
        };
        [
            overlay,
            self.endpoints.next_flush_in(now),
            self.request.next_flush_in(now),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn begin_loading(&mut self) {
        self.loading_state = LoadingState::Fetching;
    }

    pub fn handle_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Parsing => self.loading_state = LoadingState::Parsing,
            BackgroundEvent::SpecLoaded(spec) => {
                self.endpoints.set_endpoints(&spec.endpoints);
                self.request.clear();
                self.detail.set_subject(None);
                self.spec = spec;
                self.loading_state = LoadingState::Complete;
                self.retry_count = 0;
                self.sync_subject();
            }
            BackgroundEvent::SpecFailed(message) => {
                self.loading_state = LoadingState::Error(message);
            }
            BackgroundEvent::Response {
                endpoint_key,
                response,
            } => self.request.set_response(endpoint_key, response),
        }
    }

    /// Point the detail and request panels at the highlighted endpoint
    pub fn sync_subject(&mut self) {
        let key = self.endpoints.highlighted_key();
        let same = |subject: Option<&ApiEndpoint>| subject.map(ApiEndpoint::key) == key;
        if same(self.detail.subject()) && same(self.request.subject()) {
            return;
        }
        let endpoint = self.endpoints.highlighted();
        self.detail.set_subject(endpoint.clone());
        self.request.set_subject(endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiEndpoint, ApiResponse};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn endpoint(method: &str, path: &str, tag: &str) -> ApiEndpoint {
        ApiEndpoint {
            method: method.to_string(),
            path: path.to_string(),
            summary: None,
            description: None,
            tags: vec![tag.to_string()],
            parameters: vec![],
            request_body: None,
            responses: vec![],
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(&Config::default());
        state.handle_background(BackgroundEvent::SpecLoaded(ApiSpec {
            title: Some("Petstore".into()),
            version: None,
            endpoints: vec![
                endpoint("GET", "/pets", "pets"),
                endpoint("POST", "/pets", "pets"),
            ],
            schemas: Default::default(),
        }));
        state
    }

    #[test]
    fn test_spec_loaded_resets_state() {
        let mut state = AppState::new(&Config::default());
        state.retry_count = 2;
        state.handle_background(BackgroundEvent::Parsing);
        assert_eq!(state.loading_state, LoadingState::Parsing);

        state.handle_background(BackgroundEvent::SpecLoaded(loaded_state().spec));
        assert_eq!(state.loading_state, LoadingState::Complete);
        assert_eq!(state.retry_count, 0);
        assert_eq!(state.endpoints.endpoint_count(), 2);
        // Cursor sits on the "pets" header, so nothing is highlighted yet
        assert!(state.detail.subject().is_none());
    }

    #[test]
    fn test_subject_follows_highlight() {
        let mut state = loaded_state();
        state
            .endpoints
            .handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        state.sync_subject();
        assert_eq!(
            state.detail.subject().map(ApiEndpoint::key).as_deref(),
            Some("GET /pets")
        );
        assert_eq!(
            state.request.subject().map(ApiEndpoint::key).as_deref(),
            Some("GET /pets")
        );
    }

    #[test]
    fn test_spec_failed_is_renderable() {
        let mut state = AppState::new(&Config::default());
        state.begin_loading();
        assert_eq!(state.loading_state, LoadingState::Fetching);
        state.handle_background(BackgroundEvent::SpecFailed("Network error".into()));
        assert_eq!(
            state.loading_state,
            LoadingState::Error("Network error".into())
        );
    }

    #[test]
    fn test_response_event_is_stored() {
        let mut state = loaded_state();
        state
            .endpoints
            .handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        state.sync_subject();
        state.request.mark_executing("GET /pets".into());
        assert!(state.request.is_executing());

        state.handle_background(BackgroundEvent::Response {
            endpoint_key: "GET /pets".into(),
            response: ApiResponse::error("Request failed".into()),
        });
        assert!(!state.request.any_executing());
        assert!(state.request.response().is_some_and(|r| r.is_error));
    }

    #[test]
    fn test_capturing_overlays() {
        let mut state = AppState::new(&Config::default());
        assert!(!state.is_capturing());
        state.overlay = Overlay::Help;
        assert!(!state.is_capturing());
        state.overlay = Overlay::Token(LineEditor::single_line(""));
        assert!(state.is_capturing());
        state.overlay = Overlay::Source(SourceForm::new(None, None, state.batch_delay));
        assert!(state.is_capturing());
    }

    #[test]
    fn test_source_form_submission() {
        let mut form = SourceForm::new(Some(" ./openapi.yaml "), None, Duration::ZERO);
        assert_eq!(
            form.submission(),
            SourceSubmission {
                spec_source: "./openapi.yaml".into(),
                base_url: None,
            }
        );
        form.switch_field();
        assert_eq!(form.active, SourceInputField::BaseUrl);
        form.active_editor().handle_paste("http://localhost:8080");
        assert_eq!(
            form.submission().base_url.as_deref(),
            Some("http://localhost:8080")
        );
    }
}

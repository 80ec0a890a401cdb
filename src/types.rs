use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Named schemas from `components/schemas` (or `definitions` in Swagger 2)
pub type SchemaRegistry = BTreeMap<String, Schema>;

/// A parsed API description, as handed over by the loader
#[derive(Debug, Clone, Default)]
pub struct ApiSpec {
    pub title: Option<String>,
    pub version: Option<String>,
    pub endpoints: Vec<ApiEndpoint>,
    pub schemas: SchemaRegistry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<ApiParameter>,
    pub request_body: Option<RequestBodySpec>,
    pub responses: Vec<ResponseSpec>,
}

impl ApiEndpoint {
    /// Stable identity used to detect subject changes between panels
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Get all path parameters for this endpoint
    pub fn path_params(&self) -> Vec<&ApiParameter> {
        self.params_in(ParameterLocation::Path)
    }

    /// Get all query parameters for this endpoint
    pub fn query_params(&self) -> Vec<&ApiParameter> {
        self.params_in(ParameterLocation::Query)
    }

    pub fn header_params(&self) -> Vec<&ApiParameter> {
        self.params_in(ParameterLocation::Header)
    }

    fn params_in(&self, location: ParameterLocation) -> Vec<&ApiParameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == location)
            .collect()
    }

    /// Check if all required path parameters have values in the given config
    pub fn has_all_required_path_params(&self, config: &RequestConfig) -> bool {
        self.missing_path_params(config).is_empty()
    }

    /// Get list of missing path parameter names
    pub fn missing_path_params(&self, config: &RequestConfig) -> Vec<String> {
        self.path_params()
            .iter()
            .filter(|param| {
                config
                    .path_params
                    .get(&param.name)
                    .map(|v| v.is_empty())
                    .unwrap_or(true)
            })
            .map(|param| param.name.clone())
            .collect()
    }

    /// Check if this endpoint supports request body (POST/PUT/PATCH)
    pub fn supports_body(&self) -> bool {
        self.request_body.is_some()
            || matches!(
                self.method.to_uppercase().as_str(),
                "POST" | "PUT" | "PATCH"
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Schema>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodySpec {
    pub content_type: String,
    pub required: bool,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    /// Status code or `default`
    pub status: String,
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    AllOf,
    OneOf,
    AnyOf,
}

impl CompositionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
        }
    }
}

/// Typed schema tree. References stay symbolic and are resolved
/// against a [`SchemaRegistry`] while rows are built.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object {
        properties: Vec<(String, Schema)>,
        required: Vec<String>,
    },
    Array(Box<Schema>),
    Primitive {
        type_name: String,
        format: Option<String>,
        enum_values: Vec<String>,
    },
    Composition {
        kind: CompositionKind,
        members: Vec<Schema>,
    },
    Ref(String),
    Any,
}

impl Schema {
    pub fn primitive(type_name: &str) -> Self {
        Schema::Primitive {
            type_name: type_name.to_string(),
            format: None,
            enum_values: Vec::new(),
        }
    }

    /// One-line type description shown next to a field name
    pub fn type_summary(&self) -> String {
        match self {
            Schema::Object { .. } => "object".to_string(),
            Schema::Array(items) => format!("{}[]", items.type_summary()),
            Schema::Primitive {
                type_name,
                format,
                enum_values,
            } => {
                let mut summary = match format {
                    Some(format) => format!("{type_name}({format})"),
                    None => type_name.clone(),
                };
                if !enum_values.is_empty() {
                    summary.push_str(" enum");
                }
                summary
            }
            Schema::Composition { kind, members } => {
                format!("{}({})", kind.label(), members.len())
            }
            Schema::Ref(name) => name.clone(),
            Schema::Any => "any".to_string(),
        }
    }

    /// Name of the referenced schema, looking through arrays
    pub fn reference(&self) -> Option<&str> {
        match self {
            Schema::Ref(name) => Some(name),
            Schema::Array(items) => items.reference(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub header_params: HashMap<String, String>,
    pub body: Option<String>,
}

impl RequestConfig {
    pub fn value(&self, location: ParameterLocation, name: &str) -> Option<&str> {
        let map = match location {
            ParameterLocation::Path => &self.path_params,
            ParameterLocation::Query => &self.query_params,
            ParameterLocation::Header | ParameterLocation::Cookie => &self.header_params,
        };
        map.get(name).map(String::as_str)
    }

    pub fn set_value(&mut self, location: ParameterLocation, name: String, value: String) {
        let map = match location {
            ParameterLocation::Path => &mut self.path_params,
            ParameterLocation::Query => &mut self.query_params,
            ParameterLocation::Header | ParameterLocation::Cookie => &mut self.header_params,
        };
        map.insert(name, value);
    }
}

/// Represents an HTTP response from an API endpoint
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (200, 404, etc.)
    pub status: u16,

    /// Human-readable status text ("OK", "Not Found", etc.)
    pub status_text: String,

    /// Response headers as key-value pairs (keys normalized to lowercase)
    pub headers: HashMap<String, String>,

    pub body: String,

    pub duration: Duration,

    /// True if this was a network error (timeout, connection refused, etc.)
    /// False if we got an HTTP response (even if 4xx/5xx)
    pub is_error: bool,

    pub error_message: Option<String>,
}

impl ApiResponse {
    /// Creates an error response with the given error message
    pub fn error(error_message: String) -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: HashMap::new(),
            body: String::new(),
            duration: Duration::from_secs(0),
            is_error: true,
            error_message: Some(error_message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    Idle,
    Fetching,
    Parsing,
    Complete,
    Error(String),
}

/// Results delivered by the loader and the HTTP executor
#[derive(Debug)]
pub enum BackgroundEvent {
    Parsing,
    SpecLoaded(ApiSpec),
    SpecFailed(String),
    Response {
        endpoint_key: String,
        response: ApiResponse,
    },
}

/// Tracks which panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Endpoints,
    Detail,
    Request,
}

impl PanelFocus {
    pub fn next(self) -> Self {
        match self {
            Self::Endpoints => Self::Detail,
            Self::Detail => Self::Request,
            Self::Request => Self::Endpoints,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Endpoints => Self::Request,
            Self::Detail => Self::Endpoints,
            Self::Request => Self::Detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInputField {
    SpecSource,
    BaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSubmission {
    pub spec_source: String,
    pub base_url: Option<String>,
}

/// Bearer token held in memory for the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_empty())
    }

    pub fn set_token(&mut self, token: String) {
        let token = token.trim().to_string();
        self.token = (!token.is_empty()).then_some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Show the first and last four characters only
    pub fn get_masked_display(&self) -> String {
        match &self.token {
            Some(token) => {
                let chars: Vec<char> = token.chars().collect();
                if chars.len() <= 8 {
                    "*".repeat(chars.len())
                } else {
                    let head: String = chars[..4].iter().collect();
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{head}...{tail}")
                }
            }
            None => String::new(),
        }
    }
}

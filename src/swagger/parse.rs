use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::types::{
    ApiEndpoint, ApiParameter, ApiSpec, CompositionKind, ParameterLocation, RequestBodySpec,
    ResponseSpec, Schema, SchemaRegistry,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw OpenAPI 3 / Swagger 2 document, only the parts that are displayed
#[derive(Debug, Default, Deserialize)]
pub struct SwaggerSpec {
    pub info: Option<Info>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    pub components: Option<Components>,
    /// Swagger 2 named schemas
    #[serde(default)]
    pub definitions: BTreeMap<String, RawSchema>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, RawSchema>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    pub head: Option<Operation>,
    pub options: Option<Operation>,
    /// Shared by every operation on the path
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    #[serde(rename = "requestBody")]
    pub request_body: Option<RawRequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, RawResponse>,
    /// Swagger 2 request content types
    #[serde(default)]
    pub consumes: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawParameter {
    pub name: Option<String>,
    #[serde(rename = "in")]
    pub location: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<RawSchema>,
    /// Swagger 2 keeps the type on the parameter itself
    #[serde(rename = "type")]
    pub type_name: Option<Value>,
    pub format: Option<String>,
    pub items: Option<Box<RawSchema>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<RawSchema>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawResponse {
    pub description: Option<String>,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
    /// Swagger 2 response schema
    pub schema: Option<RawSchema>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<Value>,
    pub format: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub properties: Option<BTreeMap<String, RawSchema>>,
    #[serde(default)]
    pub required: Vec<String>,
    pub items: Option<Box<RawSchema>>,
    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<RawSchema>>,
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<RawSchema>>,
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<RawSchema>>,
}

/// Parse a JSON or YAML document into an [`ApiSpec`]
pub fn parse_spec_text(text: &str) -> Result<ApiSpec> {
    let trimmed = text.trim_start();
    let spec: SwaggerSpec = if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).context("invalid JSON document")?
    } else {
        serde_yaml::from_str(trimmed).context("invalid YAML document")?
    };
    Ok(parse_swagger_spec(spec))
}

pub fn parse_swagger_spec(spec: SwaggerSpec) -> ApiSpec {
    let raw_schemas = match spec.components {
        Some(components) if !components.schemas.is_empty() => components.schemas,
        _ => spec.definitions,
    };
    let schemas: SchemaRegistry = raw_schemas
        .into_iter()
        .map(|(name, raw)| (name, convert_schema(&raw)))
        .collect();

    let mut endpoints: Vec<ApiEndpoint> = Vec::new();
    for (path, path_item) in &spec.paths {
        let operations = [
            ("GET", &path_item.get),
            ("POST", &path_item.post),
            ("PUT", &path_item.put),
            ("PATCH", &path_item.patch),
            ("DELETE", &path_item.delete),
            ("HEAD", &path_item.head),
            ("OPTIONS", &path_item.options),
        ];
        for (method, op) in operations {
            if let Some(op) = op {
                endpoints.push(convert_operation(method, path, op, &path_item.parameters));
            }
        }
    }

    let (title, version) = spec
        .info
        .map(|info| (info.title, info.version))
        .unwrap_or_default();

    ApiSpec {
        title,
        version,
        endpoints,
        schemas,
    }
}

fn convert_operation(
    method: &str,
    path: &str,
    op: &Operation,
    shared: &[RawParameter],
) -> ApiEndpoint {
    // Operation parameters override path-level ones with the same name and location
    let mut raw_params: Vec<&RawParameter> = shared
        .iter()
        .filter(|s| {
            !op.parameters
                .iter()
                .any(|p| p.name == s.name && p.location == s.location)
        })
        .collect();
    raw_params.extend(op.parameters.iter());

    let mut parameters = Vec::new();
    let mut request_body = op.request_body.as_ref().map(convert_request_body);

    for raw in raw_params {
        let (Some(name), Some(location)) = (&raw.name, &raw.location) else {
            continue;
        };
        if location == "body" {
            request_body = Some(RequestBodySpec {
                content_type: op
                    .consumes
                    .first()
                    .cloned()
                    .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string()),
                required: raw.required,
                schema: raw.schema.as_ref().map(convert_schema),
            });
            continue;
        }
        let Some(location) = ParameterLocation::parse(location) else {
            continue;
        };
        parameters.push(ApiParameter {
            name: name.clone(),
            location,
            required: raw.required || location == ParameterLocation::Path,
            schema: parameter_schema(raw),
            description: raw.description.clone(),
        });
    }

    let responses = op
        .responses
        .iter()
        .map(|(status, response)| ResponseSpec {
            status: status.clone(),
            description: response.description.clone(),
            schema: response
                .schema
                .as_ref()
                .or_else(|| preferred_media(&response.content).and_then(|m| m.schema.as_ref()))
                .map(convert_schema),
        })
        .collect();

    ApiEndpoint {
        method: method.to_string(),
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        request_body,
        responses,
    }
}

fn preferred_media(content: &BTreeMap<String, MediaType>) -> Option<&MediaType> {
    content
        .get(JSON_CONTENT_TYPE)
        .or_else(|| content.values().next())
}

fn convert_request_body(body: &RawRequestBody) -> RequestBodySpec {
    let content_type = if body.content.contains_key(JSON_CONTENT_TYPE) {
        JSON_CONTENT_TYPE.to_string()
    } else {
        body.content
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string())
    };
    RequestBodySpec {
        schema: body
            .content
            .get(&content_type)
            .and_then(|m| m.schema.as_ref())
            .map(convert_schema),
        content_type,
        required: body.required,
    }
}

fn parameter_schema(raw: &RawParameter) -> Option<Schema> {
    if let Some(schema) = &raw.schema {
        return Some(convert_schema(schema));
    }
    raw.type_name.as_ref()?;
    Some(convert_schema(&RawSchema {
        type_name: raw.type_name.clone(),
        format: raw.format.clone(),
        items: raw.items.clone(),
        ..Default::default()
    }))
}

/// Name of the schema a `$ref` points at
pub fn ref_name(reference: &str) -> String {
    for prefix in ["#/components/schemas/", "#/definitions/"] {
        if let Some(name) = reference.strip_prefix(prefix) {
            return name.to_string();
        }
    }
    reference
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_string()
}

/// `type` may be a string or (OpenAPI 3.1) a list that includes "null"
fn type_name(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|s| *s != "null")
            .map(str::to_string),
        _ => None,
    }
}

fn enum_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn convert_schema(raw: &RawSchema) -> Schema {
    if let Some(reference) = &raw.reference {
        return Schema::Ref(ref_name(reference));
    }

    for (kind, members) in [
        (CompositionKind::AllOf, &raw.all_of),
        (CompositionKind::OneOf, &raw.one_of),
        (CompositionKind::AnyOf, &raw.any_of),
    ] {
        if let Some(members) = members.as_ref().filter(|m| !m.is_empty()) {
            return Schema::Composition {
                kind,
                members: members.iter().map(convert_schema).collect(),
            };
        }
    }

    let type_name = type_name(&raw.type_name);
    match (type_name.as_deref(), &raw.properties, &raw.items) {
        (_, Some(properties), _) => Schema::Object {
            properties: properties
                .iter()
                .map(|(name, schema)| (name.clone(), convert_schema(schema)))
                .collect(),
            required: raw.required.clone(),
        },
        (Some("object"), None, _) => Schema::Object {
            properties: Vec::new(),
            required: Vec::new(),
        },
        (Some("array"), _, items) | (None, _, items @ Some(_)) => Schema::Array(Box::new(
            items
                .as_deref()
                .map(convert_schema)
                .unwrap_or(Schema::Any),
        )),
        (Some(type_name), _, _) => Schema::Primitive {
            type_name: type_name.to_string(),
            format: raw.format.clone(),
            enum_values: raw
                .enum_values
                .iter()
                .flatten()
                .map(enum_label)
                .collect(),
        },
        (None, None, None) => Schema::Any,
    }
}

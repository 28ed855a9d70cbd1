//! Tool descriptors handed to the MCP server template.
//!
//! One tool per operation. These are plain serializable values; rendering
//! them into server code is the template stage's job.

use serde::Serialize;

use crate::model::{Operation, Parameter, ParameterLocation, ParsedApi};
use crate::schema::{PrimitiveKind, SchemaNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerManifest {
    pub title: String,
    pub version: String,
    pub base_url: String,
    pub package_name: String,
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Upper-cased HTTP method.
    pub method: String,
    pub path: String,
    pub parameters: Vec<ToolParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ToolRequestBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolParameter {
    pub name: String,
    /// JSON Schema type name used in the tool's input schema.
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub required: bool,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRequestBody {
    pub description: String,
    pub required: bool,
}

impl ServerManifest {
    /// `fallback_base_url` is used when the document declares no servers.
    #[must_use]
    pub fn from_api(api: &ParsedApi, fallback_base_url: &str) -> Self {
        Self {
            title: api.info.title.clone(),
            version: api.info.version.clone(),
            base_url: api.base_url().unwrap_or(fallback_base_url).to_string(),
            package_name: package_name(&api.info.title),
            tools: api.operations.iter().map(ToolDescriptor::from_operation).collect(),
        }
    }
}

impl ToolDescriptor {
    #[must_use]
    pub fn from_operation(operation: &Operation) -> Self {
        let method: String = operation.method.to_uppercase();
        let description: String = operation
            .description
            .clone()
            .or_else(|| operation.summary.clone())
            .unwrap_or_else(|| format!("{method} {}", operation.path));
        Self {
            name: operation.operation_id.clone(),
            description,
            method,
            path: operation.path.clone(),
            parameters: operation.parameters.iter().map(ToolParameter::from_parameter).collect(),
            request_body: operation.request_body.as_ref().map(|body| ToolRequestBody {
                description: body
                    .description
                    .clone()
                    .unwrap_or_else(|| "Request body".to_string()),
                required: body.required,
            }),
        }
    }
}

impl ToolParameter {
    fn from_parameter(parameter: &Parameter) -> Self {
        Self {
            name: parameter.name.clone(),
            kind: simple_type(parameter.schema.as_ref()),
            description: parameter
                .description
                .clone()
                .unwrap_or_else(|| format!("{} parameter", parameter.name)),
            required: parameter.required,
            location: parameter.location,
        }
    }
}

/// Coarse JSON type of a parameter schema; anything unrecognized is `string`.
fn simple_type(schema: Option<&SchemaNode>) -> &'static str {
    match schema {
        Some(SchemaNode::Primitive(PrimitiveKind::Number)) => "number",
        Some(SchemaNode::Primitive(PrimitiveKind::Boolean)) => "boolean",
        Some(SchemaNode::Array(_)) => "array",
        Some(SchemaNode::Object { .. }) => "object",
        _ => "string",
    }
}

/// Title lower-cased, every character outside `[a-z0-9]` replaced by `-`,
/// with `-mcp-server` appended.
#[must_use]
pub fn package_name(title: &str) -> String {
    let base: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();
    format!("{base}-mcp-server")
}

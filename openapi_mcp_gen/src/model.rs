//! Canonical, flattened view of a description document.

use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::{SchemaNode, SchemaRegistry};

/// Media type whose schema the type compiler consumes.
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRef {
    pub url: String,
    pub description: Option<String>,
}

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Parses the `in` field of a parameter object.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<SchemaNode>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    /// Media type -> schema. Media types without a schema are not kept.
    pub content: IndexMap<String, SchemaNode>,
}

impl RequestBody {
    #[must_use]
    pub fn json_schema(&self) -> Option<&SchemaNode> {
        self.content.get(JSON_MEDIA_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub description: String,
    pub content: Option<IndexMap<String, SchemaNode>>,
}

impl ResponseSpec {
    #[must_use]
    pub fn json_schema(&self) -> Option<&SchemaNode> {
        self.content.as_ref()?.get(JSON_MEDIA_TYPE)
    }
}

/// One `(path, method)` pair that declares `responses`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub path: String,
    /// Lower-cased HTTP method.
    pub method: String,
    pub operation_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Status code -> response, in document order.
    pub responses: IndexMap<String, ResponseSpec>,
}

/// Output of [`crate::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedApi {
    pub info: ApiInfo,
    pub servers: Vec<ServerRef>,
    pub operations: Vec<Operation>,
    pub schemas: SchemaRegistry,
}

impl ParsedApi {
    /// URL of the first declared server, the conventional default base URL.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.servers.first().map(|server| server.url.as_str())
    }
}

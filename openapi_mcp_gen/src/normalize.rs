//! Flattens a description document into a [`ParsedApi`].
//!
//! Walks the raw document (as `serde_json::Value`). The document is assumed to
//! have been validated upstream; this pass only rejects what it cannot
//! interpret at all.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::NormalizeError;
use crate::json_pointer;
use crate::model::{
    ApiInfo, JSON_MEDIA_TYPE, Operation, Parameter, ParameterLocation, ParsedApi, RequestBody,
    ResponseSpec, ServerRef,
};
use crate::schema::{SchemaNode, SchemaRegistry};
use crate::settings::GenerateSettings;

/// Normalize with the default settings (`$ref` parameters, request bodies and
/// responses are dropped).
///
/// # Errors
///
/// See [`normalize_with_settings`].
pub fn normalize(document: &Value) -> Result<ParsedApi, NormalizeError> {
    normalize_with_settings(document, &GenerateSettings::default())
}

/// Normalize a parsed description document.
///
/// Both OpenAPI 3.x and Swagger 2.0 documents are accepted. Swagger `body`
/// parameters become the request body, response `schema`s become
/// `application/json` content and `definitions` fill the schema registry.
///
/// # Errors
///
/// Returns `MalformedDocument` if `info.title` or `info.version` is absent,
/// `UnsupportedDocument` if the document is neither an OpenAPI 3.x nor a
/// Swagger 2.0 object, and `UnresolvedReference` if `resolve_component_refs`
/// is set and a `$ref` cannot be followed.
pub fn normalize_with_settings(
    document: &Value,
    settings: &GenerateSettings,
) -> Result<ParsedApi, NormalizeError> {
    let root: &Map<String, Value> = document
        .as_object()
        .ok_or_else(|| unsupported("document root is not an object"))?;
    let dialect: Dialect = check_dialect(root)?;
    Normalizer {
        document,
        dialect,
        resolve_refs: settings.resolve_component_refs,
    }
    .run(root)
}

/// Synthesized operationId: the method followed by the path with everything
/// outside `[A-Za-z0-9]` removed (`get` + `/users/{id}` -> `getusersid`).
#[must_use]
pub fn fallback_operation_id(method: &str, path: &str) -> String {
    let stripped: String = path.chars().filter(char::is_ascii_alphanumeric).collect();
    format!("{}{stripped}", method.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    OpenApi3,
    Swagger2,
}

struct Normalizer<'a> {
    document: &'a Value,
    dialect: Dialect,
    resolve_refs: bool,
}

impl<'a> Normalizer<'a> {
    fn run(&self, root: &'a Map<String, Value>) -> Result<ParsedApi, NormalizeError> {
        let info: ApiInfo = parse_info(root)?;
        let (servers, schemas): (Vec<ServerRef>, SchemaRegistry) = match self.dialect {
            Dialect::OpenApi3 => (parse_servers(root), parse_schemas(root)?),
            Dialect::Swagger2 => (parse_swagger_host(root), parse_definitions(root)?),
        };
        let operations: Vec<Operation> = self.parse_operations(root)?;

        info!(
            title = %info.title,
            dialect = ?self.dialect,
            operations = operations.len(),
            schemas = schemas.len(),
            "normalized description document"
        );

        Ok(ParsedApi {
            info,
            servers,
            operations,
            schemas,
        })
    }

    fn parse_operations(
        &self,
        root: &'a Map<String, Value>,
    ) -> Result<Vec<Operation>, NormalizeError> {
        let paths: &'a Map<String, Value> = match root.get("paths") {
            None => return Ok(Vec::new()),
            Some(Value::Object(paths)) => paths,
            Some(_) => return Err(unsupported("`paths` must be an object")),
        };

        let mut operations: Vec<Operation> = Vec::new();
        for (path, item) in paths {
            let location: String = json_pointer::format("/paths", path);
            let Some(item) = item.as_object() else {
                debug!(%location, "skipping path item that is not an object");
                continue;
            };
            for (method, candidate) in item {
                // Shared path-level fields (parameters, summary, servers) have no responses.
                let Some(op) = candidate
                    .as_object()
                    .filter(|op| op.contains_key("responses"))
                else {
                    continue;
                };
                let op_location: String = json_pointer::format(&location, method);
                operations.push(self.parse_operation(path, method, op, &op_location)?);
            }
        }
        Ok(operations)
    }

    fn parse_operation(
        &self,
        path: &str,
        method: &str,
        op: &'a Map<String, Value>,
        location: &str,
    ) -> Result<Operation, NormalizeError> {
        let method: String = method.to_lowercase();
        let operation_id: String = op
            .get("operationId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map_or_else(|| fallback_operation_id(&method, path), String::from);

        let (parameters, body_parameter): (Vec<Parameter>, Option<RequestBody>) =
            self.parse_parameters(op, location)?;

        let request_body: Option<RequestBody> = match op.get("requestBody") {
            Some(raw) if self.dialect == Dialect::OpenApi3 => self
                .follow(raw, &json_pointer::format(location, "requestBody"))?
                .filter(|body| body.is_object())
                .map(parse_request_body),
            _ => body_parameter,
        };

        let mut responses: IndexMap<String, ResponseSpec> = IndexMap::new();
        if let Some(raw_responses) = op.get("responses").and_then(Value::as_object) {
            let responses_location: String = json_pointer::format(location, "responses");
            for (status, raw) in raw_responses {
                let Some(raw) =
                    self.follow(raw, &json_pointer::format(&responses_location, status))?
                else {
                    continue;
                };
                let content: Option<IndexMap<String, SchemaNode>> = match self.dialect {
                    Dialect::OpenApi3 => parse_content(raw),
                    Dialect::Swagger2 => raw.get("schema").map(json_content),
                };
                responses.insert(
                    status.clone(),
                    ResponseSpec {
                        description: string_field(raw, "description").unwrap_or_default(),
                        content,
                    },
                );
            }
        }

        Ok(Operation {
            path: path.to_string(),
            method,
            operation_id,
            summary: op.get("summary").and_then(Value::as_str).map(String::from),
            description: op.get("description").and_then(Value::as_str).map(String::from),
            parameters,
            request_body,
            responses,
        })
    }

    /// Extracts the parameter list. A Swagger 2.0 `in: body` parameter is
    /// returned separately as the operation's request body.
    fn parse_parameters(
        &self,
        op: &'a Map<String, Value>,
        location: &str,
    ) -> Result<(Vec<Parameter>, Option<RequestBody>), NormalizeError> {
        let Some(list) = op.get("parameters").and_then(Value::as_array) else {
            return Ok((Vec::new(), None));
        };
        let list_location: String = json_pointer::format(location, "parameters");

        let mut parameters: Vec<Parameter> = Vec::with_capacity(list.len());
        let mut body: Option<RequestBody> = None;
        for (index, raw) in list.iter().enumerate() {
            let here: String = json_pointer::format(&list_location, &index.to_string());
            let Some(raw) = self.follow(raw, &here)? else {
                continue;
            };
            let Some(name) = raw.get("name").and_then(Value::as_str) else {
                debug!(location = %here, "skipping parameter without a name");
                continue;
            };
            let raw_location: Option<&str> = raw.get("in").and_then(Value::as_str);
            if self.dialect == Dialect::Swagger2 && raw_location == Some("body") {
                body = Some(RequestBody {
                    description: string_field(raw, "description"),
                    required: bool_field(raw, "required"),
                    content: raw.get("schema").map(json_content).unwrap_or_default(),
                });
                continue;
            }
            let Some(parameter_location) = raw_location.and_then(ParameterLocation::parse) else {
                debug!(location = %here, name, "skipping parameter with unsupported location");
                continue;
            };
            // Swagger 2.0 puts `type`/`enum`/`items` on the parameter itself.
            let schema: Option<SchemaNode> = match self.dialect {
                Dialect::OpenApi3 => raw.get("schema").map(SchemaNode::from_value),
                Dialect::Swagger2 => raw.get("type").map(|_| SchemaNode::from_value(raw)),
            };
            parameters.push(Parameter {
                name: name.to_string(),
                location: parameter_location,
                required: bool_field(raw, "required"),
                schema,
                description: string_field(raw, "description"),
            });
        }
        Ok((parameters, body))
    }

    /// Returns the value behind `value`, following `$ref` chains when
    /// resolution is enabled. `Ok(None)` means the entry was a reference and
    /// is dropped.
    fn follow(
        &self,
        value: &'a Value,
        location: &str,
    ) -> Result<Option<&'a Value>, NormalizeError> {
        let Some(mut reference) = ref_target(value) else {
            return Ok(Some(value));
        };
        if !self.resolve_refs {
            debug!(location, reference, "dropping $ref entry");
            return Ok(None);
        }

        let mut seen: Vec<&'a str> = Vec::new();
        loop {
            if seen.contains(&reference) {
                return Err(unresolved(reference));
            }
            seen.push(reference);
            let target: &'a Value = json_pointer::resolve(self.document, reference)
                .ok_or_else(|| unresolved(reference))?;
            match ref_target(target) {
                Some(next) => reference = next,
                None => return Ok(Some(target)),
            }
        }
    }
}

fn check_dialect(root: &Map<String, Value>) -> Result<Dialect, NormalizeError> {
    match (root.get("openapi"), root.get("swagger")) {
        (Some(Value::String(version)), _) if version.starts_with("3.") => Ok(Dialect::OpenApi3),
        (Some(Value::String(version)), _) => Err(unsupported(format!(
            "OpenAPI version `{version}` is not supported"
        ))),
        (Some(_), _) => Err(unsupported("`openapi` must be a version string")),
        (None, Some(Value::String(version))) if version == "2.0" => Ok(Dialect::Swagger2),
        (None, Some(version)) => Err(unsupported(format!(
            "Swagger version `{version}` is not supported"
        ))),
        (None, None) => Err(unsupported("missing `openapi` version field")),
    }
}

fn parse_info(root: &Map<String, Value>) -> Result<ApiInfo, NormalizeError> {
    let info: Option<&Value> = root.get("info");
    let required = |key: &str, field: &'static str| -> Result<String, NormalizeError> {
        info.and_then(|info| string_field(info, key))
            .ok_or(NormalizeError::MalformedDocument { field })
    };
    Ok(ApiInfo {
        title: required("title", "info.title")?,
        version: required("version", "info.version")?,
        description: info.and_then(|info| string_field(info, "description")),
    })
}

fn parse_servers(root: &Map<String, Value>) -> Vec<ServerRef> {
    root.get("servers")
        .and_then(Value::as_array)
        .map(|servers| {
            servers
                .iter()
                .filter_map(|server| {
                    Some(ServerRef {
                        url: string_field(server, "url")?,
                        description: string_field(server, "description"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_schemas(root: &Map<String, Value>) -> Result<SchemaRegistry, NormalizeError> {
    let components: &Map<String, Value> = match root.get("components") {
        None => return Ok(SchemaRegistry::new()),
        Some(Value::Object(components)) => components,
        Some(_) => return Err(unsupported("`components` must be an object")),
    };
    Ok(components
        .get("schemas")
        .and_then(Value::as_object)
        .map(|schemas| {
            schemas
                .iter()
                .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                .collect()
        })
        .unwrap_or_default())
}

/// Swagger 2.0 server from `schemes`, `host` and `basePath`. No `host` means
/// no server.
fn parse_swagger_host(root: &Map<String, Value>) -> Vec<ServerRef> {
    let Some(host) = root.get("host").and_then(Value::as_str) else {
        return Vec::new();
    };
    let scheme: &str = root
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");
    let base_path: &str = root.get("basePath").and_then(Value::as_str).unwrap_or("");
    vec![ServerRef {
        url: format!("{scheme}://{host}{base_path}"),
        description: None,
    }]
}

fn parse_definitions(root: &Map<String, Value>) -> Result<SchemaRegistry, NormalizeError> {
    match root.get("definitions") {
        None => Ok(SchemaRegistry::new()),
        Some(Value::Object(definitions)) => Ok(definitions
            .iter()
            .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
            .collect()),
        Some(_) => Err(unsupported("`definitions` must be an object")),
    }
}

fn parse_request_body(raw: &Value) -> RequestBody {
    RequestBody {
        description: string_field(raw, "description"),
        required: bool_field(raw, "required"),
        content: parse_content(raw).unwrap_or_default(),
    }
}

fn json_content(schema: &Value) -> IndexMap<String, SchemaNode> {
    IndexMap::from([(JSON_MEDIA_TYPE.to_string(), SchemaNode::from_value(schema))])
}

/// Media type -> schema for a `content` member, if present.
fn parse_content(raw: &Value) -> Option<IndexMap<String, SchemaNode>> {
    let content: &Map<String, Value> = raw.get("content")?.as_object()?;
    Some(
        content
            .iter()
            .filter_map(|(media_type, entry)| {
                entry
                    .get("schema")
                    .map(|schema| (media_type.clone(), SchemaNode::from_value(schema)))
            })
            .collect(),
    )
}

fn ref_target(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn unsupported(reason: impl Into<String>) -> NormalizeError {
    NormalizeError::UnsupportedDocument {
        reason: reason.into(),
    }
}

fn unresolved(reference: &str) -> NormalizeError {
    NormalizeError::UnresolvedReference {
        reference: reference.to_string(),
    }
}

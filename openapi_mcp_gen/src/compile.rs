//! Schema type compiler: schema nodes to type expressions and named
//! declarations.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::expr::{Property, TypeExpr};
use crate::model::{Operation, ParsedApi};
use crate::schema::{PrimitiveKind, SchemaNode, SchemaRegistry};
use crate::settings::{GenerateSettings, ReferencePolicy};

/// The identifier scope a schema is compiled under: a registry name, an
/// operation role (`ListPetsResponse200`), a property name, or one of those
/// with `Item` appended per array level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingContext(String);

impl NamingContext {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Context for the items of an array compiled under `self`.
    #[must_use]
    pub fn item(&self) -> Self {
        Self(format!("{}Item", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-fatal findings recorded while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    /// A reference whose target is not in the schema registry was replaced by `any`.
    DanglingReference { context: String, target: String },
    /// A declaration name was already emitted and was renamed.
    DuplicateName { name: String, renamed: String },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference { context, target } => {
                write!(f, "{context}: reference `{target}` has no schema, using `any`")
            }
            Self::DuplicateName { name, renamed } => {
                write!(f, "declaration `{name}` already exists, emitted as `{renamed}`")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `export interface Name { ... }`
    Record,
    /// `export type Name = ...;`
    Alias,
}

/// A named, emittable type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub expr: TypeExpr,
    pub doc: Option<String>,
}

impl Declaration {
    /// Records are emitted for structural object expressions, aliases for
    /// everything else.
    #[must_use]
    pub fn new(name: String, expr: TypeExpr, doc: Option<String>) -> Self {
        let kind: DeclarationKind = if expr.is_record() {
            DeclarationKind::Record
        } else {
            DeclarationKind::Alias
        };
        Self {
            name,
            kind,
            expr,
            doc,
        }
    }
}

/// Ordered declaration list plus the warnings collected while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations {
    pub items: Vec<Declaration>,
    pub warnings: Vec<CompileWarning>,
}

/// Recursive schema compiler.
///
/// Compilation never fails: absent or unrecognized schemas become `any`.
/// References always compile to the target's name, so recursion only follows
/// the structure of the node itself. Under [`ReferencePolicy::Resolve`] the
/// name is checked against the registry first.
pub struct Compiler<'a> {
    registry: &'a SchemaRegistry,
    policy: ReferencePolicy,
    warnings: Vec<CompileWarning>,
}

impl<'a> Compiler<'a> {
    #[must_use]
    pub const fn new(registry: &'a SchemaRegistry, policy: ReferencePolicy) -> Self {
        Self {
            registry,
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn compile(&mut self, node: Option<&SchemaNode>, context: &NamingContext) -> TypeExpr {
        let Some(node) = node else {
            return TypeExpr::Any;
        };
        match node {
            SchemaNode::Primitive(PrimitiveKind::String) => TypeExpr::String,
            SchemaNode::Primitive(PrimitiveKind::Number) => TypeExpr::Number,
            SchemaNode::Primitive(PrimitiveKind::Boolean) => TypeExpr::Boolean,
            SchemaNode::Enum(values) => TypeExpr::Literals(values.clone()),
            SchemaNode::Array(Some(item)) => {
                TypeExpr::Array(Box::new(self.compile(Some(item.as_ref()), &context.item())))
            }
            SchemaNode::Array(None) => TypeExpr::AnyArray,
            SchemaNode::Object {
                properties,
                required,
            } => {
                if properties.is_empty() {
                    return TypeExpr::OpenMap;
                }
                let compiled: Vec<Property> = properties
                    .iter()
                    .map(|(key, prop)| Property {
                        key: key.clone(),
                        optional: !required.contains(key),
                        ty: self.compile(Some(prop), &NamingContext::new(key.as_str())),
                        doc: None,
                    })
                    .collect();
                TypeExpr::Record(compiled)
            }
            SchemaNode::Reference(target) => self.compile_reference(target, context),
            SchemaNode::Unknown => TypeExpr::Any,
        }
    }

    fn compile_reference(&mut self, target: &str, context: &NamingContext) -> TypeExpr {
        let name: &str = SchemaNode::reference_name(target);
        if self.policy == ReferencePolicy::Resolve && !self.registry.contains_key(name) {
            let warning = CompileWarning::DanglingReference {
                context: context.to_string(),
                target: target.to_string(),
            };
            warn!("{warning}");
            self.warnings.push(warning);
            return TypeExpr::Any;
        }
        TypeExpr::Reference(name.to_string())
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<CompileWarning> {
        self.warnings
    }
}

/// Compile a single node with no registry, preserving references verbatim.
#[must_use]
pub fn compile(node: Option<&SchemaNode>, context: &NamingContext) -> TypeExpr {
    let registry: SchemaRegistry = SchemaRegistry::new();
    Compiler::new(&registry, ReferencePolicy::Preserve).compile(node, context)
}

/// Turn an operationId into a type-name stem: runs of `-` or whitespace and
/// every other character outside `[A-Za-z0-9_]` become `_`, repeated `_`
/// collapse, leading and trailing `_` are trimmed, and the first character is
/// upper-cased.
#[must_use]
pub fn operation_type_name(operation_id: &str) -> String {
    let mut sanitized: String = String::with_capacity(operation_id.len());
    for c in operation_id.chars() {
        let c: char = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(c);
    }
    let trimmed: &str = sanitized.trim_matches('_');
    let mut chars = trimmed.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Assigns final declaration names, optionally renaming collisions.
struct NameTable {
    disambiguate: bool,
    emitted: HashSet<String>,
}

impl NameTable {
    fn new(disambiguate: bool) -> Self {
        Self {
            disambiguate,
            emitted: HashSet::new(),
        }
    }

    fn claim(&mut self, name: String, warnings: &mut Vec<CompileWarning>) -> String {
        if !self.disambiguate || self.emitted.insert(name.clone()) {
            return name;
        }
        let mut suffix: usize = 2;
        let renamed: String = loop {
            let candidate: String = format!("{name}{suffix}");
            if self.emitted.insert(candidate.clone()) {
                break candidate;
            }
            suffix += 1;
        };
        let warning = CompileWarning::DuplicateName {
            name,
            renamed: renamed.clone(),
        };
        warn!("{warning}");
        warnings.push(warning);
        renamed
    }
}

/// Build the declaration list for a whole document.
///
/// Order: every registry schema (registry order), then per operation its
/// `Params`, `RequestBody` and one `Response<status>` per JSON response, in
/// operation order. Nothing is deduplicated or reordered by dependency unless
/// `disambiguate_names` is set.
#[must_use]
pub fn compile_declarations(api: &ParsedApi, settings: &GenerateSettings) -> Declarations {
    let mut compiler: Compiler<'_> = Compiler::new(&api.schemas, settings.reference_policy);
    let mut names: NameTable = NameTable::new(settings.disambiguate_names);
    let mut items: Vec<Declaration> = Vec::new();
    let mut warnings: Vec<CompileWarning> = Vec::new();

    for (schema_name, node) in &api.schemas {
        let context: NamingContext = NamingContext::new(schema_name.as_str());
        let expr: TypeExpr = compiler.compile(Some(node), &context);
        let name: String = names.claim(schema_name.clone(), &mut warnings);
        items.push(Declaration::new(name, expr, None));
    }

    for operation in &api.operations {
        for (name, expr) in operation_declarations(&mut compiler, operation) {
            let name: String = names.claim(name, &mut warnings);
            let doc: Option<String> = operation
                .summary
                .clone()
                .or_else(|| operation.description.clone());
            items.push(Declaration::new(name, expr, doc));
        }
    }

    warnings.extend(compiler.into_warnings());
    debug!(
        declarations = items.len(),
        warnings = warnings.len(),
        "compiled declarations"
    );
    Declarations { items, warnings }
}

fn operation_declarations(
    compiler: &mut Compiler<'_>,
    operation: &Operation,
) -> Vec<(String, TypeExpr)> {
    let stem: String = operation_type_name(&operation.operation_id);
    let mut out: Vec<(String, TypeExpr)> = Vec::new();

    if !operation.parameters.is_empty() {
        let properties: Vec<Property> = operation
            .parameters
            .iter()
            .map(|param| Property {
                key: param.name.clone(),
                optional: !param.required,
                ty: compiler.compile(
                    param.schema.as_ref(),
                    &NamingContext::new(param.name.as_str()),
                ),
                doc: param.description.clone(),
            })
            .collect();
        out.push((format!("{stem}Params"), TypeExpr::Record(properties)));
    }

    if let Some(schema) = operation
        .request_body
        .as_ref()
        .and_then(|body| body.json_schema())
    {
        let name: String = format!("{stem}RequestBody");
        let expr: TypeExpr = compiler.compile(Some(schema), &NamingContext::new(name.as_str()));
        out.push((name, expr));
    }

    for (status, response) in &operation.responses {
        if let Some(schema) = response.json_schema() {
            let name: String = format!("{stem}Response{status}");
            let expr: TypeExpr =
                compiler.compile(Some(schema), &NamingContext::new(name.as_str()));
            out.push((name, expr));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::{Value, json};

    fn node(value: &Value) -> SchemaNode {
        SchemaNode::from_value(value)
    }

    fn compile_value(value: &Value) -> String {
        compile(Some(&node(value)), &NamingContext::new("Root")).to_string()
    }

    fn resolve_settings() -> GenerateSettings {
        GenerateSettings {
            reference_policy: ReferencePolicy::Resolve,
            ..GenerateSettings::default()
        }
    }

    #[test]
    fn absent_schema_is_any() {
        assert_eq!(TypeExpr::Any, compile(None, &NamingContext::new("X")));
    }

    #[test]
    fn unknown_schema_is_any() {
        assert_eq!("any", compile_value(&json!({ "allOf": [] })));
    }

    #[test]
    fn scalars() {
        assert_eq!("string", compile_value(&json!({ "type": "string" })));
        assert_eq!("number", compile_value(&json!({ "type": "integer" })));
        assert_eq!("number", compile_value(&json!({ "type": "number" })));
        assert_eq!("boolean", compile_value(&json!({ "type": "boolean" })));
    }

    #[test]
    fn string_enum_literals_round_trip() {
        let expr = compile(
            Some(&node(&json!({ "type": "string", "enum": ["a", "b's"] }))),
            &NamingContext::new("Mode"),
        );
        let rendered: String = expr.to_string();
        assert_eq!(r#""a" | "b's""#, rendered);

        let literals: Vec<String> = rendered
            .split(" | ")
            .map(|literal| serde_json::from_str(literal).expect("literal should parse"))
            .collect();
        assert_eq!(vec!["a".to_string(), "b's".to_string()], literals);
    }

    #[test]
    fn enum_literals_escape_quotes_backslashes_and_unicode() {
        let tricky: &str = "quote\" back\\slash \u{2028} ü";
        let expr = compile(
            Some(&node(&json!({ "type": "string", "enum": [tricky] }))),
            &NamingContext::new("Tricky"),
        );
        let rendered: String = expr.to_string();
        let parsed: String = serde_json::from_str(&rendered).expect("literal should parse");
        assert_eq!(tricky, parsed);
    }

    #[test]
    fn object_required_and_optional_in_declaration_order() {
        let rendered: String = compile_value(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer" }
            }
        }));
        assert_eq!("{\n  name: string;\n  age?: number;\n}", rendered);
    }

    #[test]
    fn object_keys_with_illegal_characters_are_quoted() {
        let rendered: String = compile_value(&json!({
            "type": "object",
            "properties": {
                "content-type": { "type": "string" },
                "@id": { "type": "string" }
            }
        }));
        assert_eq!(
            "{\n  \"content-type\"?: string;\n  \"@id\"?: string;\n}",
            rendered
        );
    }

    #[test]
    fn object_without_properties_is_open_map() {
        assert_eq!("Record<string, any>", compile_value(&json!({ "type": "object" })));
        assert_eq!(
            "Record<string, any>",
            compile_value(&json!({ "type": "object", "properties": {} }))
        );
    }

    #[test]
    fn nested_arrays() {
        let rendered: String = compile_value(&json!({
            "type": "array",
            "items": { "type": "array", "items": { "type": "string" } }
        }));
        assert_eq!("Array<Array<string>>", rendered);
    }

    #[test]
    fn array_without_items_is_any_array() {
        assert_eq!("any[]", compile_value(&json!({ "type": "array" })));
    }

    #[test]
    fn array_with_empty_items_is_array_of_any() {
        assert_eq!("Array<any>", compile_value(&json!({ "type": "array", "items": {} })));
    }

    #[test]
    fn reference_is_taken_verbatim_without_existence_check() {
        assert_eq!(
            TypeExpr::Reference("Widget".to_string()),
            compile(
                Some(&SchemaNode::Reference("#/components/schemas/Widget".to_string())),
                &NamingContext::new("X"),
            )
        );
    }

    #[test]
    fn naming_context_item_suffix() {
        let context = NamingContext::new("Tags");
        assert_eq!("TagsItem", context.item().as_str());
        assert_eq!("TagsItemItem", context.item().item().to_string());
    }

    #[test]
    fn operation_type_name_sanitizes() {
        assert_eq!("ListPets", operation_type_name("listPets"));
        assert_eq!("List_pets", operation_type_name("list-pets"));
        assert_eq!("List_all_pets", operation_type_name("  list -- all\tpets "));
        assert_eq!("Pets_get", operation_type_name("pets.get"));
        assert_eq!("A_b", operation_type_name("__a__/__b__"));
        assert_eq!("Getusersid", operation_type_name("getusersid"));
        assert_eq!("", operation_type_name("---"));
    }

    fn document(schemas: &Value, paths: &Value) -> ParsedApi {
        normalize(&json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": "1" },
            "paths": paths,
            "components": { "schemas": schemas }
        }))
        .expect("document should normalize")
    }

    fn names(declarations: &Declarations) -> Vec<&str> {
        declarations
            .items
            .iter()
            .map(|decl| decl.name.as_str())
            .collect()
    }

    #[test]
    fn emission_order_registry_then_operations() {
        let api = document(
            &json!({
                "A": { "type": "string" },
                "B": { "type": "object", "properties": { "a": { "$ref": "#/components/schemas/A" } } }
            }),
            &json!({
                "/things": {
                    "post": {
                        "operationId": "op1",
                        "parameters": [{ "name": "dry-run", "in": "query", "schema": { "type": "boolean" } }],
                        "requestBody": {
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/B" } } }
                        },
                        "responses": { "204": { "description": "done" } }
                    }
                }
            }),
        );
        let declarations = compile_declarations(&api, &GenerateSettings::default());
        assert_eq!(vec!["A", "B", "Op1Params", "Op1RequestBody"], names(&declarations));
        assert!(declarations.warnings.is_empty());

        let kinds: Vec<DeclarationKind> =
            declarations.items.iter().map(|decl| decl.kind).collect();
        assert_eq!(
            vec![
                DeclarationKind::Alias,
                DeclarationKind::Record,
                DeclarationKind::Record,
                DeclarationKind::Alias,
            ],
            kinds
        );
        assert_eq!(
            "{\n  \"dry-run\"?: boolean;\n}",
            declarations.items[2].expr.to_string()
        );
        assert_eq!(TypeExpr::Reference("B".to_string()), declarations.items[3].expr);
    }

    #[test]
    fn responses_follow_request_body_in_map_order() {
        let api = document(
            &json!({}),
            &json!({
                "/pets": {
                    "get": {
                        "operationId": "list-pets",
                        "summary": "List pets",
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": { "application/json": { "schema": { "type": "array", "items": { "type": "string" } } } }
                            },
                            "500": {
                                "description": "error",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            },
                            "default": {
                                "description": "error",
                                "content": { "application/json": { "schema": { "type": "object" } } }
                            }
                        }
                    }
                }
            }),
        );
        let declarations = compile_declarations(&api, &GenerateSettings::default());
        assert_eq!(
            vec!["List_petsResponse200", "List_petsResponsedefault"],
            names(&declarations)
        );
        assert_eq!(DeclarationKind::Alias, declarations.items[0].kind);
        assert_eq!(DeclarationKind::Alias, declarations.items[1].kind);
        assert_eq!(Some("List pets"), declarations.items[0].doc.as_deref());
    }

    #[test]
    fn parameter_without_schema_is_any_and_keeps_description() {
        let api = document(
            &json!({}),
            &json!({
                "/pets": {
                    "get": {
                        "operationId": "find",
                        "parameters": [
                            { "name": "q", "in": "query", "required": true, "description": "Search text" }
                        ],
                        "responses": {}
                    }
                }
            }),
        );
        let declarations = compile_declarations(&api, &GenerateSettings::default());
        assert_eq!(
            TypeExpr::Record(vec![Property {
                key: "q".to_string(),
                optional: false,
                ty: TypeExpr::Any,
                doc: Some("Search text".to_string()),
            }]),
            declarations.items[0].expr
        );
    }

    fn colliding_operations() -> Value {
        let operation = |id: &str, ty: &str| {
            json!({
                "get": {
                    "operationId": id,
                    "requestBody": { "content": { "application/json": { "schema": { "type": ty } } } },
                    "responses": {}
                }
            })
        };
        json!({ "/a": operation("x-y", "string"), "/b": operation("x y", "number") })
    }

    #[test]
    fn duplicate_names_are_kept_by_default() {
        let api = document(
            &json!({}),
            &colliding_operations(),
        );
        let declarations = compile_declarations(&api, &GenerateSettings::default());
        assert_eq!(vec!["X_yRequestBody", "X_yRequestBody"], names(&declarations));
        assert!(declarations.warnings.is_empty());
    }

    #[test]
    fn duplicate_names_get_numeric_suffix_when_enabled() {
        let api = document(
            &json!({ "X_yRequestBody": { "type": "boolean" } }),
            &colliding_operations(),
        );
        let settings = GenerateSettings {
            disambiguate_names: true,
            ..GenerateSettings::default()
        };
        let declarations = compile_declarations(&api, &settings);
        assert_eq!(
            vec!["X_yRequestBody", "X_yRequestBody2", "X_yRequestBody3"],
            names(&declarations)
        );
        assert_eq!(
            vec![
                CompileWarning::DuplicateName {
                    name: "X_yRequestBody".to_string(),
                    renamed: "X_yRequestBody2".to_string(),
                },
                CompileWarning::DuplicateName {
                    name: "X_yRequestBody".to_string(),
                    renamed: "X_yRequestBody3".to_string(),
                },
            ],
            declarations.warnings
        );
    }

    #[test]
    fn preserve_policy_does_not_expand_self_reference() {
        let api = document(
            &json!({
                "TreeNode": {
                    "type": "object",
                    "properties": {
                        "children": { "type": "array", "items": { "$ref": "#/components/schemas/TreeNode" } }
                    }
                }
            }),
            &json!({}),
        );
        let declarations = compile_declarations(&api, &GenerateSettings::default());
        assert_eq!(
            "{\n  children?: Array<TreeNode>;\n}",
            declarations.items[0].expr.to_string()
        );
    }

    #[test]
    fn resolve_policy_names_self_reference() {
        let api = document(
            &json!({
                "TreeNode": {
                    "type": "object",
                    "required": ["value"],
                    "properties": {
                        "value": { "type": "string" },
                        "children": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/TreeNode" }
                        }
                    }
                }
            }),
            &json!({
                "/tree": {
                    "get": {
                        "operationId": "getTree",
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/TreeNode" }
                                    }
                                }
                            }
                        }
                    }
                }
            }),
        );
        let declarations = compile_declarations(&api, &resolve_settings());
        assert_eq!(
            "{\n  value: string;\n  children?: Array<TreeNode>;\n}",
            declarations.items[0].expr.to_string()
        );
        assert_eq!("GetTreeResponse200", declarations.items[1].name);
        assert_eq!(DeclarationKind::Alias, declarations.items[1].kind);
        assert_eq!(
            TypeExpr::Reference("TreeNode".to_string()),
            declarations.items[1].expr
        );
        assert!(declarations.warnings.is_empty());
    }

    #[test]
    fn resolve_policy_names_mutual_cycle() {
        let api = document(
            &json!({
                "Author": {
                    "type": "object",
                    "properties": {
                        "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                    }
                },
                "Book": {
                    "type": "object",
                    "properties": { "author": { "$ref": "#/components/schemas/Author" } }
                }
            }),
            &json!({}),
        );
        let declarations = compile_declarations(&api, &resolve_settings());
        assert_eq!(
            "{\n  books?: Array<Book>;\n}",
            declarations.items[0].expr.to_string()
        );
        assert_eq!(
            "{\n  author?: Author;\n}",
            declarations.items[1].expr.to_string()
        );
        assert!(declarations.warnings.is_empty());
    }

    #[test]
    fn resolve_policy_replaces_dangling_reference_with_any() {
        let api = document(
            &json!({
                "Order": {
                    "type": "object",
                    "properties": { "widget": { "$ref": "#/components/schemas/Widget" } }
                }
            }),
            &json!({}),
        );
        let declarations = compile_declarations(&api, &resolve_settings());
        assert_eq!(
            "{\n  widget?: any;\n}",
            declarations.items[0].expr.to_string()
        );
        assert_eq!(
            vec![CompileWarning::DanglingReference {
                context: "widget".to_string(),
                target: "#/components/schemas/Widget".to_string(),
            }],
            declarations.warnings
        );
    }

    #[test]
    fn resolve_policy_survives_long_reference_ring() {
        const RING: usize = 10_000;
        let mut schemas: SchemaRegistry = SchemaRegistry::new();
        for i in 0..RING {
            let next: usize = (i + 1) % RING;
            schemas.insert(
                format!("S{i}"),
                node(&json!({
                    "type": "object",
                    "properties": { "next": { "$ref": format!("#/components/schemas/S{next}") } }
                })),
            );
        }
        let api = ParsedApi {
            schemas,
            ..document(&json!({}), &json!({}))
        };

        let declarations = compile_declarations(&api, &resolve_settings());
        assert!(declarations.warnings.is_empty());
        assert_eq!(RING, declarations.items.len());
        assert_eq!(
            "{\n  next?: S0;\n}",
            declarations.items[RING - 1].expr.to_string()
        );
    }

    #[test]
    fn resolve_policy_output_stays_linear_on_shared_references() {
        const LEVELS: usize = 32;
        let mut schemas: SchemaRegistry = SchemaRegistry::new();
        for i in 0..LEVELS {
            let next: String = format!("#/components/schemas/S{}", i + 1);
            schemas.insert(
                format!("S{i}"),
                node(&json!({
                    "type": "object",
                    "properties": { "a": { "$ref": next }, "b": { "$ref": next } }
                })),
            );
        }
        schemas.insert(format!("S{LEVELS}"), node(&json!({ "type": "string" })));
        let api = ParsedApi {
            schemas,
            ..document(&json!({}), &json!({}))
        };

        let declarations = compile_declarations(&api, &resolve_settings());
        assert!(declarations.warnings.is_empty());
        for (i, declaration) in declarations.items.iter().take(LEVELS).enumerate() {
            let next: usize = i + 1;
            assert_eq!(
                format!("{{\n  a?: S{next};\n  b?: S{next};\n}}"),
                declaration.expr.to_string()
            );
        }
        let total: usize = declarations
            .items
            .iter()
            .map(|declaration| declaration.expr.to_string().len())
            .sum();
        assert!(total < 40 * (LEVELS + 1), "rendered {total} bytes");
    }

    #[test]
    fn resolve_policy_self_reference_in_every_shape_terminates() {
        let schemas: SchemaRegistry = [
            ("Alias", json!({ "$ref": "#/components/schemas/Alias" })),
            ("List", json!({ "type": "array", "items": { "$ref": "#/components/schemas/List" } })),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), node(&value)))
        .collect();
        let mut compiler = Compiler::new(&schemas, ReferencePolicy::Resolve);
        assert_eq!(
            TypeExpr::Reference("Alias".to_string()),
            compiler.compile(Some(&schemas["Alias"]), &NamingContext::new("Alias"))
        );
        assert_eq!(
            "Array<List>",
            compiler
                .compile(Some(&schemas["List"]), &NamingContext::new("List"))
                .to_string()
        );
        assert!(compiler.into_warnings().is_empty());
    }
}

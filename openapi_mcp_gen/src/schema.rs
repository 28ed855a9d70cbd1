use indexmap::IndexMap;
use serde_json::Value;

/// Named reusable schemas from `components.schemas`, in document order.
pub type SchemaRegistry = IndexMap<String, SchemaNode>;

/// Scalar kinds the compiler distinguishes. `integer` folds into `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

/// Recursive shape of a schema.
///
/// Only the shapes used by the type compiler are modeled. Composition
/// keywords, formats and constraints are ignored and anything unrecognized
/// becomes [`SchemaNode::Unknown`]. Nodes carry no identity beyond their shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveKind),

    /// A `string` schema restricted to the listed literal values.
    Enum(Vec<Value>),

    /// `None` when the schema declares no `items`.
    Array(Option<Box<SchemaNode>>),

    /// Properties keep their declaration order.
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: Vec<String>,
    },

    /// The raw `$ref` target, e.g. `#/components/schemas/Widget`.
    Reference(String),

    Unknown,
}

impl SchemaNode {
    /// Build a node from a raw schema value.
    ///
    /// `type` wins over `$ref` when both are present. A string `enum` with no
    /// values is treated as a plain string.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("string") => match value.get("enum").and_then(Value::as_array) {
                Some(values) if !values.is_empty() => Self::Enum(values.clone()),
                _ => Self::Primitive(PrimitiveKind::String),
            },
            Some("integer" | "number") => Self::Primitive(PrimitiveKind::Number),
            Some("boolean") => Self::Primitive(PrimitiveKind::Boolean),
            Some("array") => {
                Self::Array(value.get("items").map(|items| Box::new(Self::from_value(items))))
            }
            Some("object") => {
                let properties: IndexMap<String, SchemaNode> = value
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| {
                        props
                            .iter()
                            .map(|(key, prop)| (key.clone(), Self::from_value(prop)))
                            .collect()
                    })
                    .unwrap_or_default();
                let required: Vec<String> = value
                    .get("required")
                    .and_then(Value::as_array)
                    .map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default();
                Self::Object {
                    properties,
                    required,
                }
            }
            _ => value
                .get("$ref")
                .and_then(Value::as_str)
                .map_or(Self::Unknown, |target| Self::Reference(target.to_string())),
        }
    }

    /// Trailing `/` segment of a reference target, used as the type name.
    #[must_use]
    pub fn reference_name(target: &str) -> &str {
        target.rsplit('/').next().unwrap_or(target)
    }
}

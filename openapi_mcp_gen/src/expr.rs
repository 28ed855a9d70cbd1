//! TypeScript type expressions produced by the compiler.

use std::fmt;

use serde_json::Value;

/// A compiled type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// The universal type, `any`.
    Any,
    String,
    Number,
    Boolean,
    /// Union of literal values, e.g. `"a" | "b"`.
    Literals(Vec<Value>),
    /// `Array<T>`.
    Array(Box<TypeExpr>),
    /// `any[]`, an array schema without `items`.
    AnyArray,
    /// `Record<string, any>`, an object schema without properties.
    OpenMap,
    /// Structural object type with ordered properties.
    Record(Vec<Property>),
    /// Reference to a named declaration.
    Reference(String),
}

/// One member of a [`TypeExpr::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub optional: bool,
    pub ty: TypeExpr,
    pub doc: Option<String>,
}

impl TypeExpr {
    /// True for structural object expressions, which are emitted as interfaces.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Render with nested records indented two spaces per `depth`.
    #[must_use]
    pub fn render(&self, depth: usize) -> String {
        let mut out: String = String::new();
        self.render_into(&mut out, depth);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        match self {
            Self::Any => out.push_str("any"),
            Self::String => out.push_str("string"),
            Self::Number => out.push_str("number"),
            Self::Boolean => out.push_str("boolean"),
            Self::Literals(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    // JSON literals are valid TypeScript literals.
                    out.push_str(&value.to_string());
                }
            }
            Self::Array(item) => {
                out.push_str("Array<");
                item.render_into(out, depth);
                out.push('>');
            }
            Self::AnyArray => out.push_str("any[]"),
            Self::OpenMap => out.push_str("Record<string, any>"),
            Self::Record(properties) => render_record(properties, out, depth),
            Self::Reference(name) => out.push_str(name),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

fn render_record(properties: &[Property], out: &mut String, depth: usize) {
    let indent: String = "  ".repeat(depth + 1);
    out.push_str("{\n");
    for property in properties {
        if let Some(doc) = property.doc.as_deref() {
            push_doc_comment(out, doc, &indent);
        }
        out.push_str(&indent);
        out.push_str(&property_key(&property.key));
        if property.optional {
            out.push('?');
        }
        out.push_str(": ");
        property.ty.render_into(out, depth + 1);
        out.push_str(";\n");
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
}

/// Keys that are not bare identifiers are emitted as quoted string keys.
#[must_use]
pub fn property_key(key: &str) -> String {
    if is_bare_identifier(key) {
        key.to_string()
    } else {
        Value::from(key).to_string()
    }
}

fn is_bare_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Append a `/** ... */` block for `doc`, each line prefixed by `indent`.
/// Blank docs produce nothing.
pub fn push_doc_comment(out: &mut String, doc: &str, indent: &str) {
    let doc: String = doc.trim().replace("*/", "*\\/");
    if doc.is_empty() {
        return;
    }
    let lines: Vec<&str> = doc.lines().collect();
    if let [line] = lines.as_slice() {
        out.push_str(&format!("{indent}/** {line} */\n"));
        return;
    }
    out.push_str(&format!("{indent}/**\n"));
    for line in lines {
        let line: &str = line.trim_end();
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
}

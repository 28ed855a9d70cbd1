use std::io::Write;

use crate::compile::{Declaration, DeclarationKind};
use crate::expr::push_doc_comment;

/// First line of every generated declarations file.
pub const HEADER: &str = "// Generated by openapi-mcp-gen. Do not edit manually.";

/// Emit a single declaration, followed by a blank line.
fn emit_declaration<W: Write>(declaration: &Declaration, writer: &mut W) -> std::io::Result<()> {
    let mut doc: String = String::new();
    if let Some(text) = declaration.doc.as_deref() {
        push_doc_comment(&mut doc, text, "");
    }
    write!(writer, "{doc}")?;
    match declaration.kind {
        DeclarationKind::Record => writeln!(
            writer,
            "export interface {} {}",
            declaration.name, declaration.expr
        )?,
        DeclarationKind::Alias => writeln!(
            writer,
            "export type {} = {};",
            declaration.name, declaration.expr
        )?,
    }
    writeln!(writer)?;
    Ok(())
}

/// Write the header and every declaration, in list order.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_declarations<W: Write>(
    declarations: &[Declaration],
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")?;
    writeln!(writer)?;
    for declaration in declarations {
        emit_declaration(declaration, writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Property, TypeExpr};
    use serde_json::json;

    fn write(declarations: &[Declaration]) -> String {
        let mut output: Vec<u8> = Vec::new();
        write_declarations(declarations, &mut output).expect("write_declarations should succeed");
        String::from_utf8(output).expect("output should be valid UTF-8")
    }

    #[test]
    fn empty_list_writes_only_header() {
        let expected: &str = "// Generated by openapi-mcp-gen. Do not edit manually.\n\n";
        assert_eq!(expected, write(&[]));
    }

    #[test]
    fn records_and_aliases() {
        let declarations: Vec<Declaration> = vec![
            Declaration::new(
                "Status".to_string(),
                TypeExpr::Literals(vec![json!("open"), json!("closed")]),
                None,
            ),
            Declaration::new(
                "Pet".to_string(),
                TypeExpr::Record(vec![
                    Property {
                        key: "id".to_string(),
                        optional: false,
                        ty: TypeExpr::Number,
                        doc: None,
                    },
                    Property {
                        key: "tags".to_string(),
                        optional: true,
                        ty: TypeExpr::Array(Box::new(TypeExpr::String)),
                        doc: None,
                    },
                ]),
                None,
            ),
            Declaration::new(
                "ListPetsResponse200".to_string(),
                TypeExpr::Array(Box::new(TypeExpr::Reference("Pet".to_string()))),
                Some("List all pets".to_string()),
            ),
        ];

        let expected: &str = r#"// Generated by openapi-mcp-gen. Do not edit manually.

export type Status = "open" | "closed";

export interface Pet {
  id: number;
  tags?: Array<string>;
}

/** List all pets */
export type ListPetsResponse200 = Array<Pet>;

"#;
        assert_eq!(expected, write(&declarations));
    }
}

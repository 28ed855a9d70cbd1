//! Compile OpenAPI 3 and Swagger 2.0 description documents into a flattened operation model
//! and TypeScript type declarations.
//!
//! The pipeline is [`normalize`] (document to [`ParsedApi`]), then
//! [`compile_declarations`] (schemas and operations to [`Declaration`]s), then
//! [`write_declarations`].

mod compile;
mod emit;
mod error;
mod expr;
mod json_pointer;
mod model;
mod normalize;
mod schema;
mod settings;
mod tools;

pub use compile::{
    CompileWarning, Compiler, Declaration, DeclarationKind, Declarations, NamingContext, compile,
    compile_declarations, operation_type_name,
};
pub use emit::{HEADER, write_declarations};
pub use error::{GenerateError, NormalizeError};
pub use expr::{Property, TypeExpr};
pub use model::{
    ApiInfo, JSON_MEDIA_TYPE, Operation, Parameter, ParameterLocation, ParsedApi, RequestBody,
    ResponseSpec, ServerRef,
};
pub use normalize::{fallback_operation_id, normalize, normalize_with_settings};
pub use schema::{PrimitiveKind, SchemaNode, SchemaRegistry};
pub use settings::{GenerateSettings, ReferencePolicy};
pub use tools::{ServerManifest, ToolDescriptor, ToolParameter, ToolRequestBody, package_name};

use std::io::Write;
use std::path::Path;

use tracing::info;

/// File name of the declarations file inside `<output>/src`.
pub const TYPES_FILE: &str = "types.ts";

/// File name of the serialized [`ServerManifest`] inside `<output>`.
pub const TOOLS_FILE: &str = "tools.json";

/// Normalize `document_json`, compile its declarations and write them to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
///
/// # Errors
///
/// Returns `GenerateError` if the document is not valid JSON, normalization
/// fails, or writing to the writer fails.
pub fn generate_to_writer<W: Write>(
    document_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<Declarations, GenerateError> {
    let document: serde_json::Value = serde_json::from_str(document_json)?;
    let api: ParsedApi = normalize_with_settings(&document, settings)?;
    let declarations: Declarations = compile_declarations(&api, settings);
    write_declarations(&declarations.items, writer)?;
    Ok(declarations)
}

/// Generate `<output_dir>/src/types.ts` and `<output_dir>/tools.json` from a
/// JSON description document on disk. Directories are created as needed.
///
/// # Errors
///
/// Returns `GenerateError` if reading the document fails, it is not valid
/// JSON, normalization fails, or writing either output file fails.
pub fn generate_from_file(
    document_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<ServerManifest, GenerateError> {
    let document_json: String = std::fs::read_to_string(document_path)?;
    let document: serde_json::Value = serde_json::from_str(&document_json)?;
    let api: ParsedApi = normalize_with_settings(&document, settings)?;

    let output_dir: &Path = output_dir.as_ref();
    let src_dir = output_dir.join("src");
    std::fs::create_dir_all(&src_dir)?;

    let declarations: Declarations = compile_declarations(&api, settings);
    let mut types_file: std::fs::File = std::fs::File::create(src_dir.join(TYPES_FILE))?;
    write_declarations(&declarations.items, &mut types_file)?;

    let manifest: ServerManifest = ServerManifest::from_api(&api, &settings.default_base_url);
    let tools_file: std::fs::File = std::fs::File::create(output_dir.join(TOOLS_FILE))?;
    serde_json::to_writer_pretty(tools_file, &manifest)?;

    info!(
        output = %output_dir.display(),
        declarations = declarations.items.len(),
        warnings = declarations.warnings.len(),
        tools = manifest.tools.len(),
        "generated MCP server sources"
    );
    Ok(manifest)
}

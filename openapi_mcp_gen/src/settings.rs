//! Settings for document normalization and type generation.

use std::path::Path;

use serde::Deserialize;

use crate::error::GenerateError;

/// How the type compiler treats `$ref` schema nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Emit the trailing segment of the reference as a type name, without
    /// checking that a declaration of that name exists.
    #[default]
    Preserve,
    /// Look the target up in the schema registry. A present target is emitted
    /// by name (it has its own declaration); a missing one becomes `any` with
    /// a warning.
    Resolve,
}

/// Settings that control generation behavior.
///
/// `Default` reproduces the literal, trust-the-input behavior. Every hardening
/// switch is opt-in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateSettings {
    /// Reference handling inside the type compiler.
    pub reference_policy: ReferencePolicy,

    /// When true, a declaration whose name was already emitted is renamed
    /// with the first free numeric suffix (`Foo2`, `Foo3`, ...).
    ///
    /// **Default: false.** Duplicates are emitted as-is.
    pub disambiguate_names: bool,

    /// When true, `$ref` parameters, request bodies and responses are
    /// followed inside the document instead of being dropped, and a
    /// reference that cannot be followed fails normalization.
    pub resolve_component_refs: bool,

    /// Base URL used when the document declares no servers.
    pub default_base_url: String,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            reference_policy: ReferencePolicy::default(),
            disambiguate_names: false,
            resolve_component_refs: false,
            default_base_url: "http://localhost".to_string(),
        }
    }
}

impl GenerateSettings {
    /// Load settings from a JSON file. Absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Config` if the file cannot be read or is not a
    /// valid settings object.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let path: &Path = path.as_ref();
        let config_error = |message: String| GenerateError::Config {
            path: path.to_path_buf(),
            message,
        };
        let contents: String =
            std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| config_error(e.to_string()))
    }
}

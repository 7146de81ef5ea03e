//! Error types for the jrpc generator.
//!
//! Every variant is fatal for the compilation unit being generated: no
//! output is produced for a unit once any of them is raised.

use jrpc_define::LoadError;
use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A message reference matched neither a local message nor a message
    /// of an imported unit.
    #[error("Unresolved type '{type_name}' in {location}")]
    UnresolvedType {
        /// The reference as written in the schema.
        type_name: String,
        /// Where the reference appeared (e.g., "field 'scene' of message 'SetSceneRequest'").
        location: String,
    },

    /// A field type shape the generator cannot represent (e.g., nested
    /// repeated fields, or map keys that are not strings, booleans or integers).
    #[error("Unsupported type in {location}: {reason}")]
    UnsupportedType { location: String, reason: String },

    /// A field option that is illegal for the field's resolved type.
    #[error("Option '{option}' is incompatible with {location}: {reason}")]
    IncompatibleOption {
        location: String,
        /// The offending option (`required`, `min` or `max`).
        option: String,
        reason: String,
    },

    /// A service name that does not match `^[A-Za-z][A-Za-z0-9]*Service$`.
    #[error(
        "Invalid service name '{0}': service name should be alphanumeric camelcase ending with \"Service\""
    )]
    InvalidServiceName(String),

    /// A name that would produce an invalid or clashing Rust identifier.
    #[error("Invalid {kind} '{name}': {reason}")]
    InvalidIdentifier {
        /// What the name identifies (message, field, event name, route path...).
        kind: String,
        name: String,
        reason: String,
    },

    /// Two generated bindings would share a name or a route.
    #[error("Duplicate binding '{name}': {reason}")]
    DuplicateBinding { name: String, reason: String },

    /// Failed to build or validate generated code.
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load the serialized unit.
    #[error("Failed to load compilation unit: {0}")]
    Load(#[from] LoadError),

    /// Invalid generator configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GeneratorError {
    pub(crate) fn incompatible(
        location: &str,
        option: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::IncompatibleOption {
            location: location.to_string(),
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_identifier(
        kind: &str,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidIdentifier {
            kind: kind.to_string(),
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn duplicate(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DuplicateBinding {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

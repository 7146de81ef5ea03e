//! Loading serialized compilation units.
//!
//! The parser that produces a [`CompilationUnit`] lives outside this
//! workspace. It hands units over as JSON or TOML documents, which this
//! module turns back into the typed model.

use std::path::Path;

use thiserror::Error;

use crate::types::CompilationUnit;

/// Errors raised while loading a serialized unit.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid JSON unit.
    #[error("Invalid JSON unit: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not a valid TOML unit.
    #[error("Invalid TOML unit: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported unit format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}

impl CompilationUnit {
    /// Parses a unit from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a unit from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads a unit from disk, picking the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("toml") => Self::from_toml_str(&source),
            other => Err(LoadError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

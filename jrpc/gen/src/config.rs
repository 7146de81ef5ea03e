//! Generator options.

use crate::errors::GeneratorError;
use crate::naming::is_module_path;

/// Default path of the runtime crate referenced by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "jrpc";

/// Controls which bindings are emitted for a unit.
///
/// Messages and their `Validate` impls are always emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Path generated code uses to reach the runtime (`use <path> as rt;`).
    pub runtime_crate: String,
    /// Emit one router struct per service.
    pub emit_router: bool,
    /// Emit client call stubs per method.
    pub emit_client: bool,
    /// Emit publish/handler bindings for event messages.
    pub emit_events: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            emit_router: true,
            emit_client: true,
            emit_events: true,
        }
    }
}

impl GeneratorOptions {
    /// Checks that the runtime crate is a usable Rust path.
    ///
    /// ## Examples
    ///
    /// ```
    /// use jrpc_gen::config::GeneratorOptions;
    ///
    /// let mut options = GeneratorOptions::default();
    /// assert!(options.validate().is_ok());
    ///
    /// options.runtime_crate = "my-runtime".to_string();
    /// assert!(options.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if is_module_path(&self.runtime_crate) {
            Ok(())
        } else {
            Err(GeneratorError::ConfigError(format!(
                "runtime crate '{}' is not a valid Rust path",
                self.runtime_crate
            )))
        }
    }
}

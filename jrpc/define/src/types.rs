//! Unit-level types for schema definitions.
//!
//! - [`CompilationUnit`] - The set of definitions generated together
//! - [`Import`] - A referenced unit, used only to qualify cross-unit types
//! - [`HttpMethod`] - HTTP method enumeration for handler annotations

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::message::Message;
use crate::service::Service;

/// HTTP methods a handler can be bound to.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use jrpc_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("PUT").unwrap(), HttpMethod::Put);
/// assert_eq!(HttpMethod::Post.to_string(), "POST");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
}

/// Another compilation unit whose messages can be referenced.
///
/// Imports only qualify type names in emitted code; they are never emitted
/// as structs in the importing unit. A reference such as
/// `"devicedef.Device"` resolves against the import whose `alias` is
/// `devicedef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    /// Alias used to qualify referenced types (e.g., `devicedef`).
    pub alias: String,
    /// Rust module path of the imported unit's generated code
    /// (e.g., `device_service::def`).
    pub path: String,
    /// Messages declared by the imported unit.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Import {
    /// Creates an import with the given alias and module path.
    pub fn new(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            path: path.into(),
            messages: Vec::new(),
        }
    }

    /// Adds a message known to the imported unit.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// The set of definitions processed together in one generation pass.
///
/// Messages are stored flattened: a nested message carries its enclosing
/// names in [`Message::lineage`] rather than being owned by its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Name of the generated module (also used in generated docs).
    pub package: String,
    /// Units whose messages may be referenced from this one.
    #[serde(default)]
    pub imports: Vec<Import>,
    /// Messages declared in this unit, in declaration order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Services declared in this unit, in declaration order.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl CompilationUnit {
    /// Creates an empty unit for the given package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: Vec::new(),
            messages: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Adds an import.
    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// Adds a local message.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Adds a service.
    pub fn service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Looks up a local message by its dotted identity (e.g., `Scene.Action`).
    pub fn find_message(&self, full_name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.full_name() == full_name)
    }

    /// Looks up an import by alias.
    pub fn find_import(&self, alias: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.alias == alias)
    }
}

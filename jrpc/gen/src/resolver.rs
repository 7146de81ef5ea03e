//! Type resolution for schema fields.
//!
//! Maps a declared [`FieldType`] to the Rust representation emitted for it
//! and records which `use` declarations the generated module needs.
//!
//! | Declared                 | Emitted field type         |
//! |--------------------------|----------------------------|
//! | scalar `uint32`          | `Option<u32>`              |
//! | message `Scene.Action`   | `Option<Box<Scene_Action>>`|
//! | repeated `Scene`         | `Vec<Scene>`               |
//! | map `string -> Scene`    | `HashMap<String, Scene>`   |
//!
//! Non-collection fields are wrapped in `Option` so absence can be told
//! apart from a zero value. Collections are emitted directly: an omitted
//! collection decodes as empty, and the two cannot be distinguished.
//! Singular message fields are boxed so messages may refer to themselves.

use jrpc_define::{CompilationUnit, FieldType, ScalarKind};

use crate::errors::GeneratorError;

const HASH_MAP_PATH: &str = "std::collections::HashMap";

/// A `use` declaration required by the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Module path (e.g., `device_service::def`).
    pub path: String,
    /// Alias the path is bound to (`use path as alias;`).
    pub alias: Option<String>,
}

/// The imports required by one unit, deduplicated, in first-use order.
///
/// ## Examples
///
/// ```
/// use jrpc_gen::resolver::ImportSet;
///
/// let mut imports = ImportSet::default();
/// imports.add("device_service::def", Some("devicedef"));
/// imports.add("std::collections::HashMap", None);
/// imports.add("device_service::def", Some("devicedef"));
///
/// assert_eq!(imports.len(), 2);
/// assert_eq!(imports.entries()[0].path, "device_service::def");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    entries: Vec<ImportEntry>,
}

impl ImportSet {
    /// Registers an import if it is not already present.
    pub fn add(&mut self, path: &str, alias: Option<&str>) {
        let entry = ImportEntry {
            path: path.to_string(),
            alias: alias.map(str::to_string),
        };
        if !self.entries.contains(&entry) {
            tracing::trace!(path, ?alias, "Registered import");
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ImportEntry> {
        self.entries
    }
}

/// How the resolved element is stored in the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// One value, emitted as `Option<T>`.
    Single,
    /// `Vec<T>`.
    Repeated,
    /// `HashMap<K, T>`; `key` is the Rust key type.
    Map { key: String },
}

/// A message reference resolved to its emitted name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Emitted type name, alias-qualified when imported
    /// (e.g., `SetSceneRequest`, `devicedef::Device`).
    pub rust_name: String,
    /// `true` when the message is emitted by this unit.
    pub local: bool,
}

/// The resolved representation of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Rust type of one element (e.g., `u32`, `Scene_Action`, `devicedef::Device`).
    pub element: String,
    /// The element's scalar kind; `None` for messages.
    pub scalar: Option<ScalarKind>,
    /// The element is a generated message and therefore validatable.
    pub is_message: bool,
    pub container: Container,
}

impl ResolvedType {
    /// `true` for repeated fields.
    pub fn is_repeated(&self) -> bool {
        self.container == Container::Repeated
    }

    /// `true` for map fields.
    pub fn is_map(&self) -> bool {
        matches!(self.container, Container::Map { .. })
    }

    /// `true` when the field is emitted as `Option<_>`, i.e. it has an
    /// absent/present distinction.
    pub fn is_optional(&self) -> bool {
        self.container == Container::Single
    }

    /// `true` for singular message fields, which are stored boxed.
    pub fn is_boxed(&self) -> bool {
        self.is_optional() && self.is_message
    }

    /// The scalar kind when bounds may apply: a singular numeric scalar.
    pub fn numeric_kind(&self) -> Option<ScalarKind> {
        match (self.is_optional(), self.scalar) {
            (true, Some(kind)) if kind.is_numeric() => Some(kind),
            _ => None,
        }
    }

    /// `true` when the getter can return the element by value.
    pub fn is_copy(&self) -> bool {
        matches!(self.scalar, Some(kind) if !matches!(kind, ScalarKind::String | ScalarKind::Bytes))
    }

    /// The stored Rust type, including the container.
    ///
    /// ## Examples
    ///
    /// ```
    /// use jrpc_define::{CompilationUnit, FieldType, ScalarKind};
    /// use jrpc_gen::resolver::{resolve, ImportSet};
    ///
    /// let unit = CompilationUnit::new("scenedef");
    /// let mut imports = ImportSet::default();
    /// let ty = FieldType::map(ScalarKind::String, FieldType::Scalar(ScalarKind::Double));
    ///
    /// let resolved = resolve(&ty, &unit, &mut imports, "field 'levels'").unwrap();
    /// assert_eq!(resolved.storage_type(), "HashMap<String, f64>");
    /// ```
    pub fn storage_type(&self) -> String {
        match &self.container {
            Container::Single if self.is_message => format!("Option<Box<{}>>", self.element),
            Container::Single => format!("Option<{}>", self.element),
            Container::Repeated => format!("Vec<{}>", self.element),
            Container::Map { key } => format!("HashMap<{}, {}>", key, self.element),
        }
    }

    /// The type accepted by the field's setter.
    pub fn value_type(&self) -> String {
        match self.container {
            Container::Single => self.element.clone(),
            _ => self.storage_type(),
        }
    }
}

/// Rust type emitted for a scalar kind.
pub fn scalar_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::String => "String",
        ScalarKind::Bytes => "Vec<u8>",
        ScalarKind::Int32 => "i32",
        ScalarKind::Int64 => "i64",
        ScalarKind::Uint32 => "u32",
        ScalarKind::Uint64 => "u64",
        ScalarKind::Float => "f32",
        ScalarKind::Double => "f64",
    }
}

/// Resolves a field's declared type.
///
/// `location` describes the field for error messages.
///
/// ## Errors
///
/// - [`GeneratorError::UnresolvedType`] when a message reference cannot be found
/// - [`GeneratorError::UnsupportedType`] for nested collections and
///   unsupported map keys
pub fn resolve(
    ty: &FieldType,
    unit: &CompilationUnit,
    imports: &mut ImportSet,
    location: &str,
) -> Result<ResolvedType, GeneratorError> {
    match ty {
        FieldType::Repeated(element) => {
            let (element, scalar, is_message) = resolve_element(element, unit, imports, location)?;
            Ok(ResolvedType {
                element,
                scalar,
                is_message,
                container: Container::Repeated,
            })
        }
        FieldType::Map { key, value } => {
            if !(key.is_integer() || matches!(key, ScalarKind::String | ScalarKind::Bool)) {
                return Err(GeneratorError::UnsupportedType {
                    location: location.to_string(),
                    reason: format!("map keys of kind '{}' are not supported", key),
                });
            }
            let (element, scalar, is_message) = resolve_element(value, unit, imports, location)?;
            imports.add(HASH_MAP_PATH, None);
            Ok(ResolvedType {
                element,
                scalar,
                is_message,
                container: Container::Map {
                    key: scalar_type(*key).to_string(),
                },
            })
        }
        single => {
            let (element, scalar, is_message) = resolve_element(single, unit, imports, location)?;
            Ok(ResolvedType {
                element,
                scalar,
                is_message,
                container: Container::Single,
            })
        }
    }
}

fn resolve_element(
    ty: &FieldType,
    unit: &CompilationUnit,
    imports: &mut ImportSet,
    location: &str,
) -> Result<(String, Option<ScalarKind>, bool), GeneratorError> {
    match ty {
        FieldType::Scalar(kind) => Ok((scalar_type(*kind).to_string(), Some(*kind), false)),
        FieldType::Message(reference) => {
            let message = resolve_message(reference, unit, imports, location)?;
            Ok((message.rust_name, None, true))
        }
        FieldType::Repeated(_) | FieldType::Map { .. } => Err(GeneratorError::UnsupportedType {
            location: location.to_string(),
            reason: "collections cannot be nested directly; wrap the inner collection in a message"
                .to_string(),
        }),
    }
}

/// Resolves a message reference, local first, then through an import alias.
///
/// ## Examples
///
/// ```
/// use jrpc_define::{CompilationUnit, Import, Message};
/// use jrpc_gen::resolver::{resolve_message, ImportSet};
///
/// let unit = CompilationUnit::new("scenedef")
///     .message(Message::new("Scene", vec![]))
///     .import(
///         Import::new("devicedef", "device_service::def")
///             .message(Message::new("Device", vec![])),
///     );
/// let mut imports = ImportSet::default();
///
/// let local = resolve_message("Scene", &unit, &mut imports, "method 'GetScene'").unwrap();
/// assert!(local.local);
/// assert!(imports.is_empty());
///
/// let device = resolve_message("devicedef.Device", &unit, &mut imports, "field 'device'").unwrap();
/// assert_eq!(device.rust_name, "devicedef::Device");
/// assert_eq!(imports.len(), 1);
/// ```
pub fn resolve_message(
    reference: &str,
    unit: &CompilationUnit,
    imports: &mut ImportSet,
    location: &str,
) -> Result<MessageRef, GeneratorError> {
    if let Some(message) = unit.find_message(reference) {
        return Ok(MessageRef {
            rust_name: message.type_name(),
            local: true,
        });
    }

    if let Some((alias, rest)) = reference.split_once('.')
        && let Some(import) = unit.find_import(alias)
        && let Some(message) = import.messages.iter().find(|m| m.full_name() == rest)
    {
        imports.add(&import.path, Some(&import.alias));
        return Ok(MessageRef {
            rust_name: format!("{}::{}", import.alias, message.type_name()),
            local: false,
        });
    }

    Err(GeneratorError::UnresolvedType {
        type_name: reference.to_string(),
        location: location.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrpc_define::{Import, Message};

    fn unit() -> CompilationUnit {
        CompilationUnit::new("scenedef")
            .message(Message::new("Scene", vec![]))
            .message(Message::new("Action", vec![]).nested_in(["Scene"]))
            .import(
                Import::new("devicedef", "device_service::def")
                    .message(Message::new("Device", vec![]))
                    .message(Message::new("State", vec![]).nested_in(["Device"])),
            )
            .import(Import::new("userdef", "user_service::def").message(Message::new("User", vec![])))
    }

    fn resolve_ok(ty: FieldType, imports: &mut ImportSet) -> ResolvedType {
        resolve(&ty, &unit(), imports, "field 'f'").unwrap()
    }

    #[test]
    fn scalars_are_optional_values() {
        let mut imports = ImportSet::default();
        let ty = resolve_ok(FieldType::Scalar(ScalarKind::Uint32), &mut imports);

        assert_eq!(ty.storage_type(), "Option<u32>");
        assert_eq!(ty.value_type(), "u32");
        assert_eq!(ty.numeric_kind(), Some(ScalarKind::Uint32));
        assert!(ty.is_optional());
        assert!(ty.is_copy());
        assert!(!ty.is_message);
        assert!(imports.is_empty());
    }

    #[test]
    fn strings_and_bytes_are_not_copy() {
        let mut imports = ImportSet::default();
        assert!(!resolve_ok(FieldType::Scalar(ScalarKind::String), &mut imports).is_copy());
        let bytes = resolve_ok(FieldType::Scalar(ScalarKind::Bytes), &mut imports);
        assert!(!bytes.is_copy());
        assert_eq!(bytes.storage_type(), "Option<Vec<u8>>");
        assert_eq!(bytes.numeric_kind(), None);
    }

    #[test]
    fn nested_local_message_uses_flattened_name() {
        let mut imports = ImportSet::default();
        let ty = resolve_ok(FieldType::message("Scene.Action"), &mut imports);

        assert_eq!(ty.element, "Scene_Action");
        assert_eq!(ty.storage_type(), "Option<Box<Scene_Action>>");
        assert!(ty.is_message);
        assert!(ty.is_boxed());
        assert!(!ty.is_copy());
    }

    #[test]
    fn repeated_messages_are_plain_vectors() {
        let mut imports = ImportSet::default();
        let ty = resolve_ok(FieldType::repeated(FieldType::message("Scene")), &mut imports);

        assert_eq!(ty.storage_type(), "Vec<Scene>");
        assert_eq!(ty.value_type(), "Vec<Scene>");
        assert!(ty.is_repeated());
        assert!(ty.is_message);
        assert!(!ty.is_optional());
        assert_eq!(ty.numeric_kind(), None);
    }

    #[test]
    fn imported_message_is_qualified_and_registered() {
        let mut imports = ImportSet::default();
        let ty = resolve_ok(FieldType::message("devicedef.Device.State"), &mut imports);

        assert_eq!(ty.element, "devicedef::Device_State");
        assert_eq!(
            imports.entries(),
            &[ImportEntry {
                path: "device_service::def".to_string(),
                alias: Some("devicedef".to_string()),
            }]
        );
    }

    #[test]
    fn imports_are_deduplicated_in_first_use_order() {
        let mut imports = ImportSet::default();
        resolve_ok(FieldType::message("userdef.User"), &mut imports);
        resolve_ok(
            FieldType::map(ScalarKind::String, FieldType::message("devicedef.Device")),
            &mut imports,
        );
        resolve_ok(FieldType::message("userdef.User"), &mut imports);
        resolve_ok(FieldType::repeated(FieldType::message("devicedef.Device")), &mut imports);

        let paths: Vec<_> = imports.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["user_service::def", "device_service::def", HASH_MAP_PATH]
        );
    }

    #[test]
    fn map_registers_hash_map() {
        let mut imports = ImportSet::default();
        let ty = resolve_ok(
            FieldType::map(ScalarKind::Uint32, FieldType::Scalar(ScalarKind::Bool)),
            &mut imports,
        );

        assert_eq!(ty.storage_type(), "HashMap<u32, bool>");
        assert!(ty.is_map());
        assert_eq!(imports.entries()[0].path, HASH_MAP_PATH);
        assert_eq!(imports.entries()[0].alias, None);
    }

    #[test]
    fn unknown_reference_is_unresolved() {
        let mut imports = ImportSet::default();
        let err = resolve(&FieldType::message("Missing"), &unit(), &mut imports, "field 'x'")
            .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnresolvedType { ref type_name, .. } if type_name == "Missing"
        ));
    }

    #[test]
    fn unknown_alias_or_message_is_unresolved() {
        let mut imports = ImportSet::default();
        for reference in ["lightdef.Light", "devicedef.Missing", "Action"] {
            let err = resolve(&FieldType::message(reference), &unit(), &mut imports, "field 'x'");
            assert!(matches!(err, Err(GeneratorError::UnresolvedType { .. })));
        }
        assert!(imports.is_empty());
    }

    #[test]
    fn nested_collections_are_unsupported() {
        let mut imports = ImportSet::default();
        let ty = FieldType::repeated(FieldType::repeated(FieldType::Scalar(ScalarKind::Int32)));
        let err = resolve(&ty, &unit(), &mut imports, "field 'grid'").unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedType { .. }));
    }

    #[test]
    fn float_map_keys_are_unsupported() {
        let mut imports = ImportSet::default();
        let ty = FieldType::map(ScalarKind::Double, FieldType::Scalar(ScalarKind::Int32));
        let err = resolve(&ty, &unit(), &mut imports, "field 'weights'").unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedType { .. }));
    }
}

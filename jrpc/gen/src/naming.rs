//! Identifier derivation for generated code.
//!
//! Converts schema names into Rust identifiers and rejects names that
//! cannot become valid ones.

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

use crate::errors::GeneratorError;

static SERVICE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*Service$").expect("Invalid service name regex")
});

static TYPE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("Invalid type name regex"));

static SNAKE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("Invalid snake name regex"));

static MODULE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(::)?[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("Invalid module path regex")
});

/// Keywords that can still be used as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be identifiers at all, not even raw ones.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Derives the router type name for a service.
///
/// The service name must be alphanumeric camel case ending in `Service`.
/// The suffix is replaced with `Router` and the first letter upper-cased.
///
/// ## Examples
///
/// ```
/// use jrpc_gen::naming::router_name;
///
/// assert_eq!(router_name("SceneService").unwrap(), "SceneRouter");
/// assert_eq!(router_name("deviceService").unwrap(), "DeviceRouter");
/// assert!(router_name("SceneService2").is_err());
/// ```
pub fn router_name(service_name: &str) -> Result<String, GeneratorError> {
    if !SERVICE_NAME_RE.is_match(service_name) {
        return Err(GeneratorError::InvalidServiceName(service_name.to_string()));
    }

    // Only the final `Service` is replaced: `FooServiceService` keeps its stem.
    let stem = service_name
        .strip_suffix("Service")
        .unwrap_or(service_name);
    let mut chars = stem.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Ok(format!("{}Router", title))
}

/// Checks that a flattened message name is a valid type identifier.
pub fn check_type_name(name: &str) -> Result<(), GeneratorError> {
    if TYPE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(GeneratorError::invalid_identifier(
            "message name",
            name,
            "must start with an uppercase letter and contain only letters, digits and underscores",
        ))
    }
}

/// Returns `true` if `path` is a plain Rust path such as `crate::def` or `::jrpc`.
pub fn is_module_path(path: &str) -> bool {
    MODULE_PATH_RE.is_match(path) && !path.split("::").any(|segment| RAW_KEYWORDS.contains(&segment))
}

/// Checks that an import can be emitted as `use <path> as <alias>;`.
///
/// ## Examples
///
/// ```
/// use jrpc_gen::naming::check_import;
///
/// assert!(check_import("devicedef", "device_service::def").is_ok());
/// assert!(check_import("device-def", "device_service::def").is_err());
/// assert!(check_import("devicedef", "device-service").is_err());
/// ```
pub fn check_import(alias: &str, path: &str) -> Result<(), GeneratorError> {
    if !SNAKE_NAME_RE.is_match(alias)
        || RAW_KEYWORDS.contains(&alias)
        || RESERVED.contains(&alias)
    {
        return Err(GeneratorError::invalid_identifier(
            "import alias",
            alias,
            "must be a lowercase identifier that is not a keyword",
        ));
    }
    if !is_module_path(path) {
        return Err(GeneratorError::invalid_identifier(
            "import path",
            path,
            "must be a Rust module path",
        ));
    }
    Ok(())
}

/// Converts a field name into a Rust field identifier.
///
/// Names already in snake case are kept as they are; anything else is
/// converted. Keywords become raw identifiers.
///
/// ## Examples
///
/// ```
/// use jrpc_gen::naming::field_ident;
///
/// assert_eq!(field_ident("scene_id").unwrap(), "scene_id");
/// assert_eq!(field_ident("SceneId").unwrap(), "scene_id");
/// assert_eq!(field_ident("type").unwrap(), "r#type");
/// assert!(field_ident("self").is_err());
/// ```
pub fn field_ident(name: &str) -> Result<String, GeneratorError> {
    let snake = to_snake(name);
    check_snake("field name", name, &snake)?;
    Ok(escape_keyword(&snake))
}

/// Converts an RPC method name into the snake case name used for its
/// handler slot and client function.
///
/// ## Examples
///
/// ```
/// use jrpc_gen::naming::method_ident;
///
/// assert_eq!(method_ident("SetScene").unwrap(), "set_scene");
/// ```
pub fn method_ident(name: &str) -> Result<String, GeneratorError> {
    let snake = to_snake(name);
    check_snake("method name", name, &snake)?;
    Ok(escape_keyword(&snake))
}

/// Name of the setter for a field identifier (`r#type` becomes `set_type`).
pub fn setter_name(field_ident: &str) -> String {
    format!("set_{}", unraw(field_ident))
}

/// Strips the raw identifier prefix, if any.
pub fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

fn to_snake(name: &str) -> String {
    if SNAKE_NAME_RE.is_match(name) {
        name.to_string()
    } else {
        name.to_case(Case::Snake)
    }
}

fn check_snake(kind: &str, original: &str, snake: &str) -> Result<(), GeneratorError> {
    if RESERVED.contains(&snake) {
        return Err(GeneratorError::invalid_identifier(
            kind,
            original,
            "is a reserved Rust keyword",
        ));
    }
    if !SNAKE_NAME_RE.is_match(snake) || snake.chars().all(|c| c == '_') {
        return Err(GeneratorError::invalid_identifier(
            kind,
            original,
            format!("'{}' is not a valid Rust identifier", snake),
        ));
    }
    Ok(())
}

fn escape_keyword(snake: &str) -> String {
    if RAW_KEYWORDS.contains(&snake) {
        format!("r#{}", snake)
    } else {
        snake.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_name_strips_suffix() {
        assert_eq!(router_name("SceneService").unwrap(), "SceneRouter");
        assert_eq!(router_name("DmxService").unwrap(), "DmxRouter");
        assert_eq!(router_name("Hue2Service").unwrap(), "Hue2Router");
    }

    #[test]
    fn router_name_strips_suffix_once() {
        assert_eq!(
            router_name("FooServiceService").unwrap(),
            "FooServiceRouter"
        );
        assert_eq!(router_name("ServiceService").unwrap(), "ServiceRouter");
    }

    #[test]
    fn router_name_rejects_bad_patterns() {
        for name in ["scene", "SceneService2", "123Service", "Service", "Scene_Service", ""] {
            assert!(
                matches!(router_name(name), Err(GeneratorError::InvalidServiceName(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn type_names() {
        assert!(check_type_name("Scene").is_ok());
        assert!(check_type_name("Scene_Action").is_ok());
        assert!(check_type_name("scene").is_err());
        assert!(check_type_name("Scene-Action").is_err());
        assert!(check_type_name("").is_err());
    }

    #[test]
    fn field_idents() {
        assert_eq!(field_ident("brightness").unwrap(), "brightness");
        assert_eq!(field_ident("sceneId").unwrap(), "scene_id");
        assert_eq!(field_ident("match").unwrap(), "r#match");
        assert!(field_ident("crate").is_err());
        assert!(field_ident("_").is_err());
        assert!(field_ident("").is_err());
    }

    #[test]
    fn setter_for_raw_ident() {
        assert_eq!(setter_name("r#type"), "set_type");
        assert_eq!(setter_name("scene_id"), "set_scene_id");
    }

    #[test]
    fn module_paths() {
        assert!(is_module_path("jrpc"));
        assert!(is_module_path("crate::scene::def"));
        assert!(is_module_path("::jrpc"));
        assert!(!is_module_path("jrpc::"));
        assert!(!is_module_path("crate::mod::def"));
        assert!(!is_module_path(""));
    }

    #[test]
    fn import_aliases() {
        assert!(check_import("userdef", "user_service::def").is_ok());
        assert!(check_import("type", "user_service::def").is_err());
        assert!(check_import("self", "user_service::def").is_err());
        assert!(check_import("UserDef", "user_service::def").is_err());
    }

    #[test]
    fn method_idents() {
        assert_eq!(method_ident("ListScenes").unwrap(), "list_scenes");
        assert_eq!(method_ident("delete_scene").unwrap(), "delete_scene");
        assert_eq!(method_ident("Loop").unwrap(), "r#loop");
    }
}

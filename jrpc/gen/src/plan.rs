//! Typed generation plan.
//!
//! [`build`] resolves and checks a whole [`CompilationUnit`] up front. The
//! resulting [`UnitPlan`] is everything the code emitters need: names are
//! final, types are resolved, rules are compiled and every clash has been
//! reported before any code is built.

use std::collections::{HashMap, HashSet};

use jrpc_define::{CompilationUnit, HttpMethod, Message, Service};

use crate::errors::GeneratorError;
use crate::naming::{
    check_import, check_type_name, field_ident, method_ident, router_name, setter_name, unraw,
};
use crate::resolver::{ImportEntry, ImportSet, MessageRef, ResolvedType, resolve, resolve_message};
use crate::rules::{FieldRules, compile};

/// Methods every generated router defines itself.
const ROUTER_METHODS: &[&str] = &["new", "into_router"];

/// The plan for one compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPlan {
    pub package: String,
    /// `use` declarations, in first-use order.
    pub imports: Vec<ImportEntry>,
    pub messages: Vec<MessagePlan>,
    pub routers: Vec<RouterPlan>,
}

impl UnitPlan {
    /// Finds a local message by its emitted type name.
    pub fn message(&self, ident: &str) -> Option<&MessagePlan> {
        self.messages.iter().find(|m| m.ident == ident)
    }

    /// Every method paired with its router, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (&RouterPlan, &MethodPlan)> {
        self.routers
            .iter()
            .flat_map(|router| router.methods.iter().map(move |method| (router, method)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessagePlan {
    /// Emitted type name (e.g., `Scene_Action`).
    pub ident: String,
    /// Dotted identity (e.g., `Scene.Action`).
    pub full_name: String,
    pub fields: Vec<FieldPlan>,
    pub event: Option<EventPlan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// Rust field identifier, possibly raw (`r#type`).
    pub ident: String,
    pub setter: String,
    /// JSON member name.
    pub wire_name: String,
    pub ty: ResolvedType,
    pub rules: FieldRules,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPlan {
    /// Name the event is published under.
    pub name: String,
    /// Emitted subscriber type (e.g., `SetSceneEventHandler`).
    pub handler_ident: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterPlan {
    /// Emitted router type (e.g., `SceneRouter`).
    pub ident: String,
    pub service: String,
    /// Router base name every path is appended to (e.g., `service.scene`).
    pub base: String,
    pub methods: Vec<MethodPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPlan {
    /// Declared name (e.g., `SetScene`).
    pub name: String,
    /// Snake case name of the handler slot and client binding.
    pub ident: String,
    pub input: MessageRef,
    pub output: MessageRef,
    pub http_method: HttpMethod,
    pub path: String,
    /// Router base name followed by the path.
    pub url: String,
}

/// Builds the plan for `unit`.
///
/// ## Errors
///
/// Returns the first resolution, option or naming problem found. No plan
/// is produced for a unit with any error.
///
/// ## Examples
///
/// ```
/// use jrpc_define::{CompilationUnit, Field, FieldType, HttpMethod, Message, Method, ScalarKind, Service};
/// use jrpc_gen::plan::build;
///
/// let unit = CompilationUnit::new("scenedef")
///     .message(Message::new(
///         "SetSceneRequest",
///         vec![Field::new("scene_id", FieldType::Scalar(ScalarKind::Uint32)).required()],
///     ))
///     .message(Message::new("SetSceneResponse", vec![]))
///     .service(Service::new(
///         "SceneService",
///         "service.scene",
///         vec![Method::new("SetScene", "SetSceneRequest", "SetSceneResponse", HttpMethod::Post, "/scene/set")],
///     ));
///
/// let plan = build(&unit).unwrap();
/// assert_eq!(plan.routers[0].ident, "SceneRouter");
/// assert_eq!(plan.routers[0].methods[0].url, "service.scene/scene/set");
/// assert!(plan.messages[0].fields[0].rules.required);
/// ```
pub fn build(unit: &CompilationUnit) -> Result<UnitPlan, GeneratorError> {
    let mut imports = ImportSet::default();
    let mut type_names = HashSet::new();

    let mut messages = Vec::with_capacity(unit.messages.len());
    for message in &unit.messages {
        let plan = plan_message(message, unit, &mut imports)?;
        claim_type_name(&mut type_names, &plan.ident, &plan.full_name)?;
        if let Some(event) = &plan.event {
            claim_type_name(&mut type_names, &event.handler_ident, &plan.full_name)?;
        }
        messages.push(plan);
    }
    check_event_names(&messages)?;

    let mut routers = Vec::with_capacity(unit.services.len());
    for service in &unit.services {
        let plan = plan_service(service, unit, &mut imports)?;
        claim_type_name(&mut type_names, &plan.ident, &service.name)?;
        routers.push(plan);
    }
    check_client_bindings(&messages, &routers)?;

    for entry in imports.entries() {
        if let Some(alias) = &entry.alias {
            check_import(alias, &entry.path)?;
        }
    }

    tracing::debug!(
        package = %unit.package,
        messages = messages.len(),
        routers = routers.len(),
        imports = imports.len(),
        "Built unit plan"
    );

    Ok(UnitPlan {
        package: unit.package.clone(),
        imports: imports.into_entries(),
        messages,
        routers,
    })
}

fn plan_message(
    message: &Message,
    unit: &CompilationUnit,
    imports: &mut ImportSet,
) -> Result<MessagePlan, GeneratorError> {
    let ident = message.type_name();
    let full_name = message.full_name();
    check_type_name(&ident)?;

    let mut fields = Vec::with_capacity(message.fields.len());
    let mut seen = HashSet::new();
    for field in &message.fields {
        let location = format!("field '{}' of message '{}'", field.name, full_name);
        let ty = resolve(&field.ty, unit, imports, &location)?;
        let rules = compile(field, &ty, &location)?;
        let ident = field_ident(&field.name)?;

        if !seen.insert(unraw(&ident).to_string()) {
            return Err(GeneratorError::duplicate(
                &field.name,
                format!("message '{}' has two fields named '{}'", full_name, unraw(&ident)),
            ));
        }

        fields.push(FieldPlan {
            setter: setter_name(&ident),
            ident,
            wire_name: field.name.clone(),
            ty,
            rules,
        });
    }

    // Getters and setters share one inherent impl.
    for field in &fields {
        if seen.contains(&field.setter) {
            return Err(GeneratorError::duplicate(
                &field.setter,
                format!(
                    "setter of field '{}' clashes with a getter of message '{}'",
                    field.wire_name, full_name
                ),
            ));
        }
    }

    let event = message
        .event
        .as_ref()
        .map(|event| {
            if seen.contains("publish") {
                return Err(GeneratorError::duplicate(
                    "publish",
                    format!("field getter clashes with the publish method of event '{}'", full_name),
                ));
            }
            Ok(EventPlan {
                name: event.name.clone(),
                handler_ident: format!("{}Handler", ident),
            })
        })
        .transpose()?;

    tracing::debug!(message = %full_name, fields = fields.len(), event = event.is_some(), "Planned message");

    Ok(MessagePlan {
        ident,
        full_name,
        fields,
        event,
    })
}

fn plan_service(
    service: &Service,
    unit: &CompilationUnit,
    imports: &mut ImportSet,
) -> Result<RouterPlan, GeneratorError> {
    let ident = router_name(&service.name)?;
    let base = service.router.name.trim();
    if base.is_empty() || base.chars().any(char::is_whitespace) {
        return Err(GeneratorError::invalid_identifier(
            "router name",
            &service.router.name,
            "must be non-empty and contain no whitespace",
        ));
    }

    let mut methods: Vec<MethodPlan> = Vec::with_capacity(service.methods.len());
    let mut routes = HashSet::new();
    for method in &service.methods {
        let location = format!("method '{}' of service '{}'", method.name, service.name);
        let method_ident = method_ident(&method.name)?;

        if ROUTER_METHODS.contains(&unraw(&method_ident)) {
            return Err(GeneratorError::invalid_identifier(
                "method name",
                &method.name,
                format!("'{}' is reserved on generated routers", unraw(&method_ident)),
            ));
        }
        if methods.iter().any(|m| m.name == method.name || m.ident == method_ident) {
            return Err(GeneratorError::duplicate(
                &method.name,
                format!("service '{}' declares the method more than once", service.name),
            ));
        }

        let path = &method.handler.path;
        if !path.starts_with('/') || path.chars().any(char::is_whitespace) {
            return Err(GeneratorError::invalid_identifier(
                "route path",
                path,
                format!("{} must start with '/' and contain no whitespace", location),
            ));
        }
        if !routes.insert((method.handler.method, path.clone())) {
            return Err(GeneratorError::duplicate(
                format!("{} {}", method.handler.method, path),
                format!("route is bound twice in service '{}'", service.name),
            ));
        }

        let input = resolve_message(&method.input, unit, imports, &location)?;
        let output = resolve_message(&method.output, unit, imports, &location)?;

        methods.push(MethodPlan {
            name: method.name.clone(),
            ident: method_ident,
            input,
            output,
            http_method: method.handler.method,
            path: path.clone(),
            url: format!("{}{}", base, path),
        });
    }

    tracing::debug!(service = %service.name, router = %ident, methods = methods.len(), "Planned router");

    Ok(RouterPlan {
        ident,
        service: service.name.clone(),
        base: base.to_string(),
        methods,
    })
}

fn claim_type_name(
    claimed: &mut HashSet<String>,
    ident: &str,
    owner: &str,
) -> Result<(), GeneratorError> {
    if claimed.insert(ident.to_string()) {
        Ok(())
    } else {
        Err(GeneratorError::duplicate(
            ident,
            format!("type emitted for '{}' is already defined in this unit", owner),
        ))
    }
}

fn check_event_names(messages: &[MessagePlan]) -> Result<(), GeneratorError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for message in messages {
        let Some(event) = &message.event else {
            continue;
        };
        if event.name.is_empty() || event.name.chars().any(char::is_whitespace) {
            return Err(GeneratorError::invalid_identifier(
                "event name",
                &event.name,
                format!(
                    "event of message '{}' must be non-empty and contain no whitespace",
                    message.full_name
                ),
            ));
        }
        if let Some(previous) = seen.insert(&event.name, &message.full_name) {
            return Err(GeneratorError::invalid_identifier(
                "event name",
                &event.name,
                format!(
                    "used by both '{}' and '{}'",
                    previous, message.full_name
                ),
            ));
        }
    }
    Ok(())
}

/// Client stubs on a local input type become inherent methods, so they
/// share a namespace with its accessors and with each other.
fn check_client_bindings(
    messages: &[MessagePlan],
    routers: &[RouterPlan],
) -> Result<(), GeneratorError> {
    let mut bound: HashMap<(&str, &str), &str> = HashMap::new();
    let mut free: HashMap<&str, &str> = HashMap::new();

    for router in routers {
        for method in &router.methods {
            let name = unraw(&method.ident);
            if !method.input.local {
                if let Some(previous) = free.insert(name, &method.name) {
                    return Err(GeneratorError::duplicate(
                        name,
                        format!(
                            "client functions for '{}' and '{}' share a name",
                            previous, method.name
                        ),
                    ));
                }
                continue;
            }

            let input = method.input.rust_name.as_str();
            if let Some(previous) = bound.insert((input, name), &method.name) {
                return Err(GeneratorError::duplicate(
                    name,
                    format!(
                        "methods '{}' and '{}' both bind a client call on '{}'",
                        previous, method.name, input
                    ),
                ));
            }

            if let Some(message) = messages.iter().find(|m| &m.ident == input) {
                let clashes = message
                    .fields
                    .iter()
                    .any(|f| unraw(&f.ident) == name || f.setter == name)
                    || (message.event.is_some() && name == "publish");
                if clashes {
                    return Err(GeneratorError::duplicate(
                        name,
                        format!(
                            "client call for method '{}' clashes with an accessor of '{}'",
                            method.name, input
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{scene_unit, set_scene_method};
    use jrpc_define::{Field, FieldType, Import, Method, ScalarKind};

    fn expect_duplicate(result: Result<UnitPlan, GeneratorError>) -> String {
        match result {
            Err(GeneratorError::DuplicateBinding { name, .. }) => name,
            other => panic!("expected DuplicateBinding, got {:?}", other),
        }
    }

    fn expect_invalid(result: Result<UnitPlan, GeneratorError>) -> String {
        match result {
            Err(GeneratorError::InvalidIdentifier { kind, .. }) => kind,
            other => panic!("expected InvalidIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn scene_unit_plans() {
        let plan = build(&scene_unit()).unwrap();

        assert_eq!(plan.package, "scenedef");
        let request = plan.message("SetSceneRequest").unwrap();
        assert_eq!(request.fields[0].ident, "scene_id");
        assert_eq!(request.fields[0].setter, "set_scene_id");
        assert!(request.fields[0].rules.required);

        let event = plan.message("SetSceneEvent").unwrap().event.as_ref().unwrap();
        assert_eq!(event.name, "set-scene");
        assert_eq!(event.handler_ident, "SetSceneEventHandler");

        let (router, method) = plan.methods().next().unwrap();
        assert_eq!(router.ident, "SceneRouter");
        assert_eq!(router.base, "service.scene");
        assert_eq!(method.ident, "set_scene");
        assert_eq!(method.url, "service.scene/scene/set");
        assert!(method.input.local);
    }

    #[test]
    fn invalid_service_name_aborts() {
        let unit = scene_unit().service(Service::new("scene", "service.other", vec![]));
        assert!(matches!(build(&unit), Err(GeneratorError::InvalidServiceName(_))));
    }

    #[test]
    fn duplicate_method_names_are_rejected() {
        let mut unit = scene_unit();
        let mut second = set_scene_method();
        second.handler.path = "/scene/set2".to_string();
        unit.services[0].methods.push(second);

        assert_eq!(expect_duplicate(build(&unit)), "SetScene");
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let mut unit = scene_unit();
        let mut second = set_scene_method();
        second.name = "ApplyScene".to_string();
        unit.services[0].methods.push(second);

        assert_eq!(expect_duplicate(build(&unit)), "POST /scene/set");
    }

    #[test]
    fn client_bindings_on_same_input_must_differ() {
        let unit = scene_unit().service(Service::new(
            "LegacySceneService",
            "service.legacy",
            vec![set_scene_method()],
        ));
        assert_eq!(expect_duplicate(build(&unit)), "set_scene");
    }

    #[test]
    fn path_without_leading_slash_is_rejected() {
        let mut unit = scene_unit();
        unit.services[0].methods[0].handler.path = "scene/set".to_string();
        assert_eq!(expect_invalid(build(&unit)), "route path");
    }

    #[test]
    fn reserved_router_method_is_rejected() {
        let mut unit = scene_unit();
        unit.services[0].methods[0].name = "IntoRouter".to_string();
        assert_eq!(expect_invalid(build(&unit)), "method name");
    }

    #[test]
    fn duplicate_event_names_are_rejected() {
        let unit = scene_unit().message(
            Message::new("SceneChanged", vec![]).event("set-scene"),
        );
        assert_eq!(expect_invalid(build(&unit)), "event name");
    }

    #[test]
    fn empty_event_name_is_rejected() {
        let unit = scene_unit().message(Message::new("Blank", vec![]).event(""));
        assert_eq!(expect_invalid(build(&unit)), "event name");
    }

    #[test]
    fn fields_converting_to_same_ident_are_rejected() {
        let unit = CompilationUnit::new("scenedef").message(Message::new(
            "Scene",
            vec![
                Field::new("sceneId", FieldType::Scalar(ScalarKind::Uint32)),
                Field::new("scene_id", FieldType::Scalar(ScalarKind::Uint32)),
            ],
        ));
        assert_eq!(expect_duplicate(build(&unit)), "scene_id");
    }

    #[test]
    fn setter_clashing_with_getter_is_rejected() {
        let unit = CompilationUnit::new("scenedef").message(Message::new(
            "Scene",
            vec![
                Field::new("name", FieldType::Scalar(ScalarKind::String)),
                Field::new("set_name", FieldType::Scalar(ScalarKind::Bool)),
            ],
        ));
        assert_eq!(expect_duplicate(build(&unit)), "set_name");
    }

    #[test]
    fn nested_name_clashing_with_top_level_is_rejected() {
        let unit = CompilationUnit::new("scenedef")
            .message(Message::new("Scene_Action", vec![]))
            .message(Message::new("Scene", vec![]))
            .message(Message::new("Action", vec![]).nested_in(["Scene"]));
        assert_eq!(expect_duplicate(build(&unit)), "Scene_Action");
    }

    #[test]
    fn unresolved_method_input_aborts() {
        let mut unit = scene_unit();
        unit.services[0].methods[0].input = "MissingRequest".to_string();
        assert!(matches!(
            build(&unit),
            Err(GeneratorError::UnresolvedType { .. })
        ));
    }

    #[test]
    fn imported_input_is_not_local() {
        let unit = scene_unit()
            .import(
                Import::new("devicedef", "device_service::def")
                    .message(Message::new("Device", vec![])),
            )
            .service(Service::new(
                "DeviceSceneService",
                "service.device-scene",
                vec![Method::new(
                    "Describe",
                    "devicedef.Device",
                    "SetSceneResponse",
                    HttpMethod::Get,
                    "/device",
                )],
            ));

        let plan = build(&unit).unwrap();
        let method = &plan.routers[1].methods[0];
        assert!(!method.input.local);
        assert_eq!(method.input.rust_name, "devicedef::Device");
        assert_eq!(plan.imports[0].path, "device_service::def");
    }

    #[test]
    fn unusable_import_alias_is_rejected() {
        let unit = CompilationUnit::new("scenedef")
            .import(Import::new("device-def", "device_service::def").message(Message::new("Device", vec![])))
            .message(Message::new(
                "Scene",
                vec![Field::new("device", FieldType::message("device-def.Device"))],
            ));
        assert_eq!(expect_invalid(build(&unit)), "import alias");
    }
}

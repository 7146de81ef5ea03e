//! Shared fixtures for jrpc-gen unit tests.

use jrpc_define::{
    Bound, CompilationUnit, Field, FieldType, HttpMethod, Import, Message, Method, ScalarKind,
    Service,
};
use proc_macro2::TokenStream;

use crate::config::GeneratorOptions;
use crate::plan::{UnitPlan, build};

/// The `SetScene` method of `SceneService`.
pub fn set_scene_method() -> Method {
    Method::new(
        "SetScene",
        "SetSceneRequest",
        "SetSceneResponse",
        HttpMethod::Post,
        "/scene/set",
    )
}

/// A unit with one request/response pair, one event and one service.
pub fn scene_unit() -> CompilationUnit {
    CompilationUnit::new("scenedef")
        .message(Message::new(
            "SetSceneRequest",
            vec![Field::new("scene_id", FieldType::Scalar(ScalarKind::Uint32)).required()],
        ))
        .message(Message::new("SetSceneResponse", vec![]))
        .message(
            Message::new(
                "SetSceneEvent",
                vec![Field::new("scene_id", FieldType::Scalar(ScalarKind::Uint32)).required()],
            )
            .event("set-scene"),
        )
        .service(Service::new(
            "SceneService",
            "service.scene",
            vec![set_scene_method()],
        ))
}

/// A unit exercising every field shape, nesting and an import.
pub fn lighting_unit() -> CompilationUnit {
    CompilationUnit::new("lightingdef")
        .import(
            Import::new("devicedef", "device_service::def")
                .message(Message::new("Device", vec![])),
        )
        .message(Message::new(
            "Scene",
            vec![
                Field::new("id", FieldType::Scalar(ScalarKind::Uint32)).required(),
                Field::new("name", FieldType::Scalar(ScalarKind::String)),
                Field::new("brightness", FieldType::Scalar(ScalarKind::Double))
                    .min(Bound::Int(0))
                    .max(Bound::Float(1.5)),
                Field::new("level", FieldType::Scalar(ScalarKind::Int32))
                    .min(Bound::Int(-5))
                    .max(Bound::Int(5)),
                Field::new("actions", FieldType::repeated(FieldType::message("Scene.Action"))),
                Field::new(
                    "labels",
                    FieldType::map(ScalarKind::String, FieldType::Scalar(ScalarKind::String)),
                ),
                Field::new(
                    "fixtures",
                    FieldType::map(ScalarKind::String, FieldType::message("Scene.Action")),
                ),
                Field::new("owner", FieldType::message("devicedef.Device")),
                Field::new("type", FieldType::Scalar(ScalarKind::Bytes)),
                Field::new("parent", FieldType::message("Scene")),
            ],
        ))
        .message(
            Message::new(
                "Action",
                vec![Field::new("device_id", FieldType::Scalar(ScalarKind::String)).required()],
            )
            .nested_in(["Scene"]),
        )
}

/// Plans `unit`, panicking on errors.
pub fn plan(unit: &CompilationUnit) -> UnitPlan {
    build(unit).expect("unit should plan")
}

/// Default options with every binding enabled.
pub fn options() -> GeneratorOptions {
    GeneratorOptions::default()
}

/// Formats a token stream as a standalone file for string assertions.
pub fn render(tokens: &TokenStream) -> String {
    let file: syn::File = syn::parse2(tokens.clone()).expect("generated tokens should parse");
    prettyplease::unparse(&file)
}

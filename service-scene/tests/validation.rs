//! Checks compiled into the generated `Validate` impls.

use jrpc::{ErrorKind, Validate};
use service_scene::def::{ListScenesResponse, Scene, Scene_Action, SetSceneRequest};

fn action(level: u32) -> Scene_Action {
    let mut action = Scene_Action::default();
    action.set_device_id("lamp-1").set_level(level);
    action
}

fn scene(brightness: u32) -> Scene {
    let mut scene = Scene::default();
    scene.set_id(1).set_brightness(brightness);
    scene
}

#[test]
fn level_bounds_are_inclusive() {
    assert!(action(1).validate().is_ok());
    assert!(action(255).validate().is_ok());

    let low = action(0).validate().unwrap_err();
    assert_eq!(low.kind(), ErrorKind::BadRequest);
    assert_eq!(low.message(), "field 'level' should be ≥ 1");

    let high = action(256).validate().unwrap_err();
    assert_eq!(high.message(), "field 'level' should be ≤ 255");
}

#[test]
fn unset_bounded_field_passes() {
    let mut action = Scene_Action::default();
    action.set_device_id("lamp-1");
    assert!(action.validate().is_ok());
}

#[test]
fn brightness_maximum_is_inclusive() {
    assert!(scene(100).validate().is_ok());
    assert_eq!(
        scene(101).validate().unwrap_err().message(),
        "field 'brightness' should be ≤ 100"
    );
}

#[test]
fn required_field_must_be_present() {
    let err = SetSceneRequest::default().validate().unwrap_err();
    assert_eq!(err.message(), "field 'scene_id' is required");

    let mut request = SetSceneRequest::default();
    request.set_scene_id(0);
    assert!(request.validate().is_ok());
}

#[test]
fn repeated_messages_are_validated() {
    let mut scene = scene(10);
    scene.set_actions(vec![action(10), action(300)]);

    assert_eq!(
        scene.validate().unwrap_err().message(),
        "field 'level' should be ≤ 255"
    );
}

#[test]
fn validation_recurses_through_every_level() {
    let mut missing_device = Scene_Action::default();
    missing_device.set_level(5);
    let mut nested = scene(10);
    nested.set_actions(vec![missing_device]);

    let mut response = ListScenesResponse::default();
    response.set_scenes(vec![scene(1), nested]);

    assert_eq!(
        response.validate().unwrap_err().message(),
        "field 'device_id' is required"
    );
}

#[test]
fn first_failure_in_declaration_order_wins() {
    // Missing `id` is declared before the out-of-range brightness.
    let mut scene = Scene::default();
    scene.set_brightness(500);

    assert_eq!(
        scene.validate().unwrap_err().message(),
        "field 'id' is required"
    );
}

#[test]
#[should_panic(expected = "scene_id marked as required but was not set")]
fn required_getter_panics_when_unset() {
    SetSceneRequest::default().scene_id();
}

#[test]
fn optional_getter_reports_absence() {
    let scene = Scene::default();
    assert_eq!(scene.name(), None);
    assert_eq!(scene.brightness(), None);
    assert!(scene.actions().is_empty());
}

#[test]
fn unset_fields_are_omitted_from_json() {
    let mut scene = Scene::default();
    scene.set_id(3);

    assert_eq!(serde_json::to_string(&scene).unwrap(), r#"{"id":3}"#);
}

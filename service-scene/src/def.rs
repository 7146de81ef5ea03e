// Code generated by jrpc-gen. DO NOT EDIT.

//! Generated bindings for the `scenedef` unit.
//!
//! Collections cannot tell an omitted value from an empty one: both decode as empty.
#[allow(unused_imports)]
use jrpc as rt;
use serde::{Deserialize, Serialize};
/// `Scene` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "brightness", default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u32>,
    #[serde(rename = "actions", default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Scene_Action>,
}
impl Scene {
    /// Returns `id`.
    ///
    /// # Panics
    ///
    /// Panics if the field is unset. Validated messages always have it.
    pub fn id(&self) -> u32 {
        match self.id {
            Some(value) => value,
            None => panic!("{}", "id marked as required but was not set"),
        }
    }
    /// Sets `id`.
    pub fn set_id(&mut self, value: u32) -> &mut Self {
        self.id = Some(value);
        self
    }
    /// Returns `name`, or `None` if it was not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    /// Sets `name`.
    pub fn set_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.name = Some(value.into());
        self
    }
    /// Returns `brightness`, or `None` if it was not set.
    pub fn brightness(&self) -> Option<u32> {
        self.brightness
    }
    /// Sets `brightness`.
    pub fn set_brightness(&mut self, value: u32) -> &mut Self {
        self.brightness = Some(value);
        self
    }
    /// Returns `actions`. An omitted list is empty.
    pub fn actions(&self) -> &[Scene_Action] {
        &self.actions
    }
    /// Sets `actions`.
    pub fn set_actions(&mut self, value: Vec<Scene_Action>) -> &mut Self {
        self.actions = value;
        self
    }
}
impl rt::Validate for Scene {
    fn validate(&self) -> Result<(), rt::Error> {
        if self.id.is_none() {
            return Err(rt::Error::bad_request("field 'id' is required"));
        }
        if self.brightness.is_some_and(|value| value > 100) {
            return Err(rt::Error::bad_request("field 'brightness' should be ≤ 100"));
        }
        for value in &self.actions {
            rt::Validate::validate(value)?;
        }
        Ok(())
    }
}
/// `Scene.Action` message.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene_Action {
    #[serde(rename = "device_id", default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(rename = "level", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}
impl Scene_Action {
    /// Returns `device_id`.
    ///
    /// # Panics
    ///
    /// Panics if the field is unset. Validated messages always have it.
    pub fn device_id(&self) -> &str {
        match self.device_id.as_deref() {
            Some(value) => value,
            None => panic!("{}", "device_id marked as required but was not set"),
        }
    }
    /// Sets `device_id`.
    pub fn set_device_id(&mut self, value: impl Into<String>) -> &mut Self {
        self.device_id = Some(value.into());
        self
    }
    /// Returns `level`, or `None` if it was not set.
    pub fn level(&self) -> Option<u32> {
        self.level
    }
    /// Sets `level`.
    pub fn set_level(&mut self, value: u32) -> &mut Self {
        self.level = Some(value);
        self
    }
}
impl rt::Validate for Scene_Action {
    fn validate(&self) -> Result<(), rt::Error> {
        if self.device_id.is_none() {
            return Err(rt::Error::bad_request("field 'device_id' is required"));
        }
        if self.level.is_some_and(|value| value < 1) {
            return Err(rt::Error::bad_request("field 'level' should be ≥ 1"));
        }
        if self.level.is_some_and(|value| value > 255) {
            return Err(rt::Error::bad_request("field 'level' should be ≤ 255"));
        }
        Ok(())
    }
}
/// `SetSceneRequest` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetSceneRequest {
    #[serde(rename = "scene_id", default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<u32>,
}
impl SetSceneRequest {
    /// Returns `scene_id`.
    ///
    /// # Panics
    ///
    /// Panics if the field is unset. Validated messages always have it.
    pub fn scene_id(&self) -> u32 {
        match self.scene_id {
            Some(value) => value,
            None => panic!("{}", "scene_id marked as required but was not set"),
        }
    }
    /// Sets `scene_id`.
    pub fn set_scene_id(&mut self, value: u32) -> &mut Self {
        self.scene_id = Some(value);
        self
    }
}
impl rt::Validate for SetSceneRequest {
    fn validate(&self) -> Result<(), rt::Error> {
        if self.scene_id.is_none() {
            return Err(rt::Error::bad_request("field 'scene_id' is required"));
        }
        Ok(())
    }
}
/// `SetSceneResponse` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetSceneResponse {}
impl rt::Validate for SetSceneResponse {
    fn validate(&self) -> Result<(), rt::Error> {
        Ok(())
    }
}
/// `ListScenesRequest` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListScenesRequest {}
impl rt::Validate for ListScenesRequest {
    fn validate(&self) -> Result<(), rt::Error> {
        Ok(())
    }
}
/// `ListScenesResponse` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListScenesResponse {
    #[serde(rename = "scenes", default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,
}
impl ListScenesResponse {
    /// Returns `scenes`. An omitted list is empty.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }
    /// Sets `scenes`.
    pub fn set_scenes(&mut self, value: Vec<Scene>) -> &mut Self {
        self.scenes = value;
        self
    }
}
impl rt::Validate for ListScenesResponse {
    fn validate(&self) -> Result<(), rt::Error> {
        for value in &self.scenes {
            rt::Validate::validate(value)?;
        }
        Ok(())
    }
}
/// `SetSceneEvent` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetSceneEvent {
    #[serde(rename = "scene_id", default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<u32>,
}
impl SetSceneEvent {
    /// Returns `scene_id`.
    ///
    /// # Panics
    ///
    /// Panics if the field is unset. Validated messages always have it.
    pub fn scene_id(&self) -> u32 {
        match self.scene_id {
            Some(value) => value,
            None => panic!("{}", "scene_id marked as required but was not set"),
        }
    }
    /// Sets `scene_id`.
    pub fn set_scene_id(&mut self, value: u32) -> &mut Self {
        self.scene_id = Some(value);
        self
    }
}
impl rt::Validate for SetSceneEvent {
    fn validate(&self) -> Result<(), rt::Error> {
        if self.scene_id.is_none() {
            return Err(rt::Error::bad_request("field 'scene_id' is required"));
        }
        Ok(())
    }
}
impl SetSceneEvent {
    /// Name this event is published and subscribed under.
    pub const EVENT_NAME: &'static str = "set-scene";
    /// Validates the event and hands it to `publisher`.
    ///
    /// Invalid events are rejected before the transport is touched.
    /// Transport errors are returned unchanged.
    pub fn publish(
        &self,
        publisher: &dyn rt::firehose::Publisher,
    ) -> Result<(), rt::Error> {
        rt::Validate::validate(self)?;
        rt::firehose::publish(publisher, Self::EVENT_NAME, self)
    }
}
/// Subscriber for `set-scene` events.
pub struct SetSceneEventHandler {
    handler: Box<dyn Fn(SetSceneEvent) -> rt::firehose::EventResult + Send + Sync>,
}
impl SetSceneEventHandler {
    /// Wraps a typed event handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(SetSceneEvent) -> rt::firehose::EventResult + Send + Sync + 'static,
    {
        Self { handler: Box::new(handler) }
    }
}
impl rt::firehose::EventHandler for SetSceneEventHandler {
    fn event_name(&self) -> &str {
        SetSceneEvent::EVENT_NAME
    }
    fn handle_event(&self, event: &rt::firehose::Event) -> rt::firehose::EventResult {
        match event.decode::<SetSceneEvent>() {
            Ok(payload) => (self.handler)(payload),
            Err(err) => {
                let err = err.with_message("failed to unmarshal payload");
                rt::tracing::warn!(
                    event = SetSceneEvent::EVENT_NAME, error = % err, "Discarding event"
                );
                rt::firehose::EventResult::Discard(err)
            }
        }
    }
}
/// Router for `SceneService`, served under `service.scene`.
#[derive(Default)]
pub struct SceneRouter {
    set_scene: Option<rt::Handler<SetSceneRequest, SetSceneResponse>>,
    list_scenes: Option<rt::Handler<ListScenesRequest, ListScenesResponse>>,
}
impl SceneRouter {
    /// Router name every route path is appended to.
    pub const NAME: &'static str = "service.scene";
    /// Creates a router with no handlers set.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the handler for `POST service.scene/scene/set`.
    pub fn set_scene<F>(mut self, handler: F) -> Self
    where
        F: Fn(SetSceneRequest) -> Result<SetSceneResponse, rt::Error> + Send + Sync
            + 'static,
    {
        self.set_scene = Some(Box::new(handler));
        self
    }
    /// Sets the handler for `GET service.scene/scenes`.
    pub fn list_scenes<F>(mut self, handler: F) -> Self
    where
        F: Fn(ListScenesRequest) -> Result<ListScenesResponse, rt::Error> + Send + Sync
            + 'static,
    {
        self.list_scenes = Some(Box::new(handler));
        self
    }
    /// Builds the route table.
    ///
    /// Routes whose handler was never set panic when they are called.
    pub fn into_router(self) -> rt::Router {
        let Self { set_scene, list_scenes } = self;
        let mut router = rt::Router::new();
        router
            .handle(
                rt::http::Method::POST,
                "/scene/set",
                move |request: &rt::Request| {
                    let Some(handler) = set_scene.as_ref() else {
                        panic!(
                            "{}",
                            "no handler exists for POST service.scene/scene/set",
                        );
                    };
                    let input: SetSceneRequest = match rt::request::decode(request) {
                        Ok(input) => input,
                        Err(err) => {
                            let err = rt::Error::wrap(
                                err,
                                rt::ErrorKind::BadRequest,
                                "failed to decode request",
                            );
                            rt::tracing::error!(
                                route = "POST service.scene/scene/set", error = % err,
                                "Request rejected"
                            );
                            return rt::response::write_error(&err);
                        }
                    };
                    if let Err(err) = rt::Validate::validate(&input) {
                        let err = rt::Error::wrap(
                            err,
                            rt::ErrorKind::BadRequest,
                            "failed to validate request",
                        );
                        rt::tracing::error!(
                            route = "POST service.scene/scene/set", error = % err,
                            "Request rejected"
                        );
                        return rt::response::write_error(&err);
                    }
                    match handler(input) {
                        Ok(output) => rt::response::write_json(&output),
                        Err(err) => {
                            let err = err.with_message("failed to handle request");
                            rt::tracing::error!(
                                route = "POST service.scene/scene/set", error = % err,
                                "Request failed"
                            );
                            rt::response::write_error(&err)
                        }
                    }
                },
            );
        router
            .handle(
                rt::http::Method::GET,
                "/scenes",
                move |request: &rt::Request| {
                    let Some(handler) = list_scenes.as_ref() else {
                        panic!("{}", "no handler exists for GET service.scene/scenes");
                    };
                    let input: ListScenesRequest = match rt::request::decode(request) {
                        Ok(input) => input,
                        Err(err) => {
                            let err = rt::Error::wrap(
                                err,
                                rt::ErrorKind::BadRequest,
                                "failed to decode request",
                            );
                            rt::tracing::error!(
                                route = "GET service.scene/scenes", error = % err,
                                "Request rejected"
                            );
                            return rt::response::write_error(&err);
                        }
                    };
                    if let Err(err) = rt::Validate::validate(&input) {
                        let err = rt::Error::wrap(
                            err,
                            rt::ErrorKind::BadRequest,
                            "failed to validate request",
                        );
                        rt::tracing::error!(
                            route = "GET service.scene/scenes", error = % err,
                            "Request rejected"
                        );
                        return rt::response::write_error(&err);
                    }
                    match handler(input) {
                        Ok(output) => rt::response::write_json(&output),
                        Err(err) => {
                            let err = err.with_message("failed to handle request");
                            rt::tracing::error!(
                                route = "GET service.scene/scenes", error = % err,
                                "Request failed"
                            );
                            rt::response::write_error(&err)
                        }
                    }
                },
            );
        router
    }
}
impl SetSceneRequest {
    /// Calls `SceneService.SetScene` (`POST service.scene/scene/set`).
    pub async fn set_scene(
        &self,
        client: &rt::rpc::Client,
    ) -> Result<SetSceneResponse, rt::Error> {
        client
            .call(rt::rpc::Request {
                method: rt::http::Method::POST,
                url: "service.scene/scene/set",
                body: self,
            })
            .await
    }
}
impl ListScenesRequest {
    /// Calls `SceneService.ListScenes` (`GET service.scene/scenes`).
    pub async fn list_scenes(
        &self,
        client: &rt::rpc::Client,
    ) -> Result<ListScenesResponse, rt::Error> {
        client
            .call(rt::rpc::Request {
                method: rt::http::Method::GET,
                url: "service.scene/scenes",
                body: self,
            })
            .await
    }
}

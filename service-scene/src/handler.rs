//! Request handlers for `SceneService`.

use std::sync::Arc;

use jrpc::firehose::Publisher;
use jrpc::{Error, Router};

use crate::def::{
    ListScenesRequest, ListScenesResponse, SceneRouter, SetSceneEvent, SetSceneRequest,
    SetSceneResponse,
};
use crate::store::SceneStore;

/// Implements the `SceneService` methods against a store and an event
/// publisher.
pub struct SceneHandler {
    store: Arc<dyn SceneStore>,
    publisher: Arc<dyn Publisher>,
}

impl SceneHandler {
    pub fn new(store: Arc<dyn SceneStore>, publisher: Arc<dyn Publisher>) -> Self {
        Self { store, publisher }
    }

    /// Requests that a scene be applied.
    ///
    /// The scene is applied asynchronously by whoever subscribes to
    /// `set-scene`; this only checks that it exists and publishes the event.
    ///
    /// ## Errors
    ///
    /// Returns `not_found` for an unknown scene and the publisher's error if
    /// the event cannot be handed to the transport.
    pub fn set_scene(&self, request: SetSceneRequest) -> Result<SetSceneResponse, Error> {
        let scene_id = request.scene_id();
        if self.store.get(scene_id).is_none() {
            return Err(Error::not_found(format!("scene {} not found", scene_id)));
        }

        let mut event = SetSceneEvent::default();
        event.set_scene_id(scene_id);
        event
            .publish(self.publisher.as_ref())
            .map_err(|e| e.with_message("failed to publish set-scene event"))?;

        tracing::info!(scene_id, "Scene set requested");
        Ok(SetSceneResponse::default())
    }

    /// Lists every stored scene.
    pub fn list_scenes(&self, _request: ListScenesRequest) -> Result<ListScenesResponse, Error> {
        let mut response = ListScenesResponse::default();
        response.set_scenes(self.store.list());
        Ok(response)
    }

    /// Builds the route table with every `SceneService` method bound to
    /// this handler.
    pub fn into_router(self: Arc<Self>) -> Router {
        let set = Arc::clone(&self);
        SceneRouter::new()
            .set_scene(move |request| set.set_scene(request))
            .list_scenes(move |request| self.list_scenes(request))
            .into_router()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::Scene;
    use crate::store::MemorySceneStore;
    use jrpc::ErrorKind;
    use jrpc::bytes::Bytes;
    use std::sync::Mutex;

    /// Publisher that records every event it accepts.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, Bytes)>>,
    }

    impl Publisher for Recorder {
        fn publish(&self, name: &str, payload: Bytes) -> Result<(), Error> {
            self.events.lock().unwrap().push((name.to_string(), payload));
            Ok(())
        }
    }

    struct Closed;

    impl Publisher for Closed {
        fn publish(&self, _name: &str, _payload: Bytes) -> Result<(), Error> {
            Err(Error::unavailable("event bus is closed"))
        }
    }

    fn store_with(ids: &[u32]) -> Arc<MemorySceneStore> {
        let store = MemorySceneStore::new();
        for &id in ids {
            let mut scene = Scene::default();
            scene.set_id(id);
            store.insert(scene).unwrap();
        }
        Arc::new(store)
    }

    fn request(scene_id: u32) -> SetSceneRequest {
        let mut request = SetSceneRequest::default();
        request.set_scene_id(scene_id);
        request
    }

    #[test]
    fn set_scene_publishes_event() {
        let recorder = Arc::new(Recorder::default());
        let handler = SceneHandler::new(store_with(&[4]), recorder.clone());

        handler.set_scene(request(4)).unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "set-scene");
        assert_eq!(&events[0].1[..], br#"{"scene_id":4}"#);
    }

    #[test]
    fn unknown_scene_is_not_found_and_publishes_nothing() {
        let recorder = Arc::new(Recorder::default());
        let handler = SceneHandler::new(store_with(&[4]), recorder.clone());

        let err = handler.set_scene(request(5)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "scene 5 not found");
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[test]
    fn publisher_failure_keeps_its_kind() {
        let handler = SceneHandler::new(store_with(&[1]), Arc::new(Closed));

        let err = handler.set_scene(request(1)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(
            err.message(),
            "failed to publish set-scene event: event bus is closed"
        );
    }

    #[test]
    fn list_scenes_returns_store_contents() {
        let handler = SceneHandler::new(store_with(&[2, 1]), Arc::new(Recorder::default()));

        let response = handler.list_scenes(ListScenesRequest::default()).unwrap();
        let ids: Vec<u32> = response.scenes().iter().map(Scene::id).collect();

        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn router_binds_both_methods() {
        let handler = Arc::new(SceneHandler::new(
            store_with(&[]),
            Arc::new(Recorder::default()),
        ));
        let router = handler.into_router();

        assert_eq!(router.len(), 2);
        assert!(router.contains(&jrpc::http::Method::POST, "/scene/set"));
        assert!(router.contains(&jrpc::http::Method::GET, "/scenes"));
    }

    #[tracing_test::traced_test]
    #[test]
    fn rejected_request_is_logged_with_route() {
        let handler = Arc::new(SceneHandler::new(
            store_with(&[1]),
            Arc::new(Recorder::default()),
        ));
        let router = handler.into_router();
        let request = jrpc::http::Request::post("/scene/set")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let response = router.dispatch(&request);

        assert_eq!(response.status(), jrpc::http::StatusCode::BAD_REQUEST);
        assert!(logs_contain("Request rejected"));
        assert!(logs_contain("POST service.scene/scene/set"));
    }
}

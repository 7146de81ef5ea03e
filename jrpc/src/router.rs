//! Route table shared by all requests.
//!
//! A [`Router`] is populated once at startup (generated `*Router` types call
//! [`Router::handle`] for each method) and then only read. Wrap it in an
//! `Arc` to share it across request tasks; dispatch takes `&self`.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;

use crate::error::Error;
use crate::response;

/// An inbound request with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// An outbound response with a fully buffered body.
pub type Response = http::Response<Bytes>;

/// A typed handler registered on a generated router.
pub type Handler<I, O> = Box<dyn Fn(I) -> Result<O, Error> + Send + Sync>;

type Route = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// A read-only table of routes keyed by HTTP method and path.
///
/// ## Examples
///
/// ```
/// use jrpc::{Router, response};
/// use jrpc::http::{Method, StatusCode};
///
/// let mut router = Router::new();
/// router.handle(Method::GET, "/health", |_req| response::write_json(&"ok"));
///
/// let request = jrpc::http::Request::get("/health")
///     .body(jrpc::bytes::Bytes::new())
///     .unwrap();
/// assert_eq!(router.dispatch(&request).status(), StatusCode::OK);
/// ```
#[derive(Default)]
pub struct Router {
    routes: HashMap<(Method, String), Route>,
}

impl Router {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route.
    ///
    /// # Panics
    ///
    /// Panics if a route with the same method and path is already
    /// registered. Route tables are built at startup, so a duplicate is a
    /// configuration defect rather than a runtime condition.
    pub fn handle<F>(&mut self, method: Method, path: impl Into<String>, route: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let path = path.into();
        let key = (method, path);
        if self.routes.contains_key(&key) {
            panic!("route {} {} registered twice", key.0, key.1);
        }
        tracing::debug!(method = %key.0, path = %key.1, "Registered route");
        self.routes.insert(key, Box::new(route));
    }

    /// Routes a request to its handler.
    ///
    /// Unknown routes receive a `not_found` error response.
    pub fn dispatch(&self, request: &Request) -> Response {
        let key = (request.method().clone(), request.uri().path().to_string());
        match self.routes.get(&key) {
            Some(route) => route(request),
            None => {
                let err = Error::not_found(format!("no route for {} {}", key.0, key.1));
                tracing::debug!(error = %err, "Unmatched request");
                response::write_error(&err)
            }
        }
    }

    /// Returns `true` if a route is registered for `method` + `path`.
    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes.contains_key(&(method.clone(), path.to_string()))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<_> = self
            .routes
            .keys()
            .map(|(method, path)| format!("{} {}", method, path))
            .collect();
        routes.sort();
        f.debug_struct("Router").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use http::StatusCode;
    use std::sync::Arc;

    fn request(method: Method, path: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    #[test]
    fn dispatches_by_method_and_path() {
        let mut router = Router::new();
        router.handle(Method::GET, "/scenes", |_| response::write_json(&"list"));
        router.handle(Method::POST, "/scenes", |_| response::write_json(&"create"));

        let get = router.dispatch(&request(Method::GET, "/scenes"));
        let post = router.dispatch(&request(Method::POST, "/scenes"));

        assert_eq!(get.body().as_ref(), br#""list""#);
        assert_eq!(post.body().as_ref(), br#""create""#);
    }

    #[test]
    fn unknown_route_is_not_found() {
        let router = Router::new();
        let response = router.dispatch(&request(Method::GET, "/missing"));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
        assert!(body.message.contains("/missing"));
    }

    #[test]
    fn query_string_does_not_affect_matching() {
        let mut router = Router::new();
        router.handle(Method::GET, "/scenes", |_| response::write_json(&1));

        let response = router.dispatch(&request(Method::GET, "/scenes?owner=1"));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_route_panics() {
        let mut router = Router::new();
        router.handle(Method::GET, "/scenes", |_| response::write_json(&1));
        router.handle(Method::GET, "/scenes", |_| response::write_json(&2));
    }

    #[test]
    fn shared_table_serves_concurrent_requests() {
        let mut router = Router::new();
        router.handle(Method::GET, "/ping", |_| response::write_json(&"pong"));
        let router = Arc::new(router);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let router = Arc::clone(&router);
                std::thread::spawn(move || router.dispatch(&request(Method::GET, "/ping")).status())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), StatusCode::OK);
        }
    }

    #[test]
    fn len_and_contains() {
        let mut router = Router::new();
        assert!(router.is_empty());
        router.handle(Method::DELETE, "/scene", |_| response::write_json(&()));

        assert_eq!(router.len(), 1);
        assert!(router.contains(&Method::DELETE, "/scene"));
        assert!(!router.contains(&Method::GET, "/scene"));
    }
}

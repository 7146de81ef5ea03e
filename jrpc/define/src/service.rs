//! Service and method definitions.

use serde::{Deserialize, Serialize};

use crate::types::HttpMethod;

/// Router annotation attached to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterOptions {
    /// Base name every method path is appended to (e.g., `service.scene`).
    pub name: String,
}

/// Handler annotation attached to a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerOptions {
    /// HTTP method the route is bound to.
    pub method: HttpMethod,
    /// Route path (e.g., `/scene/set`).
    pub path: String,
}

/// An RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Declared name (e.g., `SetScene`).
    pub name: String,
    /// Input message reference.
    pub input: String,
    /// Output message reference.
    pub output: String,
    /// Route binding.
    pub handler: HandlerOptions,
}

impl Method {
    /// Creates a method bound to `method` + `path`.
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            handler: HandlerOptions {
                method,
                path: path.into(),
            },
        }
    }

    /// The externally visible URL: the router name followed by the path.
    pub fn url(&self, service: &Service) -> String {
        format!("{}{}", service.router.name, self.handler.path)
    }
}

/// A service: a named group of methods served by one router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Declared name; must end in `Service` (e.g., `SceneService`).
    pub name: String,
    /// Router annotation.
    pub router: RouterOptions,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Service {
    /// Creates a service whose router is named `router_name`.
    pub fn new(
        name: impl Into<String>,
        router_name: impl Into<String>,
        methods: Vec<Method>,
    ) -> Self {
        Self {
            name: name.into(),
            router: RouterOptions {
                name: router_name.into(),
            },
            methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_router_name_and_path() {
        let method = Method::new(
            "ListScenes",
            "ListScenesRequest",
            "ListScenesResponse",
            HttpMethod::Get,
            "/scenes",
        );
        let service = Service::new("SceneService", "service.scene", vec![method.clone()]);

        assert_eq!(method.url(&service), "service.scene/scenes");
    }

    #[test]
    fn handler_options_deserialize() {
        let json = r#"{"method": "DELETE", "path": "/scene"}"#;
        let options: HandlerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.method, HttpMethod::Delete);
        assert_eq!(options.path, "/scene");
    }
}

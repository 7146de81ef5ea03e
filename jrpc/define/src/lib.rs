//! jrpc Schema Model
//!
//! This crate provides the in-memory representation of an interface
//! definition as handed to the `jrpc-gen` code generator. A parser (not part
//! of this workspace) produces one [`CompilationUnit`] per source file; the
//! generator consumes it read-only and emits Rust code for it.
//!
//! ## Core Types
//!
//! - [`CompilationUnit`] - Everything generated together into one module
//! - [`Import`] - Another unit whose messages may be referenced by alias
//! - [`Message`] - A data structure, optionally published as an event
//! - [`Field`] / [`FieldType`] / [`FieldOptions`] - Message members and their constraints
//! - [`Service`] / [`Method`] - RPC endpoints grouped under one router
//! - [`HttpMethod`] - HTTP verbs a method can be bound to
//!
//! Protocol-level annotations are typed fields rather than a registry of
//! extension options: [`RouterOptions`] on services, [`HandlerOptions`] on
//! methods and [`EventOptions`] on messages.
//!
//! ## Examples
//!
//! ```
//! use jrpc_define::{
//!     CompilationUnit, Field, FieldType, HttpMethod, Message, Method, ScalarKind, Service,
//! };
//!
//! let unit = CompilationUnit::new("scenedef")
//!     .message(Message::new(
//!         "SetSceneRequest",
//!         vec![Field::new("scene_id", FieldType::Scalar(ScalarKind::Uint32)).required()],
//!     ))
//!     .message(Message::new("SetSceneResponse", vec![]))
//!     .service(Service::new(
//!         "SceneService",
//!         "service.scene",
//!         vec![Method::new(
//!             "SetScene",
//!             "SetSceneRequest",
//!             "SetSceneResponse",
//!             HttpMethod::Post,
//!             "/scene/set",
//!         )],
//!     ));
//!
//! assert_eq!(unit.messages.len(), 2);
//! assert_eq!(unit.services[0].methods[0].url(&unit.services[0]), "service.scene/scene/set");
//! ```

pub mod load;
pub mod message;
pub mod service;
pub mod types;

pub use load::LoadError;
pub use message::{Bound, EventOptions, Field, FieldOptions, FieldType, Message, ScalarKind};
pub use service::{HandlerOptions, Method, RouterOptions, Service};
pub use types::{CompilationUnit, HttpMethod, Import};

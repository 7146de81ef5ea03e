//! jrpc code generator library.
//!
//! This crate turns a schema [`CompilationUnit`](jrpc_define::CompilationUnit)
//! into one Rust module of typed bindings for the `jrpc` runtime:
//!
//! - A struct per message, with serde attributes, getters and chaining setters
//! - A `Validate` impl per message enforcing required fields and numeric bounds
//! - A router type per service that decodes, validates and dispatches requests
//! - A client stub per method performing exactly one round trip
//! - Publish methods and subscriber wrappers for event messages
//!
//! ## Pipeline
//!
//! 1. [`plan::build`] resolves every type ([`resolver`]), compiles every
//!    field's checks ([`rules`]) and derives every name ([`naming`]). All
//!    schema problems surface here as a [`GeneratorError`](errors::GeneratorError).
//! 2. [`codegen`] turns the plan into token streams.
//! 3. [`output`] assembles, validates, formats and writes the module.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use jrpc_define::CompilationUnit;
//! use jrpc_gen::config::GeneratorOptions;
//! use jrpc_gen::output::generate_and_write;
//!
//! let unit = CompilationUnit::from_path(Path::new("schema/scene.json")).unwrap();
//! let code = generate_and_write(
//!     &unit,
//!     Path::new("src/def.rs"),
//!     &GeneratorOptions::default(),
//!     true,
//! )
//! .unwrap();
//! println!("{}", code);
//! ```
//!
//! ## Generated Code Structure
//!
//! For a `SceneService` with `SetScene` bound to `POST /scene/set`:
//!
//! ```text
//! pub struct SetSceneRequest { pub scene_id: Option<u32> }
//! impl SetSceneRequest { pub fn scene_id(&self) -> u32; pub fn set_scene_id(..) }
//! impl rt::Validate for SetSceneRequest { ... }
//!
//! pub struct SceneRouter { set_scene: Option<rt::Handler<SetSceneRequest, SetSceneResponse>> }
//! impl SceneRouter { pub fn set_scene(self, handler) -> Self; pub fn into_router(self) -> rt::Router }
//!
//! impl SetSceneRequest {
//!     pub async fn set_scene(&self, client: &rt::rpc::Client) -> Result<SetSceneResponse, rt::Error>;
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod errors;
pub mod naming;
pub mod output;
pub mod plan;
pub mod resolver;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_utils;

//! Scene service.
//!
//! Serves `SceneService` over the bindings generated into [`def`] from
//! `schema/scene.json`. Regenerate them with:
//!
//! ```text
//! jrpc-gen --unit schema/scene.json --output src/def.rs
//! ```

pub mod def;
pub mod handler;
pub mod store;

pub use handler::SceneHandler;
pub use store::{MemorySceneStore, SceneStore, StoreError};

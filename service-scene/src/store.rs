//! Scene storage.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use jrpc::Validate;
use thiserror::Error;

use crate::def::Scene;

/// Errors raised when scenes are added to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scene {0} already exists")]
    Duplicate(u32),

    #[error("invalid scene: {0}")]
    Invalid(#[source] jrpc::Error),
}

/// Read access to the configured scenes.
pub trait SceneStore: Send + Sync {
    /// Returns the scene with `id`, if any.
    fn get(&self, id: u32) -> Option<Scene>;

    /// Returns every scene ordered by id.
    fn list(&self) -> Vec<Scene>;
}

/// Scene store held in memory.
#[derive(Debug, Default)]
pub struct MemorySceneStore {
    scenes: RwLock<BTreeMap<u32, Scene>>,
}

impl MemorySceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `scene` after validating it.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Invalid`] when the scene fails validation (for
    /// example a missing `id`) and [`StoreError::Duplicate`] when a scene
    /// with the same id is already stored.
    pub fn insert(&self, scene: Scene) -> Result<(), StoreError> {
        scene.validate().map_err(StoreError::Invalid)?;

        let id = scene.id();
        let mut scenes = self.scenes.write().unwrap_or_else(PoisonError::into_inner);
        if scenes.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        scenes.insert(id, scene);
        tracing::debug!(scene_id = id, "Stored scene");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.scenes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SceneStore for MemorySceneStore {
    fn get(&self, id: u32) -> Option<Scene> {
        self.scenes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn list(&self) -> Vec<Scene> {
        self.scenes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

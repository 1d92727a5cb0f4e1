// Handle to the live scene of a drawing surface
use crate::domain::scene::SceneUpdate;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("drawing surface closed")]
pub struct SurfaceClosed;

#[async_trait]
pub trait DrawingSurface: Send + Sync {
    /// Replace the live scene with `scene`. Fails once nobody is listening.
    async fn update_scene(&self, scene: SceneUpdate) -> Result<(), SurfaceClosed>;

    /// Resolves once the surface stops listening.
    async fn closed(&self);
}

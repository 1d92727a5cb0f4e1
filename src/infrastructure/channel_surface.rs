// Drawing surface that forwards scenes to a connected client
use crate::application::drawing_surface::{DrawingSurface, SurfaceClosed};
use crate::domain::scene::SceneUpdate;
use async_trait::async_trait;
use tokio::sync::mpsc;

const SCENE_BUFFER: usize = 16;

pub struct ChannelSurface {
    tx: mpsc::Sender<SceneUpdate>,
}

impl ChannelSurface {
    /// A surface handle plus the receiving end the client reads from.
    pub fn channel() -> (Self, mpsc::Receiver<SceneUpdate>) {
        let (tx, rx) = mpsc::channel(SCENE_BUFFER);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DrawingSurface for ChannelSurface {
    async fn update_scene(&self, scene: SceneUpdate) -> Result<(), SurfaceClosed> {
        self.tx.send(scene).await.map_err(|_| SurfaceClosed)
    }

    async fn closed(&self) {
        self.tx.closed().await
    }
}

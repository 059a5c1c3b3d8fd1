use std::time::Duration;

use anyhow::Result;

use crate::core::{App, AppControl, FrameCtx};
use crate::device::GpuInit;
use crate::error::RenderError;
use crate::render::{RenderCtx, SceneRenderer};
use crate::scene::{FrameLoop, Scene, SceneConfig};
use crate::window::{Runtime, RuntimeConfig};

/// [`App`] that renders one [`Scene`] forever.
///
/// GPU resources are built when the surface becomes ready; the frame loop
/// starts on the first frame callback, so rotation begins at angle 0.
pub struct SceneApp {
    frame_loop: FrameLoop,
    renderer: Option<SceneRenderer>,
    started_at: Option<Duration>,
}

impl SceneApp {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            frame_loop: FrameLoop::new(Scene::new(config)),
            renderer: None,
            started_at: None,
        }
    }

    #[inline]
    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    /// Time since the loop started, given the runtime clock's elapsed time.
    fn loop_elapsed(&mut self, now: Duration) -> Duration {
        let start = *self.started_at.get_or_insert(now);
        now.saturating_sub(start)
    }
}

impl App for SceneApp {
    fn on_surface_ready(&mut self, ctx: &RenderCtx<'_>) -> Result<(), RenderError> {
        self.renderer = Some(SceneRenderer::new(ctx, self.frame_loop.scene())?);
        Ok(())
    }

    fn on_resized(&mut self, ctx: &RenderCtx<'_>) {
        if let Some(renderer) = &self.renderer {
            renderer.upload_camera(ctx, self.frame_loop.scene());
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.renderer.is_none() {
            return AppControl::Continue;
        }

        self.frame_loop.start();
        let elapsed = self.loop_elapsed(ctx.time.elapsed);
        let Some(output) = self.frame_loop.step(elapsed) else {
            return AppControl::Continue;
        };

        let Some(renderer) = &self.renderer else {
            return AppControl::Continue;
        };
        ctx.render(|rctx, target| renderer.draw(rctx, target, &output))
    }
}

/// Opens the surface described by `runtime` and renders `scene` until the
/// window closes.
pub fn run(runtime: RuntimeConfig, scene: SceneConfig) -> Result<()> {
    Runtime::run(runtime, GpuInit::default(), SceneApp::new(scene))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VertexLayout;
    use crate::scene::LoopState;

    #[test]
    fn loop_stays_idle_until_the_first_frame() {
        let app = SceneApp::new(SceneConfig::twin_cubes(VertexLayout::Interleaved));
        assert_eq!(app.frame_loop().state(), LoopState::Idle);
    }

    #[test]
    fn loop_time_starts_at_the_first_frame() {
        let mut app = SceneApp::new(SceneConfig::triangle());
        assert_eq!(app.loop_elapsed(Duration::from_millis(300)), Duration::ZERO);
        assert_eq!(app.loop_elapsed(Duration::from_millis(800)), Duration::from_millis(500));
    }
}

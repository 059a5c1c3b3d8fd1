use winit::event::WindowEvent;

use crate::error::RenderError;
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once, after the surface and GPU context exist and before the
    /// first frame. An error stops the runtime and is returned from `run`.
    fn on_surface_ready(&mut self, ctx: &RenderCtx<'_>) -> Result<(), RenderError> {
        let _ = ctx;
        Ok(())
    }

    /// Called after the surface was reconfigured to a new non-zero size.
    fn on_resized(&mut self, ctx: &RenderCtx<'_>) {
        let _ = ctx;
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame callback.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

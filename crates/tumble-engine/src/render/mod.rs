//! GPU rendering subsystem.
//!
//! [`RenderCtx`] is the graphics context handed to renderers: it links
//! shader programs into pipelines, creates buffers and uploads uniforms.
//! [`SceneRenderer`] owns the resources for one scene and replays its
//! per-frame output.
//!
//! Convention:
//! - Matrices are column-major and uploaded as-is.
//! - Per-draw uniforms live in dynamic-offset slots; draw `i` uses slot `i`.

mod ctx;
mod program;
mod scene_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use program::GpuProgram;
pub use scene_renderer::SceneRenderer;

//! Tumble engine crate.
//!
//! Renders a small static scene (a flat colored square or one or two spinning
//! colored cubes) through wgpu in a winit window. Geometry, shader
//! front end, transforms and the per-frame step are GPU-free; `device`,
//! `render` and `window` own the platform and GPU side.

pub mod color;
pub mod core;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod transform;
pub mod window;

mod scene_app;

pub use scene_app::{run, SceneApp};

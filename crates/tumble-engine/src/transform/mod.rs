//! Transform setup: camera (view + projection) and per-object world matrices.
//!
//! Matrices are column-major `nalgebra::Matrix4<f32>`. Projection follows the
//! GL clip convention (`z` in `[-1, 1]`); [`clip_correction`] remaps it to the
//! `[0, 1]` depth range wgpu expects at upload time.

mod camera;

pub use camera::{aspect_ratio, clip_correction, world, Camera};

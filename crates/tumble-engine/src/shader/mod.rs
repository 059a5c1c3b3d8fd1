//! Shader sources and the compile/link front end.
//!
//! Stages are WGSL text embedded in the binary. `compile` parses and validates
//! one stage; `link` checks that a vertex and a fragment stage agree on their
//! interface and produces a [`Program`] exposing attribute and uniform
//! locations. GPU objects are created from a linked program only.

mod compile;
mod program;

pub use compile::{compile, CompiledShader, ShaderStage, Varying};
pub use program::{link, Program, UniformInfo};

/// Vertex stage for 3D shapes: position (vec3) + color, three matrix uniforms.
pub const SCENE_VERTEX: &str = include_str!("shaders/scene.vert.wgsl");

/// Vertex stage for flat shapes: position (vec2) + color, world matrix only.
pub const FLAT_VERTEX: &str = include_str!("shaders/flat.vert.wgsl");

/// Fragment stage writing the interpolated vertex color.
pub const COLOR_FRAGMENT: &str = include_str!("shaders/color.frag.wgsl");

pub const WORLD_UNIFORM: &str = "u_world";
pub const VIEW_UNIFORM: &str = "u_view";
pub const PROJECTION_UNIFORM: &str = "u_projection";

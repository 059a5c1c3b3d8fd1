//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window backing the named drawing
//! surface, and wires them to the GPU layer.

mod alert;
mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};

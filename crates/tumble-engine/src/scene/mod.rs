//! Scene description and the per-frame step.
//!
//! Everything here is GPU-free: a [`Scene`] turns elapsed time into a
//! [`FrameOutput`] (clear values + draw calls), and [`FrameLoop`] tracks the
//! idle/running state around it. The GPU side replays the output in
//! `render::SceneRenderer`.

mod config;
mod frame;
mod frame_loop;
mod scene;

pub use config::{Instance, SceneConfig, Shape};
pub use frame::{ClearValues, DrawCall, DrawKind, FrameOutput};
pub use frame_loop::{FrameLoop, LoopState};
pub use scene::{Scene, CLEAR_DEPTH};

use nalgebra::Matrix4;

use crate::color::Color;
use crate::geometry::Primitive;

/// How a draw call consumes the vertex data.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawKind {
    /// Uses the scene's index buffer.
    Indexed { index_count: u32 },
    /// Reads vertices in order.
    Arrays { vertex_count: u32 },
}

/// One draw of the scene mesh with its own world transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub world: Matrix4<f32>,
    pub kind: DrawKind,
    pub primitive: Primitive,
}

/// Values the color and depth targets are cleared to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearValues {
    pub color: Color,
    pub depth: f32,
}

/// Everything the GPU side needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub clear: ClearValues,
    /// In issue order; draw `i` uses per-draw uniform slot `i`.
    pub draws: Vec<DrawCall>,
}

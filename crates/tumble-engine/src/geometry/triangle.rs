use super::mesh::{Mesh, Primitive};

const POSITIONS: [f32; 12] = [
    -0.5, -0.5, //
    0.5, -0.5, //
    0.5, 0.5, //
    -0.5, -0.5, //
    0.5, 0.5, //
    -0.5, 0.5, //
];

const COLORS: [f32; 18] = [
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0, //
    1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, //
    0.0, 1.0, 0.0, //
];

/// Two flat triangles forming a square split along its diagonal.
///
/// Positions are already in clip space (2 components). Non-indexed.
pub fn triangle() -> Mesh {
    Mesh {
        position_components: 2,
        positions: POSITIONS.to_vec(),
        colors: COLORS.to_vec(),
        indices: None,
        primitive: Primitive::Triangles,
    }
}

/// Number of color components per vertex (RGB, each in `[0, 1]`).
pub const COLOR_COMPONENTS: u32 = 3;

/// Primitive assembly mode for a mesh.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Primitive {
    #[default]
    Triangles,
}

/// CPU-side vertex data for one shape.
///
/// Invariants:
/// - `positions.len() == vertex_count * position_components`
/// - `colors.len() == vertex_count * COLOR_COMPONENTS`
/// - every index (if any) is `< vertex_count`, grouped in triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// 2 for flat shapes, 3 for solids.
    pub position_components: u32,
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Option<Vec<u16>>,
    pub primitive: Primitive,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        (self.positions.len() / self.position_components as usize) as u32
    }

    /// Number of indices, or `None` for non-indexed meshes.
    #[inline]
    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|i| i.len() as u32)
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> &[f32] {
        let n = self.position_components as usize;
        &self.positions[i * n..(i + 1) * n]
    }

    /// Color of vertex `i`.
    pub fn color(&self, i: usize) -> &[f32] {
        let n = COLOR_COMPONENTS as usize;
        &self.colors[i * n..(i + 1) * n]
    }

    /// Iterates triangles as vertex-index triples.
    ///
    /// Non-indexed meshes yield consecutive triples.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.vertex_count() as usize / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }
}

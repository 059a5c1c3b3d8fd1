use super::mesh::{Mesh, COLOR_COMPONENTS};

/// Vertex-stage input name for positions.
pub const POSITION_ATTRIBUTE: &str = "position";
/// Vertex-stage input name for colors.
pub const COLOR_ATTRIBUTE: &str = "color";

/// Numeric type of a single attribute component.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComponentType {
    Float32,
    Uint8,
    Uint16,
}

impl ComponentType {
    /// Size of one component in bytes.
    #[inline]
    pub const fn size(self) -> u64 {
        match self {
            ComponentType::Float32 => 4,
            ComponentType::Uint8 => 1,
            ComponentType::Uint16 => 2,
        }
    }
}

/// Describes how one named vertex attribute is read out of a buffer.
///
/// The stride lives on the owning [`BufferLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBinding {
    pub name: &'static str,
    pub components: u32,
    pub component_type: ComponentType,
    pub normalized: bool,
    /// Byte offset of the attribute within one vertex.
    pub offset: u64,
}

impl AttributeBinding {
    #[inline]
    pub fn float(name: &'static str, components: u32, offset: u64) -> Self {
        Self {
            name,
            components,
            component_type: ComponentType::Float32,
            normalized: false,
            offset,
        }
    }

    /// Size of the attribute in bytes.
    #[inline]
    pub fn byte_size(&self) -> u64 {
        self.components as u64 * self.component_type.size()
    }
}

/// One vertex buffer: stride plus the attributes it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferLayout {
    pub stride: u64,
    pub attributes: Vec<AttributeBinding>,
}

/// Strategy for packing a [`Mesh`] into vertex buffers.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum VertexLayout {
    /// One buffer, position and color contiguous per vertex.
    #[default]
    Interleaved,
    /// Two buffers: positions only, colors only.
    Separate,
}

impl VertexLayout {
    /// Buffer layouts matching [`pack`](Self::pack) for `mesh`.
    pub fn buffer_layouts(self, mesh: &Mesh) -> Vec<BufferLayout> {
        let float = ComponentType::Float32.size();
        let pos = AttributeBinding::float(POSITION_ATTRIBUTE, mesh.position_components, 0);

        match self {
            VertexLayout::Interleaved => {
                let col = AttributeBinding::float(COLOR_ATTRIBUTE, COLOR_COMPONENTS, pos.byte_size());
                let stride = (mesh.position_components + COLOR_COMPONENTS) as u64 * float;
                vec![BufferLayout { stride, attributes: vec![pos, col] }]
            }
            VertexLayout::Separate => {
                let col = AttributeBinding::float(COLOR_ATTRIBUTE, COLOR_COMPONENTS, 0);
                vec![
                    BufferLayout { stride: pos.byte_size(), attributes: vec![pos] },
                    BufferLayout { stride: col.byte_size(), attributes: vec![col] },
                ]
            }
        }
    }

    /// Packs `mesh` into buffer contents, one `Vec` per buffer layout.
    pub fn pack(self, mesh: &Mesh) -> Vec<Vec<f32>> {
        match self {
            VertexLayout::Interleaved => {
                let n = mesh.vertex_count() as usize;
                let per_vertex = (mesh.position_components + COLOR_COMPONENTS) as usize;
                let mut data = Vec::with_capacity(n * per_vertex);
                for i in 0..n {
                    data.extend_from_slice(mesh.position(i));
                    data.extend_from_slice(mesh.color(i));
                }
                vec![data]
            }
            VertexLayout::Separate => vec![mesh.positions.clone(), mesh.colors.clone()],
        }
    }
}

//! Geometry provider.
//!
//! Meshes are plain CPU data: flat `f32` position/color sequences plus an
//! optional `u16` index list. How the data is packed into GPU buffers is
//! decided by a [`VertexLayout`], which also produces the matching attribute
//! bindings so stride/offset can never drift from the packing.

mod cube;
mod layout;
mod mesh;
mod triangle;

pub use cube::{cube, FACE_PALETTE};
pub use layout::{AttributeBinding, BufferLayout, ComponentType, VertexLayout, COLOR_ATTRIBUTE, POSITION_ATTRIBUTE};
pub use mesh::{Mesh, Primitive, COLOR_COMPONENTS};
pub use triangle::triangle;

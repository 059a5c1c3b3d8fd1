use std::num::NonZeroU64;

use nalgebra::Matrix4;

use crate::error::LinkError;
use crate::geometry::{AttributeBinding, BufferLayout, ComponentType};
use crate::shader::{CompiledShader, Program};

use super::ctx::RenderCtx;

/// Size of one `mat4x4<f32>` in bytes.
const MAT4_SIZE: u64 = 64;

/// One uniform buffer holding `slots` matrices at `stride` byte intervals.
struct UniformSlots {
    name: String,
    buffer: wgpu::Buffer,
    slots: u32,
}

/// A linked program with its pipeline and uniform storage.
///
/// Every uniform is bound with a dynamic offset; a draw selects its slot
/// through [`dynamic_offsets`](Self::dynamic_offsets). Uniforms with a single
/// slot always resolve to offset 0.
pub struct GpuProgram {
    program: Program,
    pipeline: wgpu::RenderPipeline,
    bind_group: Option<wgpu::BindGroup>,
    uniforms: Vec<UniformSlots>,
    stride: u64,
}

impl GpuProgram {
    pub(crate) fn new(
        ctx: &RenderCtx<'_>,
        program: Program,
        buffers: &[BufferLayout],
        per_draw: &[&str],
        draw_slots: u32,
    ) -> Result<Self, LinkError> {
        let attributes = vertex_attributes(&program, buffers)?;
        for u in program.uniforms() {
            if u.group != 0 || !u.is_mat4 {
                return Err(LinkError::UnsupportedUniform(u.name.clone()));
            }
        }

        let stride = slot_stride(ctx.device.limits().min_uniform_buffer_offset_alignment);
        let draw_slots = draw_slots.max(1);

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = program
            .uniforms()
            .iter()
            .map(|u| {
                let mut visibility = wgpu::ShaderStages::NONE;
                if u.in_vertex {
                    visibility |= wgpu::ShaderStages::VERTEX;
                }
                if u.in_fragment {
                    visibility |= wgpu::ShaderStages::FRAGMENT;
                }
                wgpu::BindGroupLayoutEntry {
                    binding: u.binding,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(MAT4_SIZE),
                    },
                    count: None,
                }
            })
            .collect();

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tumble uniforms bgl"),
                entries: &layout_entries,
            });

        let uniforms: Vec<UniformSlots> = program
            .uniforms()
            .iter()
            .map(|u| {
                let slots = if per_draw.contains(&u.name.as_str()) { draw_slots } else { 1 };
                let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("tumble uniform {}", u.name)),
                    size: stride * u64::from(slots),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                UniformSlots {
                    name: u.name.clone(),
                    buffer,
                    slots,
                }
            })
            .collect();

        let bind_group = if uniforms.is_empty() {
            None
        } else {
            let entries: Vec<wgpu::BindGroupEntry> = program
                .uniforms()
                .iter()
                .zip(&uniforms)
                .map(|(info, u)| wgpu::BindGroupEntry {
                    binding: info.binding,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &u.buffer,
                        offset: 0,
                        size: NonZeroU64::new(MAT4_SIZE),
                    }),
                })
                .collect();
            Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tumble uniforms bind group"),
                layout: &bind_group_layout,
                entries: &entries,
            }))
        };

        let bind_group_layouts: &[&wgpu::BindGroupLayout] =
            if uniforms.is_empty() { &[] } else { &[&bind_group_layout] };
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tumble pipeline layout"),
                bind_group_layouts,
                immediate_size: 0,
            });

        let vs_module = create_module(ctx, program.vertex());
        let fs_module = create_module(ctx, program.fragment());

        let vertex_buffers: Vec<wgpu::VertexBufferLayout<'_>> = buffers
            .iter()
            .zip(&attributes)
            .map(|(b, attrs)| wgpu::VertexBufferLayout {
                array_stride: b.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tumble pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(program.vertex().entry_point()),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(program.fragment().entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: ctx.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "pipeline built: {} vertex buffers, {} uniforms, slot stride {stride}",
            buffers.len(),
            uniforms.len()
        );

        Ok(Self {
            program,
            pipeline,
            bind_group,
            uniforms,
            stride,
        })
    }

    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Number of slots reserved for the named uniform.
    pub fn slots(&self, name: &str) -> Option<u32> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| u.slots)
    }

    /// Dynamic offsets (binding order) selecting `draw` for per-draw uniforms.
    pub fn dynamic_offsets(&self, draw: u32) -> Vec<u32> {
        self.uniforms
            .iter()
            .map(|u| slot_offset(self.stride, draw, u.slots))
            .collect()
    }

    pub(crate) fn write_matrix(
        &self,
        queue: &wgpu::Queue,
        name: &str,
        slot: u32,
        value: &Matrix4<f32>,
    ) -> bool {
        let Some(u) = self.uniforms.iter().find(|u| u.name == name) else {
            log::warn!("program has no uniform `{name}`; upload ignored");
            return false;
        };
        if slot >= u.slots {
            log::warn!("uniform `{name}` has {} slots; slot {slot} ignored", u.slots);
            return false;
        }
        queue.write_buffer(
            &u.buffer,
            self.stride * u64::from(slot),
            bytemuck::cast_slice(value.as_slice()),
        );
        true
    }
}

fn create_module(ctx: &RenderCtx<'_>, shader: &CompiledShader) -> wgpu::ShaderModule {
    ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("tumble {} shader", shader.stage())),
        source: wgpu::ShaderSource::Wgsl(shader.source().into()),
    })
}

/// Rounds one matrix up to the device's uniform offset alignment.
fn slot_stride(alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    MAT4_SIZE.div_ceil(alignment) * alignment
}

/// Byte offset of `draw`'s slot; single-slot uniforms are shared by every draw.
fn slot_offset(stride: u64, draw: u32, slots: u32) -> u32 {
    if slots <= 1 {
        return 0;
    }
    (stride * u64::from(draw.min(slots - 1))) as u32
}

/// Maps an attribute binding onto a wgpu vertex format.
///
/// `normalized` has no effect on float attributes.
pub(crate) fn vertex_format(binding: &AttributeBinding) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let format = match (binding.component_type, binding.components, binding.normalized) {
        (ComponentType::Float32, 1, _) => F::Float32,
        (ComponentType::Float32, 2, _) => F::Float32x2,
        (ComponentType::Float32, 3, _) => F::Float32x3,
        (ComponentType::Float32, 4, _) => F::Float32x4,
        (ComponentType::Uint8, 2, false) => F::Uint8x2,
        (ComponentType::Uint8, 4, false) => F::Uint8x4,
        (ComponentType::Uint8, 2, true) => F::Unorm8x2,
        (ComponentType::Uint8, 4, true) => F::Unorm8x4,
        (ComponentType::Uint16, 2, false) => F::Uint16x2,
        (ComponentType::Uint16, 4, false) => F::Uint16x4,
        (ComponentType::Uint16, 2, true) => F::Unorm16x2,
        (ComponentType::Uint16, 4, true) => F::Unorm16x4,
        _ => return None,
    };
    Some(format)
}

/// Resolves every attribute binding against the program's attribute locations.
pub(crate) fn vertex_attributes(
    program: &Program,
    buffers: &[BufferLayout],
) -> Result<Vec<Vec<wgpu::VertexAttribute>>, LinkError> {
    buffers
        .iter()
        .map(|buffer| {
            buffer
                .attributes
                .iter()
                .map(|binding| {
                    let shader_location = program
                        .attribute_location(binding.name)
                        .ok_or_else(|| LinkError::UnknownAttribute(binding.name.to_string()))?;
                    let format = vertex_format(binding).ok_or_else(|| {
                        LinkError::UnsupportedAttributeFormat {
                            name: binding.name.to_string(),
                            components: binding.components,
                        }
                    })?;
                    Ok(wgpu::VertexAttribute {
                        format,
                        offset: binding.offset,
                        shader_location,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, VertexLayout};
    use crate::shader::{self, ShaderStage, COLOR_FRAGMENT, FLAT_VERTEX, SCENE_VERTEX};

    fn linked(vertex: &str) -> Program {
        let vs = shader::compile(vertex, ShaderStage::Vertex).unwrap();
        let fs = shader::compile(COLOR_FRAGMENT, ShaderStage::Fragment).unwrap();
        shader::link(&vs, &fs).unwrap()
    }

    // ── vertex formats ────────────────────────────────────────────────────

    #[test]
    fn float_attributes_map_by_component_count() {
        let b = AttributeBinding::float("position", 3, 0);
        assert_eq!(vertex_format(&b), Some(wgpu::VertexFormat::Float32x3));

        let b = AttributeBinding::float("position", 2, 0);
        assert_eq!(vertex_format(&b), Some(wgpu::VertexFormat::Float32x2));
    }

    #[test]
    fn normalized_bytes_become_unorm() {
        let b = AttributeBinding {
            name: "color",
            components: 4,
            component_type: ComponentType::Uint8,
            normalized: true,
            offset: 0,
        };
        assert_eq!(vertex_format(&b), Some(wgpu::VertexFormat::Unorm8x4));
    }

    #[test]
    fn three_byte_attributes_have_no_format() {
        let b = AttributeBinding {
            name: "color",
            components: 3,
            component_type: ComponentType::Uint8,
            normalized: true,
            offset: 0,
        };
        assert_eq!(vertex_format(&b), None);
    }

    // ── attribute resolution ──────────────────────────────────────────────

    #[test]
    fn interleaved_cube_resolves_both_attributes() {
        let program = linked(SCENE_VERTEX);
        let layouts = VertexLayout::Interleaved.buffer_layouts(&geometry::cube(2.0));
        let attrs = vertex_attributes(&program, &layouts).unwrap();

        assert_eq!(attrs.len(), 1);
        let pos = attrs[0].iter().find(|a| a.offset == 0).unwrap();
        let col = attrs[0].iter().find(|a| a.offset == 12).unwrap();
        assert_eq!(pos.shader_location, program.attribute_location("position").unwrap());
        assert_eq!(col.shader_location, program.attribute_location("color").unwrap());
        assert_eq!(pos.format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn separate_triangle_uses_two_buffers() {
        let program = linked(FLAT_VERTEX);
        let layouts = VertexLayout::Separate.buffer_layouts(&geometry::triangle());
        let attrs = vertex_attributes(&program, &layouts).unwrap();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0][0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[1][0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn unknown_attribute_is_a_link_error() {
        let program = linked(SCENE_VERTEX);
        let layouts = vec![BufferLayout {
            stride: 12,
            attributes: vec![AttributeBinding::float("normal", 3, 0)],
        }];
        assert_eq!(
            vertex_attributes(&program, &layouts).unwrap_err(),
            LinkError::UnknownAttribute("normal".into())
        );
    }

    // ── uniform slots ─────────────────────────────────────────────────────

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(slot_stride(256), 256);
        assert_eq!(slot_stride(64), 64);
        assert_eq!(slot_stride(32), 64);
        assert_eq!(slot_stride(0), 64);
    }

    #[test]
    fn shared_uniforms_stay_at_offset_zero() {
        assert_eq!(slot_offset(256, 0, 2), 0);
        assert_eq!(slot_offset(256, 1, 2), 256);
        assert_eq!(slot_offset(256, 1, 1), 0);
        // out-of-range draws reuse the last slot
        assert_eq!(slot_offset(256, 5, 2), 256);
    }
}

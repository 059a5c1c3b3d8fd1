use nalgebra::Matrix4;
use wgpu::util::DeviceExt;

use crate::error::{LinkError, ShaderError};
use crate::geometry::BufferLayout;
use crate::shader::{self, CompiledShader, ShaderStage};
use crate::transform::aspect_ratio;

use super::program::GpuProgram;

/// Renderer-facing graphics context.
///
/// Wraps the device and queue of a configured surface and exposes the
/// resource operations the scene renderer needs: compiling and linking
/// programs, creating buffers, and uploading matrix uniforms.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    /// Drawable size in physical pixels.
    pub surface_size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        surface_size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            surface_size,
        }
    }

    /// Width over height of the drawable; 1 while the surface is zero-sized.
    #[inline]
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.surface_size.0, self.surface_size.1)
    }

    /// Parses and validates one shader stage.
    pub fn compile_shader(
        &self,
        source: &str,
        stage: ShaderStage,
    ) -> Result<CompiledShader, ShaderError> {
        shader::compile(source, stage)
    }

    /// Links two stages and builds the pipeline for the given vertex buffers.
    ///
    /// Uniforms named in `per_draw` get `draw_slots` slots each; every other
    /// uniform gets one.
    pub fn link_program(
        &self,
        vertex: &CompiledShader,
        fragment: &CompiledShader,
        buffers: &[BufferLayout],
        per_draw: &[&str],
        draw_slots: u32,
    ) -> Result<GpuProgram, LinkError> {
        let program = shader::link(vertex, fragment)?;
        GpuProgram::new(self, program, buffers, per_draw, draw_slots)
            .inspect_err(|e| log::error!("pipeline creation failed: {e}"))
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[f32]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        })
    }

    /// Index buffers are `u16`; wgpu needs the byte length padded to 4.
    pub fn create_index_buffer(&self, label: &str, indices: &[u16]) -> wgpu::Buffer {
        let mut padded = indices.to_vec();
        if padded.len() % 2 != 0 {
            padded.push(0);
        }
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::INDEX,
        })
    }

    /// Uploads a 4x4 matrix into `slot` of the named uniform.
    ///
    /// Returns `false` (and logs) if the program has no such uniform or the
    /// slot is out of range.
    pub fn set_uniform_matrix(
        &self,
        program: &GpuProgram,
        name: &str,
        slot: u32,
        value: &Matrix4<f32>,
    ) -> bool {
        program.write_matrix(self.queue, name, slot, value)
    }
}

/// Target for drawing (encoder + color view + optional depth view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}

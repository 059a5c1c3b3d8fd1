use crate::error::RenderError;
use crate::scene::{DrawKind, FrameOutput, Scene};
use crate::shader::{ShaderStage, PROJECTION_UNIFORM, VIEW_UNIFORM, WORLD_UNIFORM};

use super::ctx::{RenderCtx, RenderTarget};
use super::program::GpuProgram;

/// GPU resources for one [`Scene`]: program, vertex buffers, index buffer.
///
/// Built once when the surface is ready; replays each [`FrameOutput`] as a
/// single render pass.
pub struct SceneRenderer {
    program: GpuProgram,
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
}

impl SceneRenderer {
    /// Compiles and links the scene's shaders, uploads its geometry and the
    /// camera matrices.
    pub fn new(ctx: &RenderCtx<'_>, scene: &Scene) -> Result<Self, RenderError> {
        let vs = ctx.compile_shader(scene.vertex_source(), ShaderStage::Vertex)?;
        let fs = ctx.compile_shader(scene.fragment_source(), ShaderStage::Fragment)?;

        let program = ctx.link_program(
            &vs,
            &fs,
            scene.buffer_layouts(),
            &[WORLD_UNIFORM],
            scene.draws_per_frame(),
        )?;

        let vertex_buffers = scene
            .vertex_data()
            .iter()
            .enumerate()
            .map(|(i, data)| ctx.create_vertex_buffer(&format!("tumble vertex buffer {i}"), data))
            .collect();

        let index_buffer = scene
            .mesh()
            .indices
            .as_deref()
            .map(|indices| ctx.create_index_buffer("tumble index buffer", indices));

        let renderer = Self {
            program,
            vertex_buffers,
            index_buffer,
        };
        renderer.upload_camera(ctx, scene);

        log::info!("scene renderer ready ({} draws per frame)", scene.draws_per_frame());
        Ok(renderer)
    }

    #[inline]
    pub fn program(&self) -> &GpuProgram {
        &self.program
    }

    /// Uploads view and projection for the current surface aspect.
    ///
    /// Called at setup and again after every resize. Scenes without a
    /// camera upload nothing.
    pub fn upload_camera(&self, ctx: &RenderCtx<'_>, scene: &Scene) {
        if let Some(view) = scene.view() {
            ctx.set_uniform_matrix(&self.program, VIEW_UNIFORM, 0, &view);
        }
        if let Some(projection) = scene.projection(ctx.aspect()) {
            ctx.set_uniform_matrix(&self.program, PROJECTION_UNIFORM, 0, &projection);
        }
    }

    /// Records one frame: clear color and depth, then one draw per [`DrawCall`](crate::scene::DrawCall).
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &FrameOutput) {
        let slots = self.program.slots(WORLD_UNIFORM).unwrap_or(1) as usize;
        if frame.draws.len() > slots {
            log::warn!("frame has {} draws but only {slots} slots; extra draws skipped", frame.draws.len());
        }
        let draws = &frame.draws[..frame.draws.len().min(slots)];

        for (slot, draw) in draws.iter().enumerate() {
            ctx.set_uniform_matrix(&self.program, WORLD_UNIFORM, slot as u32, &draw.world);
        }

        let depth_stencil_attachment =
            target
                .depth_view
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear.depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tumble scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(frame.clear.color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());
        for (i, buffer) in self.vertex_buffers.iter().enumerate() {
            rpass.set_vertex_buffer(i as u32, buffer.slice(..));
        }
        if let Some(ibo) = &self.index_buffer {
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        }

        for (slot, draw) in draws.iter().enumerate() {
            if let Some(bind_group) = self.program.bind_group() {
                rpass.set_bind_group(0, bind_group, &self.program.dynamic_offsets(slot as u32));
            }
            match draw.kind {
                DrawKind::Indexed { index_count } => {
                    if self.index_buffer.is_none() {
                        log::warn!("indexed draw without an index buffer; skipped");
                        continue;
                    }
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
                DrawKind::Arrays { vertex_count } => rpass.draw(0..vertex_count, 0..1),
            }
        }
    }
}

use std::time::Duration;

use nalgebra::Matrix4;

use crate::geometry::{self, BufferLayout, Mesh};
use crate::shader::{COLOR_FRAGMENT, FLAT_VERTEX, SCENE_VERTEX};
use crate::transform::{self, clip_correction};

use super::config::{SceneConfig, Shape};
use super::frame::{ClearValues, DrawCall, DrawKind, FrameOutput};

/// Cleared depth value (far plane in wgpu's `[0, 1]` range).
pub const CLEAR_DEPTH: f32 = 1.0;

/// Immutable scene state built once at startup.
///
/// Holds the mesh, the packed vertex buffers and the attribute layouts derived
/// from the same [`VertexLayout`](crate::geometry::VertexLayout), and computes
/// per-frame output from elapsed time alone.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    mesh: Mesh,
    buffer_layouts: Vec<BufferLayout>,
    vertex_data: Vec<Vec<f32>>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let mesh = match config.shape {
            Shape::Cube { side } => {
                if !(side > 0.0 && side.is_finite()) {
                    log::warn!("cube side {side} is not a positive length; geometry will be degenerate");
                }
                geometry::cube(side)
            }
            Shape::Triangle => geometry::triangle(),
        };

        let buffer_layouts = config.layout.buffer_layouts(&mesh);
        let vertex_data = config.layout.pack(&mesh);

        log::debug!(
            "scene built: {:?}, {} vertices, {} buffers ({:?}), {} instances",
            config.shape,
            mesh.vertex_count(),
            vertex_data.len(),
            config.layout,
            config.instances.len()
        );

        Self {
            config,
            mesh,
            buffer_layouts,
            vertex_data,
        }
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Attribute layouts, one per vertex buffer.
    #[inline]
    pub fn buffer_layouts(&self) -> &[BufferLayout] {
        &self.buffer_layouts
    }

    /// Vertex buffer contents, parallel to [`buffer_layouts`](Self::buffer_layouts).
    #[inline]
    pub fn vertex_data(&self) -> &[Vec<f32>] {
        &self.vertex_data
    }

    /// Maximum number of draws per frame (sizes the per-draw uniform slots).
    #[inline]
    pub fn draws_per_frame(&self) -> u32 {
        self.config.instances.len().max(1) as u32
    }

    pub fn vertex_source(&self) -> &'static str {
        match self.config.shape {
            Shape::Cube { .. } => SCENE_VERTEX,
            Shape::Triangle => FLAT_VERTEX,
        }
    }

    pub fn fragment_source(&self) -> &'static str {
        COLOR_FRAGMENT
    }

    /// View matrix, if the scene has a camera.
    pub fn view(&self) -> Option<Matrix4<f32>> {
        self.config.camera.map(|c| c.view())
    }

    /// Projection ready for upload (depth remapped to `[0, 1]`), if the scene has a camera.
    pub fn projection(&self, aspect: f32) -> Option<Matrix4<f32>> {
        self.config
            .camera
            .map(|c| clip_correction() * c.projection(aspect))
    }

    /// Base rotation angle in radians after `elapsed` time.
    #[inline]
    pub fn angle_at(&self, elapsed: Duration) -> f32 {
        self.config.angular_speed * elapsed.as_secs_f32()
    }

    /// Computes one frame: clear values plus one draw per instance.
    pub fn render_frame(&self, elapsed: Duration) -> FrameOutput {
        let angle = self.angle_at(elapsed);

        let kind = match self.mesh.index_count() {
            Some(index_count) => DrawKind::Indexed { index_count },
            None => DrawKind::Arrays { vertex_count: self.mesh.vertex_count() },
        };

        let draws = self
            .config
            .instances
            .iter()
            .map(|inst| DrawCall {
                world: transform::world(angle * inst.spin, inst.axis, inst.translation),
                kind,
                primitive: self.mesh.primitive,
            })
            .collect();

        FrameOutput {
            clear: ClearValues {
                color: self.config.background,
                depth: CLEAR_DEPTH,
            },
            draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::{Primitive, VertexLayout};
    use nalgebra::Vector3;

    // ── frame output ──────────────────────────────────────────────────────

    #[test]
    fn twin_cubes_issue_two_indexed_triangle_draws() {
        let scene = Scene::new(SceneConfig::twin_cubes(VertexLayout::Interleaved).with_side(2.0));
        let frame = scene.render_frame(Duration::ZERO);

        assert_eq!(frame.draws.len(), 2);
        for draw in &frame.draws {
            assert_eq!(draw.kind, DrawKind::Indexed { index_count: 36 });
            assert_eq!(draw.primitive, Primitive::Triangles);
        }
    }

    #[test]
    fn single_cube_issues_one_draw() {
        let scene = Scene::new(SceneConfig::single_cube(VertexLayout::Separate));
        let frame = scene.render_frame(Duration::ZERO);
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].kind, DrawKind::Indexed { index_count: 36 });
    }

    #[test]
    fn triangle_draws_six_vertices_without_indices() {
        let scene = Scene::new(SceneConfig::triangle());
        let frame = scene.render_frame(Duration::from_secs(5));
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].kind, DrawKind::Arrays { vertex_count: 6 });
        assert_eq!(frame.draws[0].world, Matrix4::identity());
    }

    #[test]
    fn clear_uses_background_and_far_depth() {
        let bg = Color::rgb(0.2, 0.3, 0.4);
        let scene = Scene::new(SceneConfig::single_cube(VertexLayout::Interleaved).with_background(bg));
        let frame = scene.render_frame(Duration::ZERO);
        assert_eq!(frame.clear.color, bg);
        assert_eq!(frame.clear.depth, 1.0);
    }

    // ── world transforms ──────────────────────────────────────────────────

    #[test]
    fn world_at_time_zero_is_the_instance_translation() {
        let config = SceneConfig::twin_cubes(VertexLayout::Interleaved);
        let scene = Scene::new(config.clone());
        let frame = scene.render_frame(Duration::ZERO);

        for (draw, inst) in frame.draws.iter().zip(&config.instances) {
            let expected = Matrix4::new_translation(&inst.translation);
            assert!((draw.world - expected).amax() < 1e-6);
        }
    }

    #[test]
    fn instances_get_distinct_world_matrices() {
        let scene = Scene::new(SceneConfig::split_twin_cubes());
        let frame = scene.render_frame(Duration::from_millis(1500));
        assert_ne!(frame.draws[0].world, frame.draws[1].world);
    }

    #[test]
    fn angle_is_linear_in_time() {
        let scene = Scene::new(SceneConfig::single_cube(VertexLayout::Interleaved));
        let one = scene.angle_at(Duration::from_secs(1));
        let three = scene.angle_at(Duration::from_secs(3));
        assert!((three - 3.0 * one).abs() < 1e-5);
        assert_eq!(scene.angle_at(Duration::ZERO), 0.0);
    }

    #[test]
    fn one_turn_takes_about_twenty_one_seconds() {
        let scene = Scene::new(SceneConfig::twin_cubes(VertexLayout::Interleaved));
        let angle = scene.angle_at(Duration::from_secs(21));
        assert!((angle - std::f32::consts::TAU).abs() < 1e-4);

        let split = Scene::new(SceneConfig::split_twin_cubes());
        assert!((split.angle_at(Duration::from_secs(24)) - std::f32::consts::TAU).abs() < 1e-4);
    }

    #[test]
    fn rotation_keeps_the_instance_centered() {
        let scene = Scene::new(SceneConfig::twin_cubes(VertexLayout::Interleaved));
        let frame = scene.render_frame(Duration::from_secs(7));
        let origin = frame.draws[0].world.transform_point(&nalgebra::Point3::origin());
        assert!((origin.coords - Vector3::new(-2.5, 0.0, 0.0)).norm() < 1e-5);
    }

    // ── setup data ────────────────────────────────────────────────────────

    #[test]
    fn layouts_and_data_come_from_the_configured_strategy() {
        let interleaved = Scene::new(SceneConfig::twin_cubes(VertexLayout::Interleaved));
        assert_eq!(interleaved.buffer_layouts().len(), 1);
        assert_eq!(interleaved.vertex_data()[0].len(), 24 * 6);

        let split = Scene::new(SceneConfig::split_twin_cubes());
        assert_eq!(split.buffer_layouts().len(), 2);
        assert_eq!(split.vertex_data()[0].len(), 24 * 3);
        assert_eq!(split.vertex_data()[1].len(), 24 * 3);
    }

    #[test]
    fn flat_scene_has_no_camera_matrices() {
        let scene = Scene::new(SceneConfig::triangle());
        assert!(scene.view().is_none());
        assert!(scene.projection(1.0).is_none());
        assert_eq!(scene.vertex_source(), FLAT_VERTEX);
    }

    #[test]
    fn uploaded_projection_targets_unit_depth() {
        let scene = Scene::new(SceneConfig::single_cube(VertexLayout::Interleaved));
        let proj = scene.projection(1.0).unwrap();
        let near = proj * nalgebra::Vector4::new(0.0, 0.0, -0.1, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
    }
}

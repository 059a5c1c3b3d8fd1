use std::f32::consts::TAU;

use nalgebra::Vector3;

use crate::color::Color;
use crate::geometry::VertexLayout;
use crate::transform::Camera;

/// Shape whose mesh the scene draws.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned cube with the given side length (> 0).
    Cube { side: f32 },
    /// Flat two-triangle square in clip space.
    Triangle,
}

/// One drawn copy of the scene mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Instance {
    pub translation: Vector3<f32>,
    /// Rotation axis; zero means the instance does not rotate.
    pub axis: Vector3<f32>,
    /// Multiplier on the scene's angular speed (negative spins backwards).
    pub spin: f32,
}

impl Instance {
    /// An instance at the origin that never moves.
    pub fn fixed() -> Self {
        Self {
            translation: Vector3::zeros(),
            axis: Vector3::zeros(),
            spin: 0.0,
        }
    }

    pub fn spinning(translation: Vector3<f32>, axis: Vector3<f32>, spin: f32) -> Self {
        Self { translation, axis, spin }
    }
}

/// Everything a scene needs, passed explicitly at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub shape: Shape,
    pub layout: VertexLayout,
    pub background: Color,
    /// `None` for flat shapes drawn directly in clip space.
    pub camera: Option<Camera>,
    /// Radians per second at `spin == 1.0`.
    pub angular_speed: f32,
    pub instances: Vec<Instance>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::twin_cubes(VertexLayout::Interleaved)
    }
}

impl SceneConfig {
    /// Flat square split into two colored triangles, drawn once without indices.
    pub fn triangle() -> Self {
        Self {
            shape: Shape::Triangle,
            layout: VertexLayout::Separate,
            background: Color::rgb(0.1, 0.1, 0.1),
            camera: None,
            angular_speed: 0.0,
            instances: vec![Instance::fixed()],
        }
    }

    /// One cube at the origin, one turn roughly every 21 seconds.
    pub fn single_cube(layout: VertexLayout) -> Self {
        Self {
            shape: Shape::Cube { side: 2.0 },
            layout,
            background: Color::rgb(0.5, 0.5, 0.5),
            camera: Some(Camera::default()),
            angular_speed: TAU / 21.0,
            instances: vec![Instance::spinning(Vector3::zeros(), Vector3::new(1.0, 1.0, 0.0), 1.0)],
        }
    }

    /// The same cube drawn twice side by side, spinning around different axes.
    pub fn twin_cubes(layout: VertexLayout) -> Self {
        Self {
            instances: vec![
                Instance::spinning(Vector3::new(-2.5, 0.0, 0.0), Vector3::y(), 1.0),
                Instance::spinning(Vector3::new(2.5, 0.0, 0.0), Vector3::x(), -1.0),
            ],
            ..Self::single_cube(layout)
        }
    }

    /// Twin cubes fed from separate position/color buffers, offset diagonally
    /// and turning roughly every 24 seconds.
    pub fn split_twin_cubes() -> Self {
        Self {
            angular_speed: TAU / 24.0,
            instances: vec![
                Instance::spinning(Vector3::new(-2.0, 1.0, 0.0), Vector3::new(1.0, 1.0, 0.0), 1.0),
                Instance::spinning(Vector3::new(2.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 1.0), 1.0),
            ],
            ..Self::single_cube(VertexLayout::Separate)
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Replaces the cube side length; no effect on flat shapes.
    pub fn with_side(mut self, side: f32) -> Self {
        if let Shape::Cube { .. } = self.shape {
            self.shape = Shape::Cube { side };
        }
        self
    }
}

use nalgebra::{Matrix4, Perspective3, Point3, Unit, Vector3};

/// Fixed camera: look-at view plus a perspective projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, -8.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Right-handed look-at view matrix.
    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// Perspective projection in GL clip convention (near → -1, far → +1).
    pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
        Perspective3::new(aspect, self.fov_y_degrees.to_radians(), self.near, self.far).to_homogeneous()
    }
}

/// `width / height`, falling back to 1 for a degenerate surface.
#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Remaps GL clip-space depth `[-1, 1]` to the `[0, 1]` range used by wgpu.
#[rustfmt::skip]
pub fn clip_correction() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// World matrix: rotate by `angle` radians around `axis`, then translate.
///
/// A zero-length axis yields no rotation.
pub fn world(angle: f32, axis: Vector3<f32>, translation: Vector3<f32>) -> Matrix4<f32> {
    let rotation = match Unit::try_new(axis, f32::EPSILON) {
        Some(axis) => Matrix4::from_axis_angle(&axis, angle),
        None => Matrix4::identity(),
    };
    Matrix4::new_translation(&translation) * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn matrix_approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y))
    }

    fn ndc_z(m: &Matrix4<f32>, view_z: f32) -> f32 {
        let clip = m * Vector4::new(0.0, 0.0, view_z, 1.0);
        clip.z / clip.w
    }

    // ── view ──────────────────────────────────────────────────────────────

    #[test]
    fn view_rotation_is_orthonormal() {
        let view = Camera::default().view();
        let r = view.fixed_view::<3, 3>(0, 0);
        for i in 0..3 {
            assert!(approx_eq(r.row(i).norm(), 1.0));
            assert!(approx_eq(r.column(i).norm(), 1.0));
            for j in (i + 1)..3 {
                assert!(approx_eq(r.row(i).dot(&r.row(j)), 0.0));
                assert!(approx_eq(r.column(i).dot(&r.column(j)), 0.0));
            }
        }
        assert!(approx_eq(r.clone_owned().determinant(), 1.0));
    }

    #[test]
    fn view_moves_eye_to_origin_and_target_forward() {
        let camera = Camera::default();
        let view = camera.view();

        let eye = view.transform_point(&camera.eye);
        assert!(approx_eq(eye.coords.norm(), 0.0));

        // Right-handed: the camera looks down -Z.
        let target = view.transform_point(&camera.target);
        assert!(approx_eq(target.x, 0.0));
        assert!(approx_eq(target.y, 0.0));
        assert!(approx_eq(target.z, -8.0));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_maps_near_and_far_planes() {
        let camera = Camera::default();
        let proj = camera.projection(aspect_ratio(800, 600));
        assert!(approx_eq(ndc_z(&proj, -camera.near), -1.0));
        assert!(approx_eq(ndc_z(&proj, -camera.far), 1.0));
    }

    #[test]
    fn clip_correction_maps_to_unit_depth() {
        let camera = Camera::default();
        let proj = clip_correction() * camera.projection(1.0);
        assert!(approx_eq(ndc_z(&proj, -camera.near), 0.0));
        assert!(approx_eq(ndc_z(&proj, -camera.far), 1.0));
    }

    #[test]
    fn projection_uses_aspect_and_fov() {
        let proj = Camera::default().projection(2.0);
        let f = 1.0 / (45.0f32.to_radians() * 0.5).tan();
        assert!(approx_eq(proj[(1, 1)], f));
        assert!(approx_eq(proj[(0, 0)], f / 2.0));
    }

    #[test]
    fn degenerate_surface_has_unit_aspect() {
        assert_eq!(aspect_ratio(640, 0), 1.0);
        assert_eq!(aspect_ratio(640, 320), 2.0);
    }

    // ── world ─────────────────────────────────────────────────────────────

    #[test]
    fn world_at_zero_angle_is_translation() {
        let t = Vector3::new(1.5, 0.0, 0.0);
        let m = world(0.0, Vector3::new(1.0, 1.0, 0.0), t);
        assert!(matrix_approx_eq(&m, &Matrix4::new_translation(&t)));
    }

    #[test]
    fn world_rotates_before_translating() {
        let m = world(std::f32::consts::FRAC_PI_2, Vector3::y(), Vector3::new(0.0, 0.0, 5.0));
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.z, 4.0));
    }

    #[test]
    fn zero_axis_means_no_rotation() {
        let m = world(1.0, Vector3::zeros(), Vector3::zeros());
        assert!(matrix_approx_eq(&m, &Matrix4::identity()));
    }
}

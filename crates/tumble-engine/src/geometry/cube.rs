use super::mesh::{Mesh, Primitive};

/// One color per cube face, in face order (front, back, top, bottom, right, left).
///
/// All six entries are distinct, so faces sharing an edge never share a color.
pub const FACE_PALETTE: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
];

// Unit-cube corners per face, counter-clockwise as seen from outside.
const FACES: [[[f32; 3]; 4]; 6] = [
    // front (+Z)
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    // back (-Z)
    [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    // top (+Y)
    [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    // bottom (-Y)
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    // right (+X)
    [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    // left (-X)
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
];

// Two triangles per quad, keeping the quad's winding.
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Builds an axis-aligned cube centered at the origin with the given side length.
///
/// Produces 24 vertices (corners are duplicated so every face carries its own
/// color) and 36 indices.
pub fn cube(side: f32) -> Mesh {
    let half = side * 0.5;

    let mut positions = Vec::with_capacity(24 * 3);
    let mut colors = Vec::with_capacity(24 * 3);
    let mut indices = Vec::with_capacity(36);

    for (face, corners) in FACES.iter().enumerate() {
        let base = (face * 4) as u16;
        for corner in corners {
            positions.extend(corner.iter().map(|c| c * half));
            colors.extend_from_slice(&FACE_PALETTE[face]);
        }
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    Mesh {
        position_components: 3,
        positions,
        colors,
        indices: Some(indices),
        primitive: Primitive::Triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: &[f32], b: &[f32]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn counts_hold_for_any_side() {
        for side in [0.01, 1.0, 2.0, 7.5, 1000.0] {
            let mesh = cube(side);
            assert_eq!(mesh.vertex_count(), 24);
            assert_eq!(mesh.index_count(), Some(36));
            assert_eq!(mesh.colors.len(), 24 * 3);
        }
    }

    #[test]
    fn indices_are_in_range() {
        let mesh = cube(2.0);
        assert!(mesh.indices.unwrap().iter().all(|&i| i < 24));
    }

    #[test]
    fn side_length_sets_extent() {
        let mesh = cube(3.0);
        let max = mesh.positions.iter().cloned().fold(f32::MIN, f32::max);
        let min = mesh.positions.iter().cloned().fold(f32::MAX, f32::min);
        assert_eq!(max, 1.5);
        assert_eq!(min, -1.5);
    }

    // ── colors ────────────────────────────────────────────────────────────

    #[test]
    fn each_face_has_a_single_palette_color() {
        let mesh = cube(2.0);
        for face in 0..6 {
            for v in face * 4..face * 4 + 4 {
                assert_eq!(mesh.color(v), &FACE_PALETTE[face]);
            }
        }
    }

    #[test]
    fn adjacent_faces_differ_in_color() {
        let mesh = cube(2.0);
        for a in 0..6 {
            for b in (a + 1)..6 {
                let shared = (a * 4..a * 4 + 4)
                    .filter(|&va| (b * 4..b * 4 + 4).any(|vb| mesh.position(va) == mesh.position(vb)))
                    .count();
                if shared >= 2 {
                    assert_ne!(mesh.color(a * 4), mesh.color(b * 4), "faces {a} and {b}");
                }
            }
        }
    }

    // ── winding ───────────────────────────────────────────────────────────

    #[test]
    fn triangles_face_outward() {
        // CCW from outside: the geometric normal points away from the center.
        let mesh = cube(2.0);
        for [a, b, c] in mesh.triangles() {
            let (pa, pb, pc) = (mesh.position(a), mesh.position(b), mesh.position(c));
            let n = cross(sub(pb, pa), sub(pc, pa));
            let centroid = [
                (pa[0] + pb[0] + pc[0]) / 3.0,
                (pa[1] + pb[1] + pc[1]) / 3.0,
                (pa[2] + pb[2] + pc[2]) / 3.0,
            ];
            let outward = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(outward > 0.0, "triangle {a},{b},{c} faces inward");
        }
    }
}

//! Normal transformation and recalculation

use glam::{Mat4, Vec3};

/// Matrix for transforming normals through `m`
///
/// Uses the inverse-transpose so normals stay perpendicular to surfaces under
/// non-uniform scale. A singular matrix has no inverse; `m` itself is used
/// instead and the caller's normalization absorbs the scale.
pub fn normal_matrix(m: Mat4) -> Mat4 {
    if m.determinant().abs() <= f32::EPSILON {
        return m;
    }
    m.inverse().transpose()
}

/// Recompute smooth vertex normals from a triangle list
///
/// Face normals are accumulated unnormalized, so each triangle contributes in
/// proportion to its area. Vertices referenced only by degenerate triangles
/// (or by none) get a zero normal. Triangles with an out-of-range index are
/// skipped.
pub fn recalculate_normals(vertices: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(&p0), Some(&p1), Some(&p2)) = (vertices.get(a), vertices.get(b), vertices.get(c))
        else {
            continue;
        };

        // |cross| is twice the triangle area
        let face = (p1 - p0).cross(p2 - p0);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in &mut normals {
        *n = n.normalize_or_zero();
    }

    normals
}

//! Mesh combining
//!
//! Merges posed snapshots from several renderers into one mesh expressed in a
//! common target frame.

use glam::{Mat4, Vec2, Vec3};

use crate::normals::{normal_matrix, recalculate_normals};
use crate::types::{Bounds, CombinedMesh, SourceMesh, TargetFrame};
use crate::MeshBakeError;

/// Combine source meshes into a single mesh in `target`'s coordinate space
///
/// Sources are appended in input order. Each source's vertices are mapped
/// through `target.world_to_local * source.local_to_world`, its normals
/// through the inverse-transpose of that matrix, and its UVs are copied
/// unchanged. Every submesh of every source lands in one flat triangle list
/// with indices offset into the combined vertex buffer.
///
/// Sources with zero vertices are skipped. A source without normals or UVs
/// gets zero placeholders so all attribute arrays stay index-aligned; if any
/// source lacked normals, all normals are recalculated from the final
/// combined geometry.
///
/// # Errors
/// - [`MeshBakeError::EmptyInput`] if no source has any vertices
/// - [`MeshBakeError::MalformedTriangleList`] if a triangle list length is not
///   a multiple of 3 or an index is out of range for its source
/// - [`MeshBakeError::NonFiniteGeometry`] if a source maps to NaN or infinite
///   positions (non-finite input or a degenerate target frame)
/// - [`MeshBakeError::TooManyVertices`] if the total exceeds the u32 index range
///
/// # Example
/// ```
/// use bake_common::{combine, SourceMesh, TargetFrame};
/// use glam::{Mat4, Vec3};
///
/// let tri = SourceMesh::new("tri", vec![Vec3::ZERO, Vec3::X, Vec3::Y]).with_submesh(vec![0, 1, 2]);
/// let moved = tri.clone().with_transform(Mat4::from_translation(Vec3::Z));
///
/// let combined = combine(&[tri, moved], &TargetFrame::world()).unwrap();
/// assert_eq!(combined.vertex_count(), 6);
/// assert_eq!(combined.triangles, vec![0, 1, 2, 3, 4, 5]);
/// ```
pub fn combine(sources: &[SourceMesh], target: &TargetFrame) -> Result<CombinedMesh, MeshBakeError> {
    let total_vertices: usize = sources.iter().map(SourceMesh::vertex_count).sum();
    let total_indices: usize = sources
        .iter()
        .flat_map(|s| s.submeshes.iter())
        .map(Vec::len)
        .sum();

    if total_vertices == 0 {
        return Err(MeshBakeError::EmptyInput);
    }
    if u32::try_from(total_vertices).is_err() {
        return Err(MeshBakeError::TooManyVertices(total_vertices));
    }

    let mut vertices = Vec::with_capacity(total_vertices);
    let mut normals = Vec::with_capacity(total_vertices);
    let mut uvs = Vec::with_capacity(total_vertices);
    let mut triangles = Vec::with_capacity(total_indices);
    let mut needs_recalculation = false;

    for (source_index, source) in sources.iter().enumerate() {
        if source.vertices.is_empty() {
            tracing::debug!("Skipping source {} ('{}'): no vertices", source_index, source.name);
            continue;
        }

        validate_triangles(source_index, source)?;

        // Fits: total_vertices was checked against u32 above
        let vertex_offset = vertices.len() as u32;
        let final_matrix: Mat4 = target.world_to_local * source.local_to_world;

        vertices.extend(
            source
                .vertices
                .iter()
                .map(|v| final_matrix.transform_point3(*v)),
        );
        if vertices[vertex_offset as usize..].iter().any(|v| !v.is_finite()) {
            return Err(MeshBakeError::NonFiniteGeometry {
                source_index,
                source_name: source.name.clone(),
            });
        }

        if source.has_normals() {
            let normal_matrix = normal_matrix(final_matrix);
            normals.extend(
                source
                    .normals
                    .iter()
                    .map(|n| normal_matrix.transform_vector3(*n).normalize_or_zero()),
            );
        } else {
            if !source.normals.is_empty() {
                tracing::warn!(
                    "Source '{}' has mismatched normal count ({} vs {} vertices), ignoring normals",
                    source.name,
                    source.normals.len(),
                    source.vertices.len()
                );
            }
            normals.resize(vertices.len(), Vec3::ZERO);
            needs_recalculation = true;
        }

        if source.has_uvs() {
            uvs.extend_from_slice(&source.uvs);
        } else {
            if !source.uvs.is_empty() {
                tracing::warn!(
                    "Source '{}' has mismatched UV count ({} vs {} vertices), ignoring UVs",
                    source.name,
                    source.uvs.len(),
                    source.vertices.len()
                );
            }
            uvs.resize(vertices.len(), Vec2::ZERO);
        }

        // All submeshes flatten into the single output submesh
        for submesh in &source.submeshes {
            triangles.extend(submesh.iter().map(|&i| i + vertex_offset));
        }
    }

    if needs_recalculation {
        tracing::debug!("At least one source had no normals, recalculating");
        normals = recalculate_normals(&vertices, &triangles);
    }

    let bounds = Bounds::from_points(&vertices);

    vertices.shrink_to_fit();
    normals.shrink_to_fit();
    uvs.shrink_to_fit();
    triangles.shrink_to_fit();

    Ok(CombinedMesh {
        vertices,
        normals,
        uvs,
        triangles,
        bounds,
        normals_recalculated: needs_recalculation,
    })
}

/// Check every submesh of a source before any of it is appended
fn validate_triangles(source_index: usize, source: &SourceMesh) -> Result<(), MeshBakeError> {
    let vertex_count = source.vertices.len();

    for (submesh, list) in source.submeshes.iter().enumerate() {
        let malformed = |reason: String| MeshBakeError::MalformedTriangleList {
            source_index,
            source_name: source.name.clone(),
            submesh,
            reason,
        };

        if list.len() % 3 != 0 {
            return Err(malformed(format!(
                "length {} is not a multiple of 3",
                list.len()
            )));
        }

        if let Some((position, &index)) = list
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(malformed(format!(
                "index {} at position {} is out of range for {} vertices",
                index, position, vertex_count
            )));
        }
    }

    Ok(())
}

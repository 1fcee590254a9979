//! Mesh data model for the combine pass

use glam::{Mat4, Vec2, Vec3};

/// A posed snapshot of one renderer, in the renderer's local space
///
/// Produced by a mesh sampler, consumed once by [`crate::combine`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    /// Renderer name (diagnostics only)
    pub name: String,
    /// Vertex positions in local space
    pub vertices: Vec<Vec3>,
    /// Vertex normals in local space (empty if the renderer has none)
    pub normals: Vec<Vec3>,
    /// UV coordinates (empty if the renderer has none)
    pub uvs: Vec<Vec2>,
    /// Flat triangle index lists, one per material slot
    pub submeshes: Vec<Vec<u32>>,
    /// Renderer local space to world space
    pub local_to_world: Mat4,
}

impl SourceMesh {
    /// Create a source with positions only, placed at the world origin
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            vertices,
            normals: Vec::new(),
            uvs: Vec::new(),
            submeshes: Vec::new(),
            local_to_world: Mat4::IDENTITY,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn with_submesh(mut self, triangles: Vec<u32>) -> Self {
        self.submeshes.push(triangles);
        self
    }

    pub fn with_transform(mut self, local_to_world: Mat4) -> Self {
        self.local_to_world = local_to_world;
        self
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total triangle count across all submeshes
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Whether normals are present and aligned with the vertices
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.vertices.len()
    }

    /// Whether UVs are present and aligned with the vertices
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() == self.vertices.len()
    }
}

/// Coordinate system the combined mesh is expressed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFrame {
    pub world_to_local: Mat4,
}

impl TargetFrame {
    /// Express the combined mesh in world space
    pub fn world() -> Self {
        Self {
            world_to_local: Mat4::IDENTITY,
        }
    }

    pub fn from_world_to_local(world_to_local: Mat4) -> Self {
        Self { world_to_local }
    }

    /// Express the combined mesh in the local space of an object
    ///
    /// Returns `None` when the object's transform cannot be inverted (zero
    /// scale on some axis, or non-finite entries).
    pub fn from_local_to_world(local_to_world: Mat4) -> Option<Self> {
        let det = local_to_world.determinant();
        if !det.is_finite() || det.abs() <= f32::EPSILON {
            return None;
        }
        let world_to_local = local_to_world.inverse();
        world_to_local.is_finite().then_some(Self { world_to_local })
    }
}

impl Default for TargetFrame {
    fn default() -> Self {
        Self::world()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Zero-sized box at the origin
    pub const EMPTY: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Smallest box containing every point (`EMPTY` for no points)
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::EMPTY;
        };
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the size
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Result of combining source meshes: one vertex buffer, one submesh
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Single flat triangle list covering every source submesh
    pub triangles: Vec<u32>,
    pub bounds: Bounds,
    /// Set when at least one source had no normals
    pub normals_recalculated: bool,
}

impl CombinedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

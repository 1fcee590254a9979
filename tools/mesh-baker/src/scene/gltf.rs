//! glTF/GLB scene sampler
//!
//! Every node that carries a mesh is one renderer. Its primitives become the
//! renderer's submeshes and its world transform is accumulated through the
//! node hierarchy. Geometry is reported as authored: skinned meshes come out
//! in their bind pose, since deformation is left to the host's evaluator.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec2, Vec3};
use hashbrown::HashMap;

use bake_common::SourceMesh;

use crate::error::SampleError;
use crate::sampler::MeshSampler;

/// A glTF scene loaded into per-renderer snapshots
#[derive(Debug, Clone)]
pub struct GltfScene {
    source: PathBuf,
    renderers: Vec<SourceMesh>,
    nodes: HashMap<String, Mat4>,
}

impl GltfScene {
    /// Load a `.gltf` or `.glb` file
    pub fn load(path: &Path) -> Result<Self, SampleError> {
        let (document, buffers, _images) = ::gltf::import(path).map_err(|e| SampleError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_document(path.to_path_buf(), &document, &buffers)
    }

    /// Load from in-memory glTF/GLB bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SampleError> {
        let source = PathBuf::from("<memory>");
        let (document, buffers, _images) =
            ::gltf::import_slice(bytes).map_err(|e| SampleError::Load {
                path: source.clone(),
                reason: e.to_string(),
            })?;
        Self::from_document(source, &document, &buffers)
    }

    fn from_document(
        source: PathBuf,
        document: &::gltf::Document,
        buffers: &[::gltf::buffer::Data],
    ) -> Result<Self, SampleError> {
        let mut scene = Self {
            source,
            renderers: Vec::new(),
            nodes: HashMap::new(),
        };

        let roots: Vec<::gltf::Node> = match document.default_scene().or_else(|| document.scenes().next()) {
            Some(s) => s.nodes().collect(),
            None => {
                // No scene: every node that is nobody's child is a root
                let children: Vec<usize> = document
                    .nodes()
                    .flat_map(|n| n.children().map(|c| c.index()).collect::<Vec<_>>())
                    .collect();
                document
                    .nodes()
                    .filter(|n| !children.contains(&n.index()))
                    .collect()
            }
        };

        for root in roots {
            scene.visit(&root, Mat4::IDENTITY, buffers)?;
        }

        tracing::debug!(
            "Loaded {:?}: {} renderers, {} named nodes",
            scene.source,
            scene.renderers.len(),
            scene.nodes.len()
        );

        Ok(scene)
    }

    /// Depth-first walk accumulating world transforms
    fn visit(
        &mut self,
        node: &::gltf::Node,
        parent: Mat4,
        buffers: &[::gltf::buffer::Data],
    ) -> Result<(), SampleError> {
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let world = parent * local;
        let name = node_name(node);

        if self.nodes.contains_key(&name) {
            tracing::warn!("Duplicate node name '{}', keeping the first", name);
        } else {
            self.nodes.insert(name.clone(), world);
        }

        if let Some(mesh) = node.mesh() {
            let renderer = read_mesh(&name, &mesh, buffers)?.with_transform(world);
            self.renderers.push(renderer);
        }

        for child in node.children() {
            self.visit(&child, world, buffers)?;
        }

        Ok(())
    }

    /// Path the scene was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Renderer snapshots in scene order
    pub fn renderers(&self) -> &[SourceMesh] {
        &self.renderers
    }

    pub fn renderer_names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name.as_str()).collect()
    }

    /// Keep only the named renderers, in the order given
    pub fn with_renderers<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, SampleError> {
        if names.is_empty() {
            return Ok(self);
        }

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let renderer = self
                .renderers
                .iter()
                .find(|r| r.name == name)
                .ok_or_else(|| SampleError::RendererNotFound(name.to_string()))?;
            selected.push(renderer.clone());
        }

        self.renderers = selected;
        Ok(self)
    }
}

impl MeshSampler for GltfScene {
    fn sample(&self) -> Result<Vec<SourceMesh>, SampleError> {
        if self.renderers.is_empty() {
            return Err(SampleError::NoRenderers);
        }
        Ok(self.renderers.clone())
    }

    fn node_transform(&self, name: &str) -> Option<Mat4> {
        self.nodes.get(name).copied()
    }
}

fn node_name(node: &::gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .or_else(|| node.mesh().and_then(|m| m.name().map(str::to_string)))
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

/// Merge all triangle primitives of a mesh into one renderer-local snapshot
fn read_mesh(
    name: &str,
    mesh: &::gltf::Mesh,
    buffers: &[::gltf::buffer::Data],
) -> Result<SourceMesh, SampleError> {
    let mut renderer = SourceMesh::new(name, Vec::new());
    let mut all_normals = true;
    let mut all_uvs = true;

    for primitive in mesh.primitives() {
        if primitive.mode() != ::gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Renderer '{}' primitive {} uses {:?}, only triangles are baked; skipping",
                name,
                primitive.index(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| SampleError::MissingPositions {
                renderer: name.to_string(),
            })?
            .map(Vec3::from_array)
            .collect();
        let count = positions.len();
        let too_many = || SampleError::TooManyVertices {
            renderer: name.to_string(),
        };
        let offset = u32::try_from(renderer.vertices.len()).map_err(|_| too_many())?;
        let end = u32::try_from(count)
            .ok()
            .and_then(|c| offset.checked_add(c))
            .ok_or_else(too_many)?;

        match reader.read_normals() {
            Some(iter) if all_normals => renderer.normals.extend(iter.map(Vec3::from_array)),
            _ => all_normals = false,
        }

        match reader.read_tex_coords(0) {
            Some(iter) if all_uvs => renderer
                .uvs
                .extend(iter.into_f32().map(Vec2::from_array)),
            _ => all_uvs = false,
        }

        // Submesh indices are local to the renderer's merged vertex buffer
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter
                .into_u32()
                .map(|i| offset_index(name, i, offset, count))
                .collect::<Result<_, _>>()?,
            None => (offset..end).collect(),
        };

        renderer.vertices.extend(positions);
        renderer.submeshes.push(indices);
    }

    if !all_normals {
        renderer.normals.clear();
    }
    if !all_uvs {
        renderer.uvs.clear();
    }

    Ok(renderer)
}

/// Rebase a primitive-local index into the renderer's merged vertex buffer
///
/// The index is checked against the primitive's own vertex count, so an
/// index that would only land in range after the offset is still rejected.
fn offset_index(renderer: &str, index: u32, offset: u32, count: usize) -> Result<u32, SampleError> {
    if (index as usize) >= count {
        return Err(SampleError::IndexOutOfRange {
            renderer: renderer.to_string(),
            index,
            count,
        });
    }
    // index < count and offset + count fits in u32
    Ok(offset + index)
}

//! Geometry and glTF JSON for the test scenes.

use serde_json::{Value, json};

/// Vertices per cube (4 per face, faces do not share vertices)
pub const CUBE_VERTEX_COUNT: usize = 24;
/// Indices per cube (2 triangles per face)
pub const CUBE_INDEX_COUNT: usize = 36;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;
const MODE_LINES: u32 = 1;
const MODE_TRIANGLES: u32 = 4;

/// Face normal with its two in-plane axes, ordered so that u x v = normal
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
];

/// Binary buffer plus the views and accessors describing it
#[derive(Default)]
struct BufferBuilder {
    data: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn view(&mut self, bytes: &[u8], target: u32) -> usize {
        while !self.data.len().is_multiple_of(4) {
            self.data.push(0);
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.data.len(),
            "byteLength": bytes.len(),
            "target": target,
        }));
        self.data.extend_from_slice(bytes);
        self.views.len() - 1
    }

    fn accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    /// POSITION accessor; glTF requires min/max on positions
    fn positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let view = self.view(bytemuck::cast_slice(positions), ARRAY_BUFFER);
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        self.accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": positions.len(),
            "type": "VEC3",
            "min": min,
            "max": max,
        }))
    }

    fn vec3s(&mut self, values: &[[f32; 3]]) -> usize {
        let view = self.view(bytemuck::cast_slice(values), ARRAY_BUFFER);
        self.accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": values.len(),
            "type": "VEC3",
        }))
    }

    fn vec2s(&mut self, values: &[[f32; 2]]) -> usize {
        let view = self.view(bytemuck::cast_slice(values), ARRAY_BUFFER);
        self.accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": values.len(),
            "type": "VEC2",
        }))
    }

    fn indices(&mut self, indices: &[u16]) -> usize {
        let view = self.view(bytemuck::cast_slice(indices), ELEMENT_ARRAY_BUFFER);
        self.accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_SHORT,
            "count": indices.len(),
            "type": "SCALAR",
        }))
    }

    /// Complete document around `nodes`/`meshes`; the buffer entry is
    /// filled in by the GLB wrapper
    fn finish(self, nodes: Value, scene_roots: Value, meshes: Value) -> (Value, Vec<u8>) {
        let root = json!({
            "asset": { "version": "2.0", "generator": "mesh-baker tests" },
            "scene": 0,
            "scenes": [{ "nodes": scene_roots }],
            "nodes": nodes,
            "meshes": meshes,
            "accessors": self.accessors,
            "bufferViews": self.views,
        });
        (root, self.data)
    }
}

struct CubeData {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u16>,
}

/// Unit cube centered on the origin, counter-clockwise outward faces
fn create_cube() -> CubeData {
    let mut cube = CubeData {
        positions: Vec::with_capacity(CUBE_VERTEX_COUNT),
        normals: Vec::with_capacity(CUBE_VERTEX_COUNT),
        uvs: Vec::with_capacity(CUBE_VERTEX_COUNT),
        indices: Vec::with_capacity(CUBE_INDEX_COUNT),
    };

    for (n, u, v) in FACES {
        let base = cube.positions.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let p = [
                n[0] * 0.5 + u[0] * su + v[0] * sv,
                n[1] * 0.5 + u[1] * su + v[1] * sv,
                n[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            cube.positions.push(p);
            cube.normals.push(n);
            cube.uvs.push([su + 0.5, sv + 0.5]);
        }
        cube.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    cube
}

/// Two instances of one cube mesh under a translated rig node
pub(crate) fn two_cubes(with_normals: bool) -> (Value, Vec<u8>) {
    let cube = create_cube();
    let mut buffer = BufferBuilder::default();

    let mut attributes = json!({ "POSITION": buffer.positions(&cube.positions) });
    let indices = buffer.indices(&cube.indices);
    if with_normals {
        attributes["NORMAL"] = buffer.vec3s(&cube.normals).into();
        attributes["TEXCOORD_0"] = buffer.vec2s(&cube.uvs).into();
    }

    buffer.finish(
        json!([
            { "name": "Rig", "translation": super::RIG_OFFSET, "children": [1, 2] },
            { "name": "CubeA", "mesh": 0 },
            { "name": "CubeB", "mesh": 0, "translation": super::CUBE_B_OFFSET },
        ]),
        json!([0]),
        json!([{
            "name": "Cube",
            "primitives": [{ "attributes": attributes, "indices": indices, "mode": MODE_TRIANGLES }],
        }]),
    )
}

/// One node, three primitives:
/// 0. indexed quad in the XY plane with normals and UVs (4 vertices)
/// 1. non-indexed triangle at z = 1, positions only (3 vertices)
/// 2. a single line segment, which is not a triangle primitive
pub(crate) fn mixed_primitives() -> (Value, Vec<u8>) {
    let mut buffer = BufferBuilder::default();

    let quad = buffer.positions(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    let quad_normals = buffer.vec3s(&[[0.0, 0.0, 1.0]; 4]);
    let quad_uvs = buffer.vec2s(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    let quad_indices = buffer.indices(&[0, 1, 2, 0, 2, 3]);

    let triangle = buffer.positions(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);

    let line = buffer.positions(&[[0.0, 0.0, -5.0], [0.0, 0.0, 5.0]]);

    buffer.finish(
        json!([{ "name": "Patch", "mesh": 0 }]),
        json!([0]),
        json!([{
            "name": "Patch",
            "primitives": [
                {
                    "attributes": { "POSITION": quad, "NORMAL": quad_normals, "TEXCOORD_0": quad_uvs },
                    "indices": quad_indices,
                    "mode": MODE_TRIANGLES,
                },
                { "attributes": { "POSITION": triangle }, "mode": MODE_TRIANGLES },
                { "attributes": { "POSITION": line }, "mode": MODE_LINES },
            ],
        }]),
    )
}

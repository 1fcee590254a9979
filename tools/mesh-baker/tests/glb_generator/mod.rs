//! Programmatic GLB scenes for integration tests.
//!
//! Two scenes are available:
//! - two cubes: `Rig` root translated by (0, 1, 0) with `CubeA` at its
//!   origin and `CubeB` translated by (2, 0, 0), both sharing one unit cube
//! - mixed primitives: a single `Patch` node whose mesh has an indexed quad
//!   (normals + UVs), a non-indexed triangle (positions only) and a line
//!   segment that must be ignored

mod scene_data;

use serde_json::Value;

pub use scene_data::{CUBE_INDEX_COUNT, CUBE_VERTEX_COUNT};

/// Translation of the `Rig` root node
pub const RIG_OFFSET: [f32; 3] = [0.0, 1.0, 0.0];
/// Translation of `CubeB` relative to `Rig`
pub const CUBE_B_OFFSET: [f32; 3] = [2.0, 0.0, 0.0];

/// Two-cube scene with positions and indices only, so normals are recalculated
pub fn generate_two_cube_glb() -> Vec<u8> {
    let (root, buffer) = scene_data::two_cubes(false);
    to_glb(root, buffer)
}

/// Same scene with per-vertex normals and UVs on the cube mesh
pub fn generate_two_cube_glb_with_normals() -> Vec<u8> {
    let (root, buffer) = scene_data::two_cubes(true);
    to_glb(root, buffer)
}

/// Single node whose primitives disagree on attributes, indexing and mode
pub fn generate_mixed_primitive_glb() -> Vec<u8> {
    let (root, buffer) = scene_data::mixed_primitives();
    to_glb(root, buffer)
}

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

/// Wrap a glTF document and its single binary buffer in a GLB container
fn to_glb(mut root: Value, buffer: Vec<u8>) -> Vec<u8> {
    root["buffers"] = serde_json::json!([{ "byteLength": buffer.len() }]);
    let json = serde_json::to_vec(&root).expect("Failed to serialize glTF JSON");

    let mut body = Vec::new();
    push_chunk(&mut body, CHUNK_JSON, &json, b' ');
    push_chunk(&mut body, CHUNK_BIN, &buffer, 0);

    let mut glb = Vec::with_capacity(12 + body.len());
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
    glb.extend_from_slice(&body);
    glb
}

/// Append one chunk, padded to 4 bytes with `pad`
fn push_chunk(out: &mut Vec<u8>, kind: u32, data: &[u8], pad: u8) {
    let padded_len = data.len().next_multiple_of(4);
    out.extend_from_slice(&(padded_len as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(data);
    out.resize(out.len() + padded_len - data.len(), pad);
}

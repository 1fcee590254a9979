//! BakedMesh binary format (.bakedmesh)
//!
//! Static snapshot of a combined mesh. POD format - no magic bytes,
//! little-endian throughout.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: index_count u32
//! 0x08: name_len u16
//! 0x0A: flags u8 (FLAG_NORMALS_RECALCULATED)
//! 0x0B: padding (1 byte)
//! 0x0C: bounds_min f32 x3
//! 0x18: bounds_max f32 x3
//! 0x24: name (name_len bytes, UTF-8), zero-padded to 4 bytes
//! var:  positions (vertex_count * 12 bytes)
//! var:  normals   (vertex_count * 12 bytes)
//! var:  uvs       (vertex_count * 8 bytes)
//! var:  indices   (index_count * 4 bytes)
//! ```

use glam::{Vec2, Vec3};

use crate::types::{Bounds, CombinedMesh};

/// File extension for baked mesh assets
pub const BAKED_MESH_EXT: &str = "bakedmesh";

/// Normals were recomputed because a source lacked them
pub const FLAG_NORMALS_RECALCULATED: u8 = 0x01;

/// Errors reading or writing `.bakedmesh` data
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Baked mesh data truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Baked mesh name is not valid UTF-8: {0}")]
    InvalidName(#[from] std::str::Utf8Error),

    #[error("Baked mesh name is {0} bytes, maximum is {max}", max = u16::MAX)]
    NameTooLong(usize),

    #[error("Baked mesh has {0} elements, maximum is {max}", max = u32::MAX)]
    TooLarge(usize),

    #[error("Baked mesh index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: u32 },
}

/// BakedMesh header (36 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct BakedMeshHeader {
    pub vertex_count: u32,
    pub index_count: u32,
    pub name_len: u16,
    pub flags: u8,
    pub _padding: u8,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

impl BakedMeshHeader {
    pub const SIZE: usize = 36;

    pub fn new(
        vertex_count: u32,
        index_count: u32,
        name_len: u16,
        flags: u8,
        bounds_min: [f32; 3],
        bounds_max: [f32; 3],
    ) -> Self {
        Self {
            vertex_count,
            index_count,
            name_len,
            flags,
            _padding: 0,
            bounds_min,
            bounds_max,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.index_count.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.name_len.to_le_bytes());
        bytes[10] = self.flags;
        // padding byte stays 0
        for (i, f) in self.bounds_min.iter().chain(&self.bounds_max).enumerate() {
            let at = 12 + i * 4;
            bytes[at..at + 4].copy_from_slice(&f.to_le_bytes());
        }
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let f32_at = |at: usize| f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Some(Self {
            vertex_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            index_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            name_len: u16::from_le_bytes([bytes[8], bytes[9]]),
            flags: bytes[10],
            _padding: 0,
            bounds_min: [f32_at(12), f32_at(16), f32_at(20)],
            bounds_max: [f32_at(24), f32_at(28), f32_at(32)],
        })
    }

    pub fn normals_recalculated(&self) -> bool {
        self.flags & FLAG_NORMALS_RECALCULATED != 0
    }

    /// Bytes taken by the padded name block
    pub fn name_block_size(&self) -> usize {
        (self.name_len as usize).next_multiple_of(4)
    }

    /// Total file size described by this header
    pub fn file_size(&self) -> usize {
        let vertices = self.vertex_count as usize;
        Self::SIZE + self.name_block_size() + vertices * (12 + 12 + 8) + self.index_count as usize * 4
    }
}

/// A `.bakedmesh` file read back into memory
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBakedMesh {
    pub name: String,
    pub mesh: CombinedMesh,
}

/// Encode a combined mesh as a complete `.bakedmesh` file
pub fn encode_baked_mesh(name: &str, mesh: &CombinedMesh) -> Result<Vec<u8>, FormatError> {
    let name_len = u16::try_from(name.len()).map_err(|_| FormatError::NameTooLong(name.len()))?;
    let vertex_count =
        u32::try_from(mesh.vertices.len()).map_err(|_| FormatError::TooLarge(mesh.vertices.len()))?;
    let index_count =
        u32::try_from(mesh.triangles.len()).map_err(|_| FormatError::TooLarge(mesh.triangles.len()))?;

    let flags = if mesh.normals_recalculated {
        FLAG_NORMALS_RECALCULATED
    } else {
        0
    };
    let header = BakedMeshHeader::new(
        vertex_count,
        index_count,
        name_len,
        flags,
        mesh.bounds.min.to_array(),
        mesh.bounds.max.to_array(),
    );

    let mut data = Vec::with_capacity(header.file_size());
    data.extend_from_slice(&header.to_bytes());
    data.extend_from_slice(name.as_bytes());
    data.resize(BakedMeshHeader::SIZE + header.name_block_size(), 0);

    write_f32s(&mut data, bytemuck::cast_slice::<Vec3, f32>(&mesh.vertices));
    write_f32s(&mut data, bytemuck::cast_slice::<Vec3, f32>(&mesh.normals));
    write_f32s(&mut data, bytemuck::cast_slice::<Vec2, f32>(&mesh.uvs));
    for i in &mesh.triangles {
        data.extend_from_slice(&i.to_le_bytes());
    }

    Ok(data)
}

fn write_f32s(data: &mut Vec<u8>, values: &[f32]) {
    for f in values {
        data.extend_from_slice(&f.to_le_bytes());
    }
}

/// Decode a complete `.bakedmesh` file
pub fn decode_baked_mesh(bytes: &[u8]) -> Result<DecodedBakedMesh, FormatError> {
    let header = BakedMeshHeader::from_bytes(bytes).ok_or(FormatError::Truncated {
        expected: BakedMeshHeader::SIZE,
        actual: bytes.len(),
    })?;
    if bytes.len() < header.file_size() {
        return Err(FormatError::Truncated {
            expected: header.file_size(),
            actual: bytes.len(),
        });
    }

    let name_start = BakedMeshHeader::SIZE;
    let name = std::str::from_utf8(&bytes[name_start..name_start + header.name_len as usize])?;

    // Lengths were checked against file_size() above
    let vertex_count = header.vertex_count as usize;
    let body = &bytes[name_start + header.name_block_size()..];
    let (positions, body) = body.split_at(vertex_count * 12);
    let (normals, body) = body.split_at(vertex_count * 12);
    let (uvs, body) = body.split_at(vertex_count * 8);
    let indices = &body[..header.index_count as usize * 4];

    let vertices = read_f32s(positions)
        .chunks_exact(3)
        .map(Vec3::from_slice)
        .collect();
    let normals = read_f32s(normals)
        .chunks_exact(3)
        .map(Vec3::from_slice)
        .collect();
    let uvs = read_f32s(uvs)
        .chunks_exact(2)
        .map(Vec2::from_slice)
        .collect();
    let triangles: Vec<u32> = indices
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    if let Some(&index) = triangles.iter().find(|&&i| i >= header.vertex_count) {
        return Err(FormatError::IndexOutOfRange {
            index,
            vertex_count: header.vertex_count,
        });
    }

    Ok(DecodedBakedMesh {
        name: name.to_string(),
        mesh: CombinedMesh {
            vertices,
            normals,
            uvs,
            triangles,
            bounds: Bounds {
                min: Vec3::from_array(header.bounds_min),
                max: Vec3::from_array(header.bounds_max),
            },
            normals_recalculated: header.normals_recalculated(),
        },
    })
}

fn read_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

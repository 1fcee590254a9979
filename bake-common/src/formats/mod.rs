//! Binary asset formats written by the bake tools
//!
//! - [`baked_mesh`] - `.bakedmesh` static mesh snapshot

pub mod baked_mesh;

pub use baked_mesh::{
    BAKED_MESH_EXT, BakedMeshHeader, DecodedBakedMesh, FLAG_NORMALS_RECALCULATED, FormatError,
    decode_baked_mesh, encode_baked_mesh,
};

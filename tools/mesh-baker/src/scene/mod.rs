//! Scene readers acting as mesh samplers

mod gltf;

pub use self::gltf::GltfScene;

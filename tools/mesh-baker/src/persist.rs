//! Writing baked meshes to disk

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use bake_common::{BAKED_MESH_EXT, CombinedMesh, encode_baked_mesh};

use crate::error::PersistError;
use crate::obj::write_obj;

/// Upper bound on " N" suffixes tried when generating a unique path
const MAX_UNIQUE_SUFFIX: u32 = 10_000;

/// Consumes a finished combined mesh and stores it under a name
pub trait AssetPersister {
    /// Store `mesh` as `name`, returning where it ended up
    fn persist(&self, name: &str, mesh: &CombinedMesh) -> Result<PathBuf, PersistError>;
}

/// On-disk asset encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssetFormat {
    /// `.bakedmesh` binary snapshot
    #[default]
    BakedMesh,
    /// Wavefront OBJ text
    Obj,
}

impl AssetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AssetFormat::BakedMesh => BAKED_MESH_EXT,
            AssetFormat::Obj => "obj",
        }
    }

    /// Parse a format name ("bakedmesh" or "obj", case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bakedmesh" => Some(AssetFormat::BakedMesh),
            "obj" => Some(AssetFormat::Obj),
            _ => None,
        }
    }

    fn encode(&self, name: &str, mesh: &CombinedMesh) -> Result<Vec<u8>, PersistError> {
        match self {
            AssetFormat::BakedMesh => Ok(encode_baked_mesh(name, mesh)?),
            AssetFormat::Obj => {
                let mut data = Vec::new();
                write_obj(&mut data, name, mesh).map_err(|source| PersistError::Io {
                    path: PathBuf::from(name),
                    source,
                })?;
                Ok(data)
            }
        }
    }
}

/// Writes assets into a save directory, never overwriting existing files
///
/// The directory is created on first use. The whole file is encoded in memory
/// before anything touches the disk, and the file is opened with `create_new`,
/// so a failed bake leaves no partial asset behind and an existing asset is
/// never clobbered.
#[derive(Debug, Clone)]
pub struct FileAssetPersister {
    dir: PathBuf,
    format: AssetFormat,
}

impl FileAssetPersister {
    pub fn new(dir: impl Into<PathBuf>, format: AssetFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> AssetFormat {
        self.format
    }
}

impl AssetPersister for FileAssetPersister {
    fn persist(&self, name: &str, mesh: &CombinedMesh) -> Result<PathBuf, PersistError> {
        let data = self.format.encode(name, mesh)?;

        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let ext = self.format.extension();
        for suffix in 0..MAX_UNIQUE_SUFFIX {
            let path = unique_candidate(&self.dir, name, ext, suffix);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(source) = file.write_all(&data).and_then(|_| file.sync_all()) {
                        drop(file);
                        // Best effort: the write error is what gets reported
                        let _ = fs::remove_file(&path);
                        return Err(PersistError::Io { path, source });
                    }
                    tracing::debug!("Wrote {} bytes to {:?}", data.len(), path);
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(PersistError::Io { path, source }),
            }
        }

        Err(PersistError::NoUniquePath(name.to_string()))
    }
}

/// `name.ext` for suffix 0, then `name 1.ext`, `name 2.ext`, ...
fn unique_candidate(dir: &Path, name: &str, ext: &str, suffix: u32) -> PathBuf {
    if suffix == 0 {
        dir.join(format!("{}.{}", name, ext))
    } else {
        dir.join(format!("{} {}.{}", name, suffix, ext))
    }
}

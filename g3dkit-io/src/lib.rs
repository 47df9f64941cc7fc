//! Reading and writing G3D model files
//!
//! This crate provides the binary codec for G3D versions 3 and 4 plus
//! file-level helpers that register a model's textures while loading it.
//!
//! ```no_run
//! use g3dkit_core::TextureRegistry;
//!
//! let mut textures = TextureRegistry::new();
//! let loaded = g3dkit_io::read_model("tank.g3d", &mut textures)?;
//! println!("{}", loaded.model.describe());
//! g3dkit_io::write_model("tank_copy.g3d", &loaded.model)?;
//! # Ok::<(), g3dkit_io::IoError>(())
//! ```

pub mod codec;
pub mod error;
pub mod reader;
pub mod v3;
pub mod v4;
mod writer;

pub use codec::{decode, encode, encode_into, MAGIC, MORPH_MESH};
pub use error::*;
pub use reader::ByteReader;
pub use v3::{decode_v3, encode_v3};
pub use v4::{decode_v4, encode_v4};

use g3dkit_core::{legacy_normal_map_name, resolve_texture_path, Model, TextureId, TextureRegistry, Version};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Texture ids registered for one mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshTextures {
    pub diffuse: Option<TextureId>,
    pub normal_map: Option<TextureId>,
}

/// A model read from disk together with its registered textures
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub model: Model,
    /// One entry per mesh, in mesh order
    pub textures: Vec<MeshTextures>,
}

/// Trait for reading models from files
pub trait ModelReader {
    fn read_model<P: AsRef<Path>>(path: P, textures: &mut TextureRegistry) -> Result<LoadedModel, IoError>;
}

/// Trait for writing models to files
pub trait ModelWriter {
    fn write_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<(), IoError>;
}

/// G3D file reader
pub struct G3dReader;

/// G3D file writer
pub struct G3dWriter;

impl ModelReader for G3dReader {
    fn read_model<P: AsRef<Path>>(path: P, textures: &mut TextureRegistry) -> Result<LoadedModel, IoError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => IoError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => IoError::Io(e),
        })?;
        let model = decode(&bytes).map_err(|source| IoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let model_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mesh_textures = register_textures(&model, model_dir, textures);

        tracing::info!(
            "loaded {}: {} meshes, {} textures",
            path.display(),
            model.mesh_count(),
            mesh_textures.iter().filter(|t| t.diffuse.is_some()).count()
        );
        Ok(LoadedModel {
            path: path.to_path_buf(),
            model,
            textures: mesh_textures,
        })
    }
}

impl ModelWriter for G3dWriter {
    fn write_model<P: AsRef<Path>>(model: &Model, path: P) -> Result<(), IoError> {
        let path = path.as_ref();
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        encode_into(model, &mut writer)?;
        writer.flush()?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Register every texture a model references.
///
/// Version 3 meshes name only a diffuse texture; a normal map is picked up
/// when a file following the `_normal` naming convention exists beside it.
fn register_textures(model: &Model, model_dir: &Path, registry: &mut TextureRegistry) -> Vec<MeshTextures> {
    model
        .meshes
        .iter()
        .map(|mesh| {
            let mut ids = MeshTextures::default();
            for (slot, name) in mesh.textures.iter() {
                let id = registry.assign_embedded(model_dir, name.as_str());
                match slot {
                    g3dkit_core::DIFFUSE_SLOT => ids.diffuse = Some(id),
                    g3dkit_core::NORMAL_MAP_SLOT => {
                        tracing::debug!("{} uses normal map {}", mesh.display_name(), name);
                        ids.normal_map = Some(id);
                    }
                    _ => {}
                }
            }

            if model.version == Version::V3 && ids.normal_map.is_none() {
                if let Some(diffuse) = mesh.textures.diffuse() {
                    let candidate = resolve_texture_path(model_dir, &legacy_normal_map_name(diffuse.as_str()));
                    if candidate.is_file() {
                        tracing::debug!("found normal map {}", candidate.display());
                        ids.normal_map = Some(registry.assign(candidate));
                    }
                }
            }
            ids
        })
        .collect()
}

/// Read a G3D file and register its textures
pub fn read_model<P: AsRef<Path>>(path: P, textures: &mut TextureRegistry) -> Result<LoadedModel, IoError> {
    G3dReader::read_model(path, textures)
}

/// Write a model to a G3D file
pub fn write_model<P: AsRef<Path>>(path: P, model: &Model) -> Result<(), IoError> {
    G3dWriter::write_model(model, path)
}

#[cfg(test)]
mod tests;

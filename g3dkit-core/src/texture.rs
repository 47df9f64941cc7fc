//! Texture path resolution and the texture registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolve a texture path embedded in a model against the model's directory.
///
/// Embedded paths are frequently written as if rooted (`/textures/a.tga` or
/// `\textures\a.tga`); every leading separator is stripped so the remainder
/// is always joined under `model_dir`.
pub fn resolve_texture_path<P: AsRef<Path>>(model_dir: P, raw_path: &str) -> PathBuf {
    let relative = raw_path.trim_start_matches(['/', '\\']);
    model_dir.as_ref().join(relative)
}

/// Conventional name of the normal map that accompanies a version 3 texture:
/// `_normal` inserted before the extension (`tank.bmp` -> `tank_normal.bmp`).
pub fn legacy_normal_map_name(texture: &str) -> String {
    let stem_end = match texture.rfind('.') {
        Some(dot) if !texture[dot..].contains(['/', '\\']) => dot,
        _ => texture.len(),
    };
    format!("{}_normal{}", &texture[..stem_end], &texture[stem_end..])
}

/// Identifier handed out by a [`TextureRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Assigns stable identifiers to resolved texture paths.
///
/// The registry is an explicit value threaded through model loading so that
/// several models can share texture identifiers without any global state.
/// Identifiers start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    ids: HashMap<PathBuf, TextureId>,
    paths: Vec<PathBuf>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id of a path, assigning the next free one if it is new
    pub fn assign<P: Into<PathBuf>>(&mut self, path: P) -> TextureId {
        let path = path.into();
        if let Some(&id) = self.ids.get(&path) {
            return id;
        }
        let id = TextureId(self.paths.len() as u32 + 1);
        tracing::debug!("assigning texture {} -> {}", path.display(), id.0);
        self.ids.insert(path.clone(), id);
        self.paths.push(path);
        id
    }

    /// Resolve an embedded texture path against `model_dir` and assign it
    pub fn assign_embedded<P: AsRef<Path>>(&mut self, model_dir: P, raw_path: &str) -> TextureId {
        self.assign(resolve_texture_path(model_dir, raw_path))
    }

    /// Look up the id of an already registered path
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<TextureId> {
        self.ids.get(path.as_ref()).copied()
    }

    /// Look up the path registered under an id
    pub fn path(&self, id: TextureId) -> Option<&Path> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.paths.get(index).map(PathBuf::as_path)
    }

    /// Get the number of registered textures
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Registered textures in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (TextureId(i as u32 + 1), p.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_leading_separators() {
        let dir = Path::new("units/tank/models");
        assert_eq!(
            resolve_texture_path(dir, "/textures/tank.bmp"),
            dir.join("textures/tank.bmp")
        );
        assert_eq!(
            resolve_texture_path(dir, "\\\\/textures\\tank.bmp"),
            dir.join("textures\\tank.bmp")
        );
        assert_eq!(resolve_texture_path(dir, "tank.bmp"), dir.join("tank.bmp"));
    }

    #[test]
    fn test_legacy_normal_map_name() {
        assert_eq!(legacy_normal_map_name("tank.bmp"), "tank_normal.bmp");
        assert_eq!(legacy_normal_map_name("/textures/tank.tga"), "/textures/tank_normal.tga");
        assert_eq!(legacy_normal_map_name("tank"), "tank_normal");
        assert_eq!(legacy_normal_map_name("units.v2/tank"), "units.v2/tank_normal");
    }

    #[test]
    fn test_registry_assigns_sequential_ids() {
        let mut registry = TextureRegistry::new();
        assert!(registry.is_empty());

        let a = registry.assign("a.bmp");
        let b = registry.assign("b.bmp");
        let again = registry.assign("a.bmp");

        assert_eq!(a, TextureId(1));
        assert_eq!(b, TextureId(2));
        assert_eq!(again, a);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.path(b), Some(Path::new("b.bmp")));
        assert_eq!(registry.path(TextureId(0)), None);
        assert_eq!(registry.get("b.bmp"), Some(b));
    }

    #[test]
    fn test_assign_embedded_shares_ids() {
        let mut registry = TextureRegistry::new();
        let a = registry.assign_embedded("models", "/skin.tga");
        let b = registry.assign_embedded("models", "skin.tga");
        assert_eq!(a, b);

        let order: Vec<_> = registry.iter().map(|(id, p)| (id.0, p.to_path_buf())).collect();
        assert_eq!(order, vec![(1, PathBuf::from("models/skin.tga"))]);
    }
}

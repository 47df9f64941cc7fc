//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::name::FixedName;
use crate::point::*;
use serde::{Deserialize, Serialize};

/// Number of texture slots a mesh can carry
pub const TEXTURE_SLOT_COUNT: usize = 5;

/// Slot holding the diffuse texture
pub const DIFFUSE_SLOT: usize = 0;

/// Slot holding the normal (bump) map
pub const NORMAL_MAP_SLOT: usize = 2;

/// Rendering flags decoded from a mesh's properties word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MeshFlags {
    pub two_sided: bool,
    pub custom_color: bool,
}

impl MeshFlags {
    pub fn new(two_sided: bool, custom_color: bool) -> Self {
        Self {
            two_sided,
            custom_color,
        }
    }
}

/// Texture names indexed by slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureSlots {
    slots: [Option<FixedName>; TEXTURE_SLOT_COUNT],
}

impl TextureSlots {
    /// Create an empty set of slots
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the texture in a slot
    pub fn get(&self, slot: usize) -> Option<&FixedName> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Get a mutable reference to the texture in a slot
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut FixedName> {
        self.slots.get_mut(slot).and_then(|s| s.as_mut())
    }

    /// Put a texture into a slot, returning the previous occupant.
    ///
    /// Slots outside `0..TEXTURE_SLOT_COUNT` do not exist and are ignored.
    pub fn set(&mut self, slot: usize, name: Option<FixedName>) -> Option<FixedName> {
        match self.slots.get_mut(slot) {
            Some(entry) => std::mem::replace(entry, name),
            None => None,
        }
    }

    /// The diffuse texture
    pub fn diffuse(&self) -> Option<&FixedName> {
        self.get(DIFFUSE_SLOT)
    }

    /// The normal map
    pub fn normal_map(&self) -> Option<&FixedName> {
        self.get(NORMAL_MAP_SLOT)
    }

    /// Bitmask with bit `t` set for every occupied slot `t`
    pub fn mask(&self) -> u32 {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .fold(0, |mask, (t, _)| mask | (1 << t))
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Occupied slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FixedName)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(t, s)| s.as_ref().map(|name| (t, name)))
    }

    /// Mutable access to occupied slots in ascending order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut FixedName)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(t, s)| s.as_mut().map(|name| (t, name)))
    }
}

/// One animation frame: a position and a normal per vertex
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub vertices: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
}

impl Frame {
    /// Create a frame from parallel position and normal arrays
    pub fn new(vertices: Vec<Point3f>, normals: Vec<Vector3f>) -> Self {
        Self { vertices, normals }
    }

    /// Create a frame whose normals all point along +Z
    pub fn from_vertices(vertices: Vec<Point3f>) -> Self {
        let normals = vec![Vector3f::new(0.0, 0.0, 1.0); vertices.len()];
        Self { vertices, normals }
    }

    /// Number of vertices in the frame
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the frame has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Raw version 3 header fields and opaque regions kept for re-encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyExtras {
    /// Declared normal frame count; never used to size any block
    pub normal_frame_count: u32,
    /// Declared texture coordinate frame count (kept for untextured meshes)
    pub tex_coord_frame_count: u32,
    /// Declared colour frame count
    pub color_frame_count: u32,
    /// Properties word as read, including bits g3dkit does not interpret
    pub properties: u32,
    /// The texture name field, present even when the mesh is untextured
    pub texture_field: FixedName,
    /// Legacy per-vertex colour block, 16 bytes per colour frame
    pub color_block: Vec<u8>,
}

/// Raw version 4 header fields kept for re-encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedExtras {
    pub reserved: [u8; 32],
    /// Properties word as read, including bits g3dkit does not interpret
    pub properties: u32,
    /// Texture mask as read; bits above the last slot are carried through
    pub texture_mask: u32,
}

/// Version-specific data that has no meaning to g3dkit but must survive a
/// decode/encode cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum MeshExtras {
    /// Built in memory; the encoder synthesizes neutral values
    #[default]
    None,
    V3(LegacyExtras),
    V4(ReservedExtras),
}

/// A morph-animated triangle mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name (version 4 only)
    pub name: Option<FixedName>,
    pub vertex_count: usize,
    pub frames: Vec<Frame>,
    /// Texture coordinate frames; empty when the mesh carries none
    pub tex_coords: Vec<Vec<TexCoord>>,
    pub indices: Vec<u32>,
    pub flags: MeshFlags,
    pub textures: TextureSlots,
    pub extras: MeshExtras,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            name: None,
            vertex_count: 0,
            frames: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            flags: MeshFlags::default(),
            textures: TextureSlots::new(),
            extras: MeshExtras::None,
        }
    }

    /// Create a mesh from animation frames and a triangle list
    pub fn from_frames(frames: Vec<Frame>, indices: Vec<u32>) -> Self {
        let vertex_count = frames.first().map(Frame::len).unwrap_or(0);
        Self {
            vertex_count,
            frames,
            indices,
            ..Self::new()
        }
    }

    /// Set the mesh name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(FixedName::new(name));
        self
    }

    /// Set the rendering flags
    pub fn with_flags(mut self, flags: MeshFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attach a diffuse texture together with its coordinates
    pub fn with_diffuse<S: Into<String>>(mut self, texture: S, tex_coords: Vec<TexCoord>) -> Self {
        self.textures.set(DIFFUSE_SLOT, Some(FixedName::new(texture)));
        self.tex_coords = vec![tex_coords];
        self
    }

    /// Attach a texture to an arbitrary slot
    pub fn with_texture<S: Into<String>>(mut self, slot: usize, texture: S) -> Self {
        self.textures.set(slot, Some(FixedName::new(texture)));
        self
    }

    /// Get the number of animation frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Get the number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Get the number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0 || self.indices.len() < 3
    }

    /// Vertex indices of triangle `t`
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        let i = &self.indices[t * 3..t * 3 + 3];
        [i[0] as usize, i[1] as usize, i[2] as usize]
    }

    /// Iterate over triangles
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Whether the mesh has a diffuse texture
    pub fn is_textured(&self) -> bool {
        self.textures.diffuse().is_some()
    }

    /// Whether the mesh carries texture coordinates
    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Name of the mesh, or an empty string for unnamed meshes
    pub fn display_name(&self) -> &str {
        self.name.as_ref().map(FixedName::as_str).unwrap_or("")
    }

    /// Check the structural invariants of the mesh.
    ///
    /// `mesh` is the position of the mesh in its model and only used to
    /// label errors.
    pub fn validate(&self, mesh: usize) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::IncompleteTriangles {
                mesh,
                index_count: self.indices.len(),
            });
        }

        for (f, frame) in self.frames.iter().enumerate() {
            if frame.vertices.len() != self.vertex_count || frame.normals.len() != self.vertex_count {
                return Err(Error::InvalidData(format!(
                    "mesh {}: frame {} has {} vertices and {} normals, expected {}",
                    mesh,
                    f,
                    frame.vertices.len(),
                    frame.normals.len(),
                    self.vertex_count
                )));
            }
        }

        for (f, coords) in self.tex_coords.iter().enumerate() {
            if coords.len() != self.vertex_count {
                return Err(Error::InvalidData(format!(
                    "mesh {}: texture frame {} has {} coordinates, expected {}",
                    mesh,
                    f,
                    coords.len(),
                    self.vertex_count
                )));
            }
        }

        if let Some((position, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &i)| i as usize >= self.vertex_count)
        {
            return Err(Error::IndexOutOfRange {
                mesh,
                position,
                index,
                vertex_count: self.vertex_count,
            });
        }

        Ok(())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

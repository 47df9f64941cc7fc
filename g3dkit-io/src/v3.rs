//! Version 3 mesh records

use crate::codec::{check_mesh, read_frames, read_indices, MAX_EMPTY_FRAMES};
use crate::error::{DecodeError, EncodeError};
use crate::reader::ByteReader;
use crate::writer::*;
use byteorder::{LittleEndian, WriteBytesExt};
use g3dkit_core::{LegacyExtras, Mesh, MeshExtras, MeshFlags, TextureSlots, DIFFUSE_SLOT};
use std::io::Write;

const NO_TEXTURE: u32 = 1 << 0;
const TWO_SIDED: u32 = 1 << 1;
const CUSTOM_COLOR: u32 = 1 << 2;
const KNOWN_BITS: u32 = NO_TEXTURE | TWO_SIDED | CUSTOM_COLOR;

/// Size of one legacy colour frame
pub const COLOR_FRAME_LEN: usize = 16;

/// Byte length of the colour block for a declared colour frame count.
///
/// The block is never shorter than one frame, so a count of 0 still reads 16 bytes.
fn color_block_len(color_frame_count: u32) -> Option<usize> {
    (color_frame_count.max(1) as usize).checked_mul(COLOR_FRAME_LEN)
}

/// Decode one version 3 mesh record
pub fn decode_v3(reader: &mut ByteReader<'_>, mesh: usize) -> Result<Mesh, DecodeError> {
    let frame_count = reader.read_count("frame count")?;
    let normal_frame_count = reader.read_u32("normal frame count")?;
    let tex_coord_frame_count = reader.read_u32("texture coordinate frame count")?;
    let color_frame_count = reader.read_u32("colour frame count")?;
    let vertex_count = reader.read_count("vertex count")?;
    let index_count = reader.read_count("index count")?;
    let properties = reader.read_u32("properties")?;
    let texture_field = reader.read_name("texture name")?;

    let textured = properties & NO_TEXTURE == 0;
    let frames = read_frames(reader, frame_count, vertex_count)?;

    if tex_coord_frame_count > 1 {
        tracing::warn!(
            "mesh {}: {} texture coordinate frames, expected 1",
            mesh,
            tex_coord_frame_count
        );
    }

    let mut tex_coords = Vec::new();
    if textured {
        if vertex_count == 0 && tex_coord_frame_count as usize > MAX_EMPTY_FRAMES {
            return Err(DecodeError::Invalid(format!(
                "mesh {}: {} texture coordinate frames declared without vertices",
                mesh, tex_coord_frame_count
            )));
        }
        for _ in 0..tex_coord_frame_count {
            tex_coords.push(reader.read_tex_coords(vertex_count, "texture coordinates")?);
        }
    }

    let block_len = color_block_len(color_frame_count).ok_or_else(|| {
        DecodeError::Invalid(format!("mesh {}: colour frame count {} is too large", mesh, color_frame_count))
    })?;
    let color_block = reader.read_slice(block_len, "colour block")?.to_vec();

    let indices = read_indices(reader, mesh, index_count, vertex_count)?;

    let mut textures = TextureSlots::new();
    if textured {
        textures.set(DIFFUSE_SLOT, Some(texture_field.clone()));
    }

    Ok(Mesh {
        name: None,
        vertex_count,
        frames,
        tex_coords,
        indices,
        flags: MeshFlags {
            two_sided: properties & TWO_SIDED != 0,
            custom_color: properties & CUSTOM_COLOR != 0,
        },
        textures,
        extras: MeshExtras::V3(LegacyExtras {
            normal_frame_count,
            tex_coord_frame_count,
            color_frame_count,
            properties,
            texture_field,
            color_block,
        }),
    })
}

/// Encode one version 3 mesh record
pub fn encode_v3<W: Write>(w: &mut W, mesh: &Mesh, index: usize) -> Result<(), EncodeError> {
    check_mesh(mesh, index)?;

    let legacy = match &mesh.extras {
        MeshExtras::V3(extras) => Some(extras),
        _ => None,
    };
    let textured = mesh.is_textured();

    if mesh.name.as_ref().is_some_and(|n| !n.is_empty()) {
        tracing::debug!("mesh {}: version 3 meshes are unnamed, dropping the name", index);
    }
    if mesh.textures.iter().any(|(slot, _)| slot != DIFFUSE_SLOT) {
        tracing::debug!("mesh {}: version 3 stores only the diffuse texture", index);
    }

    let tex_coords: &[Vec<_>] = if textured {
        &mesh.tex_coords
    } else {
        if mesh.has_tex_coords() {
            tracing::warn!("mesh {}: dropping texture coordinates of an untextured mesh", index);
        }
        &[]
    };
    let tex_coord_frame_count = if textured {
        count_u32(tex_coords.len(), index, "texture coordinate frame count")?
    } else {
        legacy.map(|e| e.tex_coord_frame_count).unwrap_or(0)
    };

    let frame_count = count_u32(mesh.frame_count(), index, "frame count")?;
    let normal_frame_count = legacy.map(|e| e.normal_frame_count).unwrap_or(frame_count);

    let (color_frame_count, color_block) = match legacy {
        Some(e) => (e.color_frame_count, e.color_block.clone()),
        None => (1, vec![0u8; COLOR_FRAME_LEN]),
    };
    if color_block_len(color_frame_count) != Some(color_block.len()) {
        return Err(EncodeError::InconsistentMesh {
            mesh: index,
            reason: format!(
                "colour block of {} bytes does not match {} colour frames",
                color_block.len(),
                color_frame_count
            ),
        });
    }

    let mut flags = 0;
    if !textured {
        flags |= NO_TEXTURE;
    }
    if mesh.flags.two_sided {
        flags |= TWO_SIDED;
    }
    if mesh.flags.custom_color {
        flags |= CUSTOM_COLOR;
    }
    let properties = legacy.map(|e| e.properties & !KNOWN_BITS).unwrap_or(0) | flags;

    w.write_u32::<LittleEndian>(frame_count)?;
    w.write_u32::<LittleEndian>(normal_frame_count)?;
    w.write_u32::<LittleEndian>(tex_coord_frame_count)?;
    w.write_u32::<LittleEndian>(color_frame_count)?;
    w.write_u32::<LittleEndian>(count_u32(mesh.vertex_count, index, "vertex count")?)?;
    w.write_u32::<LittleEndian>(count_u32(mesh.index_count(), index, "index count")?)?;
    w.write_u32::<LittleEndian>(properties)?;

    match (mesh.textures.diffuse(), legacy) {
        (Some(name), _) => write_texture_name(w, name, index, DIFFUSE_SLOT)?,
        (None, Some(e)) => write_texture_name(w, &e.texture_field, index, DIFFUSE_SLOT)?,
        (None, None) => write_empty_name(w)?,
    }

    write_frames(w, &mesh.frames)?;
    for coords in tex_coords {
        write_tex_coords(w, coords)?;
    }
    w.write_all(&color_block)?;
    write_indices(w, &mesh.indices)?;
    Ok(())
}

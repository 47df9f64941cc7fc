//! Version 4 mesh records

use crate::codec::{check_mesh, read_frames, read_indices};
use crate::error::{DecodeError, EncodeError};
use crate::reader::ByteReader;
use crate::writer::*;
use byteorder::{LittleEndian, WriteBytesExt};
use g3dkit_core::{Mesh, MeshExtras, MeshFlags, ReservedExtras, TextureSlots, TEXTURE_SLOT_COUNT};
use std::io::Write;

const CUSTOM_COLOR: u32 = 1 << 0;
const TWO_SIDED: u32 = 1 << 1;
const KNOWN_BITS: u32 = CUSTOM_COLOR | TWO_SIDED;

/// Mask bits that name a texture slot
const SLOT_BITS: u32 = (1 << TEXTURE_SLOT_COUNT) - 1;

/// Decode one version 4 mesh record
pub fn decode_v4(reader: &mut ByteReader<'_>, mesh: usize) -> Result<Mesh, DecodeError> {
    let name = reader.read_name("mesh name")?;
    let frame_count = reader.read_count("frame count")?;
    let vertex_count = reader.read_count("vertex count")?;
    let index_count = reader.read_count("index count")?;
    let reserved = reader.read_array::<32>("reserved")?;
    let properties = reader.read_u32("properties")?;
    let texture_mask = reader.read_u32("texture mask")?;

    if texture_mask & !SLOT_BITS != 0 {
        tracing::debug!("mesh {}: texture mask {:#x} has bits past the last slot", mesh, texture_mask);
    }

    let mut textures = TextureSlots::new();
    for slot in 0..TEXTURE_SLOT_COUNT {
        if texture_mask & (1 << slot) != 0 {
            textures.set(slot, Some(reader.read_name("texture name")?));
        }
    }

    let frames = read_frames(reader, frame_count, vertex_count)?;
    let tex_coords = if texture_mask != 0 {
        vec![reader.read_tex_coords(vertex_count, "texture coordinates")?]
    } else {
        Vec::new()
    };
    let indices = read_indices(reader, mesh, index_count, vertex_count)?;

    Ok(Mesh {
        name: Some(name),
        vertex_count,
        frames,
        tex_coords,
        indices,
        flags: MeshFlags {
            two_sided: properties & TWO_SIDED != 0,
            custom_color: properties & CUSTOM_COLOR != 0,
        },
        textures,
        extras: MeshExtras::V4(ReservedExtras {
            reserved,
            properties,
            texture_mask,
        }),
    })
}

/// Encode one version 4 mesh record
pub fn encode_v4<W: Write>(w: &mut W, mesh: &Mesh, index: usize) -> Result<(), EncodeError> {
    check_mesh(mesh, index)?;

    let reserved = match &mesh.extras {
        MeshExtras::V4(extras) => Some(extras),
        _ => None,
    };

    let texture_mask = reserved.map(|e| e.texture_mask & !SLOT_BITS).unwrap_or(0) | mesh.textures.mask();
    let tex_coords = if texture_mask != 0 {
        match mesh.tex_coords.as_slice() {
            [coords] => Some(coords),
            other => {
                return Err(EncodeError::InconsistentMesh {
                    mesh: index,
                    reason: format!(
                        "texture mask {:#x} needs exactly one texture coordinate frame, found {}",
                        texture_mask,
                        other.len()
                    ),
                })
            }
        }
    } else {
        if mesh.has_tex_coords() {
            tracing::warn!("mesh {}: dropping texture coordinates of an untextured mesh", index);
        }
        None
    };

    let mut flags = 0;
    if mesh.flags.custom_color {
        flags |= CUSTOM_COLOR;
    }
    if mesh.flags.two_sided {
        flags |= TWO_SIDED;
    }
    let properties = reserved.map(|e| e.properties & !KNOWN_BITS).unwrap_or(0) | flags;

    match &mesh.name {
        Some(name) => {
            let field = name.to_field().ok_or(EncodeError::MeshNameTooLong {
                mesh: index,
                len: name.len(),
            })?;
            w.write_all(&field)?;
        }
        None => write_empty_name(w)?,
    }
    w.write_u32::<LittleEndian>(count_u32(mesh.frame_count(), index, "frame count")?)?;
    w.write_u32::<LittleEndian>(count_u32(mesh.vertex_count, index, "vertex count")?)?;
    w.write_u32::<LittleEndian>(count_u32(mesh.index_count(), index, "index count")?)?;
    w.write_all(&reserved.map(|e| e.reserved).unwrap_or([0u8; 32]))?;
    w.write_u32::<LittleEndian>(properties)?;
    w.write_u32::<LittleEndian>(texture_mask)?;

    for (slot, name) in mesh.textures.iter() {
        write_texture_name(w, name, index, slot)?;
    }

    write_frames(w, &mesh.frames)?;
    if let Some(coords) = tex_coords {
        write_tex_coords(w, coords)?;
    }
    write_indices(w, &mesh.indices)?;
    Ok(())
}

//! Little-endian block writers shared by the version 3 and 4 encoders

use crate::error::EncodeError;
use byteorder::{LittleEndian, WriteBytesExt};
use g3dkit_core::{FixedName, Frame, Point3f, TexCoord, Vector3f, NAME_FIELD_LEN};
use std::io::Write;

/// Convert a length to the on-disk `u32`
pub(crate) fn count_u32(value: usize, mesh: usize, what: &str) -> Result<u32, EncodeError> {
    u32::try_from(value).map_err(|_| EncodeError::InconsistentMesh {
        mesh,
        reason: format!("{} {} does not fit in 32 bits", what, value),
    })
}

/// Write a texture name field, null-padded to 64 bytes
pub(crate) fn write_texture_name<W: Write>(
    w: &mut W,
    name: &FixedName,
    mesh: usize,
    slot: usize,
) -> Result<(), EncodeError> {
    let field = name.to_field().ok_or(EncodeError::TextureNameTooLong {
        mesh,
        slot,
        len: name.len(),
    })?;
    w.write_all(&field)?;
    Ok(())
}

/// Write an empty 64-byte name field
pub(crate) fn write_empty_name<W: Write>(w: &mut W) -> Result<(), EncodeError> {
    w.write_all(&[0u8; NAME_FIELD_LEN])?;
    Ok(())
}

pub(crate) fn write_points<W: Write>(w: &mut W, points: &[Point3f]) -> Result<(), EncodeError> {
    for p in points {
        w.write_f32::<LittleEndian>(p.x)?;
        w.write_f32::<LittleEndian>(p.y)?;
        w.write_f32::<LittleEndian>(p.z)?;
    }
    Ok(())
}

pub(crate) fn write_vectors<W: Write>(w: &mut W, vectors: &[Vector3f]) -> Result<(), EncodeError> {
    for v in vectors {
        w.write_f32::<LittleEndian>(v.x)?;
        w.write_f32::<LittleEndian>(v.y)?;
        w.write_f32::<LittleEndian>(v.z)?;
    }
    Ok(())
}

/// Write every position block, then every normal block
pub(crate) fn write_frames<W: Write>(w: &mut W, frames: &[Frame]) -> Result<(), EncodeError> {
    for frame in frames {
        write_points(w, &frame.vertices)?;
    }
    for frame in frames {
        write_vectors(w, &frame.normals)?;
    }
    Ok(())
}

pub(crate) fn write_tex_coords<W: Write>(w: &mut W, coords: &[TexCoord]) -> Result<(), EncodeError> {
    for [u, v] in coords {
        w.write_f32::<LittleEndian>(*u)?;
        w.write_f32::<LittleEndian>(*v)?;
    }
    Ok(())
}

pub(crate) fn write_indices<W: Write>(w: &mut W, indices: &[u32]) -> Result<(), EncodeError> {
    for &i in indices {
        w.write_u32::<LittleEndian>(i)?;
    }
    Ok(())
}

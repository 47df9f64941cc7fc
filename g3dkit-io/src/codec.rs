//! G3D container: header, mesh records and model-level checks
//!
//! Binary layout (all values little-endian):
//! ```text
//! [3 bytes]  magic "G3D"
//! [1 byte]   version (3 or 4)
//! v3: [4 bytes] mesh count, then v3 mesh records
//! v4: [2 bytes] mesh count, [1 byte] subtype (0 = morph mesh), then v4 mesh records
//! ```

use crate::error::{DecodeError, EncodeError, FormatError};
use crate::reader::ByteReader;
use crate::{v3, v4};
use byteorder::{LittleEndian, WriteBytesExt};
use g3dkit_core::{Frame, Mesh, Model, Version};
use std::io::Write;

/// File signature
pub const MAGIC: &[u8; 3] = b"G3D";

/// The only version 4 mesh subtype this codec supports
pub const MORPH_MESH: u8 = 0;

/// Decode a complete G3D buffer.
///
/// Decoding is all-or-nothing: on error no part of the model is returned.
pub fn decode(bytes: &[u8]) -> Result<Model, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let magic = reader.read_array::<3>("magic")?;
    if &magic != MAGIC {
        return Err(FormatError::BadMagic { found: magic }.into());
    }
    let byte = reader.read_u8("version")?;
    let version = Version::from_byte(byte).ok_or(FormatError::UnsupportedVersion(byte))?;

    let meshes = match version {
        Version::V3 => {
            let count = reader.read_count("mesh count")?;
            (0..count)
                .map(|i| v3::decode_v3(&mut reader, i))
                .collect::<Result<Vec<_>, _>>()?
        }
        Version::V4 => {
            let count = reader.read_u16("mesh count")? as usize;
            let subtype = reader.read_u8("mesh subtype")?;
            if subtype != MORPH_MESH {
                return Err(FormatError::NotMorphMesh(subtype).into());
            }
            (0..count)
                .map(|i| v4::decode_v4(&mut reader, i))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let trailing = reader.rest().to_vec();
    if !trailing.is_empty() {
        tracing::warn!("{} trailing bytes after the last mesh record", trailing.len());
    }

    let model = Model {
        version,
        meshes,
        trailing,
    };
    model.check_frame_counts()?;

    tracing::debug!(
        "decoded G3D v{}: {} meshes, {} frames",
        version.as_byte(),
        model.mesh_count(),
        model.frame_count().unwrap_or(0)
    );
    Ok(model)
}

/// Encode a model into a new buffer
pub fn encode(model: &Model) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(encoded_len_hint(model));
    encode_into(model, &mut out)?;
    Ok(out)
}

/// Encode a model into any writer
pub fn encode_into<W: Write>(model: &Model, w: &mut W) -> Result<(), EncodeError> {
    w.write_all(MAGIC)?;
    w.write_u8(model.version.as_byte())?;

    match model.version {
        Version::V3 => {
            let count = u32::try_from(model.meshes.len()).map_err(|_| EncodeError::TooManyMeshes {
                count: model.meshes.len(),
                limit: u32::MAX as usize,
            })?;
            w.write_u32::<LittleEndian>(count)?;
            for (i, mesh) in model.meshes.iter().enumerate() {
                v3::encode_v3(w, mesh, i)?;
            }
        }
        Version::V4 => {
            let count = u16::try_from(model.meshes.len()).map_err(|_| EncodeError::TooManyMeshes {
                count: model.meshes.len(),
                limit: u16::MAX as usize,
            })?;
            w.write_u16::<LittleEndian>(count)?;
            w.write_u8(MORPH_MESH)?;
            for (i, mesh) in model.meshes.iter().enumerate() {
                v4::encode_v4(w, mesh, i)?;
            }
        }
    }

    w.write_all(&model.trailing)?;
    Ok(())
}

/// Rough size of the encoded model, used to size output buffers
pub fn encoded_len_hint(model: &Model) -> usize {
    let body: usize = model
        .meshes
        .iter()
        .map(|m| {
            let frames = m.frame_count() * m.vertex_count * 24;
            let coords = m.tex_coords.len() * m.vertex_count * 8;
            160 + frames + coords + m.index_count() * 4
        })
        .sum();
    8 + body + model.trailing.len()
}

/// Upper bound on frames in a mesh without vertices, which occupy no bytes
pub const MAX_EMPTY_FRAMES: usize = 1 << 16;

/// Read `frame_count` position blocks followed by `frame_count` normal blocks
pub(crate) fn read_frames(
    reader: &mut ByteReader<'_>,
    frame_count: usize,
    vertex_count: usize,
) -> Result<Vec<Frame>, DecodeError> {
    if vertex_count == 0 && frame_count > MAX_EMPTY_FRAMES {
        return Err(DecodeError::Invalid(format!(
            "{} frames declared for a mesh without vertices",
            frame_count
        )));
    }
    let needed = frame_count.checked_mul(vertex_count).and_then(|n| n.checked_mul(24));
    match needed {
        Some(n) if n <= reader.remaining() => {}
        _ => {
            return Err(DecodeError::Truncated {
                offset: reader.position(),
                field: "vertices",
                needed: needed.unwrap_or(usize::MAX),
                available: reader.remaining(),
            })
        }
    }

    let mut positions = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        positions.push(reader.read_points(vertex_count, "vertices")?);
    }
    let mut frames = Vec::with_capacity(positions.len());
    for vertices in positions {
        let normals = reader.read_vectors(vertex_count, "normals")?;
        frames.push(Frame::new(vertices, normals));
    }
    Ok(frames)
}

/// Read and validate a mesh's triangle list
pub(crate) fn read_indices(
    reader: &mut ByteReader<'_>,
    mesh: usize,
    index_count: usize,
    vertex_count: usize,
) -> Result<Vec<u32>, DecodeError> {
    if index_count % 3 != 0 {
        return Err(DecodeError::IncompleteTriangles { mesh, index_count });
    }
    let indices = reader.read_u32s(index_count, "indices")?;
    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|(_, &i)| i as usize >= vertex_count)
    {
        return Err(DecodeError::IndexOutOfRange {
            mesh,
            position,
            index,
            vertex_count,
        });
    }
    Ok(indices)
}

/// Structural checks shared by both encoders
pub(crate) fn check_mesh(mesh: &Mesh, index: usize) -> Result<(), EncodeError> {
    mesh.validate(index).map_err(|e| EncodeError::InconsistentMesh {
        mesh: index,
        reason: e.to_string(),
    })
}

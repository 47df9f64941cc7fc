//! Decode/encode tests against hand-assembled G3D files

use super::*;
use crate::{decode, encode, DecodeError, EncodeError, FormatError};
use g3dkit_core::{Frame, Mesh, MeshExtras, MeshFlags, Model, Point3f, Version};

/// Append one untextured version 4 mesh record with a three-vertex triangle
fn v4_mesh(bytes: Bytes, frames: u32, index_count: u32, indices: &[u32]) -> Bytes {
    let mut bytes = bytes
        .name("part")
        .u32(frames)
        .u32(3)
        .u32(index_count)
        .raw(&[0u8; 32])
        .u32(0)
        .u32(0);
    for f in 0..frames {
        bytes = bytes.f32s(&triangle_positions(f as f32));
    }
    for _ in 0..frames {
        bytes = bytes.f32s(&UP_NORMALS);
    }
    for &i in indices {
        bytes = bytes.u32(i);
    }
    bytes
}

fn v4_header(mesh_count: u16) -> Bytes {
    Bytes::new().raw(b"G3D").u8(4).u16(mesh_count).u8(0)
}

#[test]
fn test_decode_v3_file() {
    let bytes = v3_textured_file();
    assert_eq!(bytes.len(), 296);

    let model = decode(&bytes).unwrap();
    assert_eq!(model.version, Version::V3);
    assert_eq!(model.mesh_count(), 1);
    assert_eq!(model.frame_count(), Some(2));
    assert!(model.trailing.is_empty());

    let mesh = &model.meshes[0];
    assert!(mesh.name.is_none());
    assert_eq!(mesh.vertex_count, 3);
    assert_eq!(mesh.frames[1].vertices[1], Point3f::new(1.0, 0.0, 1.0));
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.flags, MeshFlags::new(true, false));
    assert_eq!(mesh.textures.diffuse().unwrap().as_str(), "tank.bmp");
    assert_eq!(mesh.tex_coords, vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]]);

    match &mesh.extras {
        MeshExtras::V3(extras) => {
            assert_eq!(extras.color_block, vec![0xAB; 16]);
            assert_eq!(extras.normal_frame_count, 2);
        }
        other => panic!("expected version 3 extras, got {:?}", other),
    }

    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_decode_v4_file() {
    let bytes = v4_textured_file();
    assert_eq!(bytes.len(), 359);

    let model = decode(&bytes).unwrap();
    assert_eq!(model.version, Version::V4);

    let mesh = &model.meshes[0];
    assert_eq!(mesh.display_name(), "turret");
    assert_eq!(mesh.flags, MeshFlags::new(false, true));
    assert_eq!(mesh.textures.diffuse().unwrap().as_str(), "turret.tga");
    assert_eq!(mesh.textures.normal_map().unwrap().as_str(), "turret_normal.tga");
    assert_eq!(mesh.tex_coords.len(), 1);
    assert_eq!(mesh.indices, vec![2, 1, 0]);
    match &mesh.extras {
        MeshExtras::V4(extras) => assert_eq!(extras.reserved, [7u8; 32]),
        other => panic!("expected version 4 extras, got {:?}", other),
    }

    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_v3_legacy_anomalies_round_trip() {
    let colors: Vec<u8> = (0..48).collect();
    let bytes = Bytes::new()
        .raw(b"G3D")
        .u8(3)
        .u32(1)
        .u32(1)
        .u32(7)
        .u32(2)
        .u32(3)
        .u32(3)
        .u32(3)
        // textured, custom colour, plus a bit nobody interprets
        .u32(0x100 | 0b100)
        .name("skin.bmp")
        .f32s(&triangle_positions(0.0))
        .f32s(&UP_NORMALS)
        .f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .f32s(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5])
        .raw(&colors)
        .u32(0)
        .u32(2)
        .u32(1)
        .build();

    let model = decode(&bytes).unwrap();
    let mesh = &model.meshes[0];
    assert_eq!(mesh.tex_coords.len(), 2);
    assert!(mesh.flags.custom_color);
    assert!(!mesh.flags.two_sided);

    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_v3_untextured_extra_tex_coord_frames_are_reported() {
    let bytes = Bytes::new()
        .raw(b"G3D")
        .u8(3)
        .u32(1)
        .u32(1)
        .u32(1)
        // two texcoord frames declared, but the mesh is untextured
        .u32(2)
        .u32(1)
        .u32(3)
        .u32(3)
        .u32(0b001)
        .name("")
        .f32s(&triangle_positions(0.0))
        .f32s(&UP_NORMALS)
        .raw(&[0u8; 16])
        .u32(0)
        .u32(1)
        .u32(2)
        .build();

    let (model, logs) = capture_logs(|| decode(&bytes).unwrap());
    assert!(model.meshes[0].tex_coords.is_empty());
    assert!(logs.contains("2 texture coordinate frames, expected 1"));
    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_v3_zero_color_frames_reads_one_block() {
    let bytes = Bytes::new()
        .raw(b"G3D")
        .u8(3)
        .u32(1)
        .u32(1)
        .u32(1)
        .u32(0)
        .u32(0)
        .u32(3)
        .u32(3)
        // no texture, but the name field still carries bytes
        .u32(0b001)
        .name("stale.bmp")
        .f32s(&triangle_positions(0.0))
        .f32s(&UP_NORMALS)
        .raw(&[1u8; 16])
        .u32(0)
        .u32(1)
        .u32(2)
        .build();

    let model = decode(&bytes).unwrap();
    let mesh = &model.meshes[0];
    assert!(!mesh.is_textured());
    assert!(!mesh.has_tex_coords());
    assert!(model.trailing.is_empty());

    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_v4_mask_bits_past_last_slot() {
    let bytes = v4_header(1)
        .name("antenna")
        .u32(1)
        .u32(3)
        .u32(3)
        .raw(&[0u8; 32])
        .u32(0)
        .u32(0x81)
        .name("antenna.tga")
        .f32s(&triangle_positions(0.0))
        .f32s(&UP_NORMALS)
        .f32s(&[0.0; 6])
        .u32(0)
        .u32(1)
        .u32(2)
        .build();

    let model = decode(&bytes).unwrap();
    let mesh = &model.meshes[0];
    assert_eq!(mesh.textures.mask(), 0b1);
    assert!(matches!(&mesh.extras, MeshExtras::V4(e) if e.texture_mask == 0x81));

    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_name_bytes_after_nul_survive() {
    let mut field = [0u8; 64];
    field[..3].copy_from_slice(b"gun");
    field[4..9].copy_from_slice(b"stale");

    let bytes = Bytes::new().raw(b"G3D").u8(4).u16(1).u8(0).raw(&field);
    let bytes = Bytes(bytes.build())
        .u32(1)
        .u32(3)
        .u32(3)
        .raw(&[0u8; 32])
        .u32(0)
        .u32(0)
        .f32s(&triangle_positions(0.0))
        .f32s(&UP_NORMALS)
        .u32(0)
        .u32(1)
        .u32(2)
        .build();

    let model = decode(&bytes).unwrap();
    assert_eq!(model.meshes[0].display_name(), "gun");
    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_trailing_bytes_are_kept() {
    let mut bytes = v4_textured_file();
    bytes.extend_from_slice(&[1, 2, 3]);

    let model = decode(&bytes).unwrap();
    assert_eq!(model.trailing, vec![1, 2, 3]);
    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_empty_model() {
    let bytes = v4_header(0).build();
    let model = decode(&bytes).unwrap();
    assert_eq!(model.mesh_count(), 0);
    assert_eq!(model.frame_count(), None);
    assert_eq!(encode(&model).unwrap(), bytes);
}

#[test]
fn test_bad_magic() {
    let mut bytes = v4_textured_file();
    bytes[2] = b'X';
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::Format(FormatError::BadMagic { found: *b"G3X" }))
    );
}

#[test]
fn test_unsupported_version() {
    let mut bytes = v4_textured_file();
    bytes[3] = 5;
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::Format(FormatError::UnsupportedVersion(5)))
    );
}

#[test]
fn test_not_morph_mesh() {
    let mut bytes = v4_textured_file();
    bytes[6] = 1;
    assert_eq!(decode(&bytes), Err(DecodeError::Format(FormatError::NotMorphMesh(1))));
}

#[test]
fn test_every_prefix_is_rejected() {
    for bytes in [v3_textured_file(), v4_textured_file()] {
        for len in 0..bytes.len() {
            assert!(decode(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
        }
    }
}

#[test]
fn test_truncation_names_field_and_offset() {
    let bytes = v4_textured_file();

    assert_eq!(
        decode(&bytes[..350]),
        Err(DecodeError::Truncated {
            offset: 347,
            field: "indices",
            needed: 12,
            available: 3
        })
    );
    assert_eq!(
        decode(&bytes[..290]),
        Err(DecodeError::Truncated {
            offset: 251,
            field: "vertices",
            needed: 72,
            available: 39
        })
    );
    assert!(matches!(
        decode(&bytes[..5]),
        Err(DecodeError::Truncated { offset: 4, field: "mesh count", .. })
    ));
}

#[test]
fn test_huge_counts_do_not_allocate() {
    let bytes = v4_header(1)
        .name("bomb")
        .u32(u32::MAX)
        .u32(u32::MAX)
        .u32(0)
        .raw(&[0u8; 32])
        .u32(0)
        .u32(0)
        .build();
    assert!(matches!(decode(&bytes), Err(DecodeError::Truncated { field: "vertices", .. })));

    let bytes = v4_header(1)
        .name("empty")
        .u32(u32::MAX)
        .u32(0)
        .u32(0)
        .raw(&[0u8; 32])
        .u32(0)
        .u32(0)
        .build();
    assert!(matches!(decode(&bytes), Err(DecodeError::Invalid(_))));
}

#[test]
fn test_incomplete_triangles() {
    let bytes = v4_mesh(v4_header(1), 1, 4, &[0, 1, 2, 0]).build();
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::IncompleteTriangles { mesh: 0, index_count: 4 })
    );
}

#[test]
fn test_index_out_of_range() {
    let bytes = v4_mesh(v4_header(1), 1, 3, &[0, 1, 3]).build();
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::IndexOutOfRange {
            mesh: 0,
            position: 2,
            index: 3,
            vertex_count: 3
        })
    );
}

#[test]
fn test_frame_count_mismatch() {
    let bytes = v4_mesh(v4_mesh(v4_header(2), 2, 3, &[0, 1, 2]), 3, 3, &[0, 1, 2]).build();
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::FrameCountMismatch {
            mesh: 1,
            expected: 2,
            found: 3
        })
    );

    let bytes = v4_mesh(v4_mesh(v4_header(2), 2, 3, &[0, 1, 2]), 2, 3, &[2, 1, 0]).build();
    let model = decode(&bytes).unwrap();
    assert_eq!(model.frame_count(), Some(2));
    assert_eq!(model.meshes[1].frames[1].vertices[0], Point3f::new(0.0, 0.0, 1.0));
}

fn animated_triangle(frames: usize) -> Mesh {
    let frames = (0..frames)
        .map(|f| {
            Frame::from_vertices(vec![
                Point3f::new(0.0, 0.0, f as f32),
                Point3f::new(1.0, 0.0, f as f32),
                Point3f::new(0.0, 1.0, f as f32),
            ])
        })
        .collect();
    Mesh::from_frames(frames, vec![0, 1, 2])
}

#[test]
fn test_in_memory_model_survives_encoding() {
    for version in [Version::V3, Version::V4] {
        let textured = animated_triangle(3).with_diffuse("a.bmp", vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        let plain = animated_triangle(3).with_flags(MeshFlags::new(true, true));
        let model = Model::from_meshes(version, vec![textured, plain]);

        let bytes = encode(&model).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded.version, version);
        for (original, copy) in model.meshes.iter().zip(&decoded.meshes) {
            assert_eq!(copy.frames, original.frames);
            assert_eq!(copy.indices, original.indices);
            assert_eq!(copy.flags, original.flags);
            assert_eq!(copy.tex_coords, original.tex_coords);
            assert_eq!(copy.textures, original.textures);
        }
        assert_eq!(encode(&decoded).unwrap(), bytes);
    }
}

#[test]
fn test_too_many_meshes() {
    let model = Model::from_meshes(Version::V4, vec![Mesh::new(); 65_536]);
    assert!(matches!(
        encode(&model),
        Err(EncodeError::TooManyMeshes { count: 65_536, limit: 65_535 })
    ));
}

#[test]
fn test_texture_name_too_long() {
    let mesh = animated_triangle(1).with_diffuse("t".repeat(65), vec![[0.0, 0.0]; 3]);
    for version in [Version::V3, Version::V4] {
        let model = Model::from_meshes(version, vec![mesh.clone()]);
        assert!(matches!(
            encode(&model),
            Err(EncodeError::TextureNameTooLong { mesh: 0, slot: 0, len: 65 })
        ));
    }
}

#[test]
fn test_encode_rejects_invalid_mesh() {
    let mut mesh = animated_triangle(2);
    mesh.frames[1].normals.pop();
    let model = Model::from_meshes(Version::V4, vec![mesh]);
    assert!(matches!(
        encode(&model),
        Err(EncodeError::InconsistentMesh { mesh: 0, .. })
    ));
}

//! Test modules for g3dkit-io
//!
//! Test files are assembled field by field with `byteorder` so the expected
//! layout is written out independently of the encoder.

pub mod codec_tests;

use byteorder::{LittleEndian, WriteBytesExt};
use std::sync::{Arc, Mutex};

/// Little-endian byte buffer builder for hand-made G3D files
#[derive(Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.write_u16::<LittleEndian>(v).unwrap();
        self
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.0.write_u32::<LittleEndian>(v).unwrap();
        self
    }

    pub fn f32s(mut self, values: &[f32]) -> Self {
        for &v in values {
            self.0.write_f32::<LittleEndian>(v).unwrap();
        }
        self
    }

    /// A 64-byte name field: `text`, then NUL padding
    pub fn name(self, text: &str) -> Self {
        let mut field = [0u8; 64];
        field[..text.len()].copy_from_slice(text.as_bytes());
        self.raw(&field)
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Positions of a unit right triangle in the z = `z` plane
pub fn triangle_positions(z: f32) -> [f32; 9] {
    [0.0, 0.0, z, 1.0, 0.0, z, 0.0, 1.0, z]
}

pub const UP_NORMALS: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

/// A version 3 file with one textured triangle animated over two frames
pub fn v3_textured_file() -> Vec<u8> {
    Bytes::new()
        .raw(b"G3D")
        .u8(3)
        .u32(1)
        // frame, normal frame, texcoord frame, colour frame counts
        .u32(2)
        .u32(2)
        .u32(1)
        .u32(1)
        // vertex count, index count, properties (two sided)
        .u32(3)
        .u32(3)
        .u32(0b010)
        .name("tank.bmp")
        .f32s(&triangle_positions(0.0))
        .f32s(&triangle_positions(1.0))
        .f32s(&UP_NORMALS)
        .f32s(&UP_NORMALS)
        .f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .raw(&[0xAB; 16])
        .u32(0)
        .u32(1)
        .u32(2)
        .build()
}

/// A version 4 file with one named, textured, single-frame triangle
pub fn v4_textured_file() -> Vec<u8> {
    Bytes::new()
        .raw(b"G3D")
        .u8(4)
        .u16(1)
        .u8(0)
        .name("turret")
        // frame, vertex, index counts
        .u32(1)
        .u32(3)
        .u32(3)
        .raw(&[7u8; 32])
        // properties (custom colour), texture mask (diffuse + normal map)
        .u32(0b01)
        .u32(0b101)
        .name("turret.tga")
        .name("turret_normal.tga")
        .f32s(&triangle_positions(0.5))
        .f32s(&UP_NORMALS)
        .f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .u32(2)
        .u32(1)
        .u32(0)
        .build()
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber installed and return its result and log text
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}

//! Core record types for the MD2 file format

use std::io::{self, Read};

use glam::Vec3;
use memchr::memchr;

/// A texture coordinate pair in raw texel units
///
/// Coordinates address the skin texture rectangle directly; they are not
/// normalized to [0, 1]. Faces reference these records by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexCoord {
    /// Horizontal texel coordinate
    pub u: u16,
    /// Vertical texel coordinate
    pub v: u16,
}

impl TexCoord {
    /// Reads a texture coordinate pair from a reader
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        let u = u16::from_le_bytes(buf);
        reader.read_exact(&mut buf)?;
        let v = u16::from_le_bytes(buf);
        Ok(Self { u, v })
    }
}

/// A triangle face: three vertex indices and three texture coordinate indices
///
/// Vertex indices are local to a frame; the flattened position arrays are
/// addressed as `frame * vertex_count + local_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Indices into the per-frame vertex arrays
    pub vertices: [u16; 3],
    /// Indices into the texture coordinate table
    pub texcoords: [u16; 3],
}

impl Face {
    /// Reads a face record from a reader
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let read_u16 = |r: &mut R| -> io::Result<u16> {
            let mut buf = [0u8; 2];
            r.read_exact(&mut buf)?;
            Ok(u16::from_le_bytes(buf))
        };
        let vertices = [
            read_u16(reader)?,
            read_u16(reader)?,
            read_u16(reader)?,
        ];
        let texcoords = [
            read_u16(reader)?,
            read_u16(reader)?,
            read_u16(reader)?,
        ];
        Ok(Self {
            vertices,
            texcoords,
        })
    }
}

/// An axis-aligned bounding box accumulated from sample points
///
/// `new` yields an empty box that the first `update` seeds, so the result
/// tightly fits the samples. The historical loader seeded all six extrema
/// at zero instead, which makes every box contain the origin whether or
/// not any vertex lies there; `anchored_at_origin` reproduces that
/// behavior for consumers that depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates an empty box; the first `update` seeds both corners
    pub fn new() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a box whose corners start at the origin
    pub fn anchored_at_origin() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }

    /// Grows the box to contain `point`
    pub fn update(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns true if the box has absorbed no points yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Edge lengths of the box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new()
    }
}

/// Primitive grouping selected by a draw command run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlPrimitive {
    /// Consecutive vertices share an edge with the previous triangle
    TriangleStrip,
    /// All triangles share the run's first vertex
    TriangleFan,
}

/// One vertex entry inside a draw command run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlCommandVertex {
    /// Normalized horizontal texture coordinate
    pub s: f32,
    /// Normalized vertical texture coordinate
    pub t: f32,
    /// Index into the per-frame vertex arrays
    pub vertex_index: u32,
}

/// A decoded draw command run: a primitive mode and its vertex entries
#[derive(Debug, Clone, PartialEq)]
pub struct GlCommand {
    /// Strip or fan grouping
    pub primitive: GlPrimitive,
    /// The run's vertex entries in draw order
    pub vertices: Vec<GlCommandVertex>,
}

/// Iterator over the draw command stream
///
/// Each run starts with a signed count word: positive for a triangle
/// strip, negative for a fan, zero to terminate the stream. Every vertex
/// entry is two f32 texture scalars followed by a vertex index, all stored
/// in 32-bit words. The payload is passed through uninterpreted beyond
/// this framing; a malformed tail ends iteration at the last whole run.
#[derive(Debug, Clone)]
pub struct GlCommandIter<'a> {
    words: &'a [i32],
    pos: usize,
    done: bool,
}

impl<'a> GlCommandIter<'a> {
    /// Creates an iterator over raw command words
    pub fn new(words: &'a [i32]) -> Self {
        Self {
            words,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for GlCommandIter<'_> {
    type Item = GlCommand;

    fn next(&mut self) -> Option<GlCommand> {
        if self.done {
            return None;
        }
        let &count_word = self.words.get(self.pos)?;
        if count_word == 0 {
            self.done = true;
            return None;
        }

        let primitive = if count_word > 0 {
            GlPrimitive::TriangleStrip
        } else {
            GlPrimitive::TriangleFan
        };
        let count = count_word.unsigned_abs() as usize;

        let start = self.pos + 1;
        let end = start + count * 3;
        if end > self.words.len() {
            // run overruns the stream
            self.done = true;
            return None;
        }

        let vertices = self.words[start..end]
            .chunks_exact(3)
            .map(|entry| GlCommandVertex {
                s: f32::from_bits(entry[0] as u32),
                t: f32::from_bits(entry[1] as u32),
                vertex_index: entry[2] as u32,
            })
            .collect();

        self.pos = end;
        Some(GlCommand {
            primitive,
            vertices,
        })
    }
}

/// Decodes a fixed-width NUL-padded name field
pub(crate) fn read_padded_name(bytes: &[u8]) -> String {
    let len = memchr(0, bytes).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_texcoord() {
        let bytes = [10u8, 0, 200, 0];
        let tc = TexCoord::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(tc, TexCoord { u: 10, v: 200 });
    }

    #[test]
    fn test_read_face() {
        let mut bytes = Vec::new();
        for w in [0u16, 1, 2, 3, 4, 5] {
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        let face = Face::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(face.vertices, [0, 1, 2]);
        assert_eq!(face.texcoords, [3, 4, 5]);
    }

    #[test]
    fn test_aabb_first_sample_seeding() {
        let mut aabb = Aabb::new();
        assert!(aabb.is_empty());
        aabb.update(Vec3::new(2.0, 3.0, 4.0));
        aabb.update(Vec3::new(5.0, 1.0, 4.0));
        // all samples are positive, so the box must not contain the origin
        assert_eq!(aabb.min, Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 3.0, 4.0));
    }

    #[test]
    fn test_aabb_anchored_at_origin() {
        let mut aabb = Aabb::anchored_at_origin();
        aabb.update(Vec3::new(2.0, 3.0, 4.0));
        // the historical seeding keeps zero as the minimum on every axis
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_gl_command_iter() {
        let mut words: Vec<i32> = Vec::new();
        // strip of 3 vertices
        words.push(3);
        for i in 0..3 {
            words.push(f32::to_bits(0.25 * i as f32) as i32);
            words.push(f32::to_bits(0.5) as i32);
            words.push(i);
        }
        // fan of 3 vertices
        words.push(-3);
        for i in 3..6 {
            words.push(f32::to_bits(0.1) as i32);
            words.push(f32::to_bits(0.2) as i32);
            words.push(i);
        }
        words.push(0);

        let commands: Vec<_> = GlCommandIter::new(&words).collect();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].primitive, GlPrimitive::TriangleStrip);
        assert_eq!(commands[0].vertices.len(), 3);
        assert_eq!(commands[0].vertices[1].s, 0.25);
        assert_eq!(commands[0].vertices[2].vertex_index, 2);
        assert_eq!(commands[1].primitive, GlPrimitive::TriangleFan);
        assert_eq!(commands[1].vertices[0].vertex_index, 3);
    }

    #[test]
    fn test_gl_command_iter_overrun_stops() {
        // claims 4 vertices but only has words for 1
        let words: Vec<i32> = vec![4, 0, 0, 1];
        let commands: Vec<_> = GlCommandIter::new(&words).collect();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_read_padded_name() {
        let mut bytes = [0u8; 16];
        bytes[..5].copy_from_slice(b"stand");
        assert_eq!(read_padded_name(&bytes), "stand");
        assert_eq!(read_padded_name(&[0u8; 16]), "");
    }
}

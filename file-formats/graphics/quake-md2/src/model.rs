//! MD2 model container and loader
//!
//! [`Md2Model`] owns everything decoded and derived from one file. It is
//! immutable after load; animation resolution and pose sampling are pure
//! `&self` queries, so independent models can be used from separate
//! threads without coordination. Dropping the model releases everything.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use glam::Vec3;

use crate::animation::{FrameBlend, SequenceId};
use crate::error::{Md2Error, Result};
use crate::frame::decode_frames;
use crate::header::{Md2Header, SKIN_NAME_SIZE, Section, read_into};
use crate::normals::derive_normals;
use crate::types::{Aabb, Face, GlCommandIter, TexCoord, read_padded_name};

/// Record size of one texture coordinate pair in the file
const TEXCOORD_SIZE: usize = 4;
/// Record size of one face in the file
const FACE_SIZE: usize = 12;
/// Record size of one draw command word in the file
const COMMAND_WORD_SIZE: usize = 4;

/// A fully decoded MD2 model
///
/// Positions and normals are flattened per frame: vertex data is addressed
/// as `frame * vertex_count + local_index`, face normals as
/// `frame * face_count + face_index`. The arrays always satisfy
/// `positions.len() == frame_count * vertex_count` and the face-normal
/// equivalent.
#[derive(Debug, Clone)]
pub struct Md2Model {
    /// The file header
    pub header: Md2Header,
    /// Skin names, informational only
    pub skin_names: Vec<String>,
    /// Texture coordinates in raw texel units
    pub texcoords: Vec<TexCoord>,
    /// Raw draw command words, opaque to the loader
    pub commands: Vec<i32>,
    /// Triangle faces
    pub faces: Vec<Face>,
    /// One name per keyframe
    pub frame_names: Vec<String>,
    /// Dequantized vertex positions for every frame
    pub positions: Vec<Vec3>,
    /// Derived per-vertex normals for every frame
    pub vertex_normals: Vec<Vec3>,
    /// Derived per-face normals for every frame
    pub face_normals: Vec<Vec3>,
}

impl Md2Model {
    /// Loads and fully decodes a model from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::parse(&mut reader)
    }

    /// Parses a model from a reader positioned at the start of the file
    ///
    /// The header is read first; each variable section is then read at its
    /// header-declared offset, in the order skin names, texture
    /// coordinates, draw commands, faces, keyframes. Any short section
    /// fails the whole load; everything read so far is dropped.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let header = Md2Header::parse(reader)?;

        let skin_bytes = read_section(
            reader,
            header.skin_offset,
            header.skin_count,
            SKIN_NAME_SIZE,
            Section::SkinNames,
        )?;
        let skin_names = skin_bytes
            .chunks_exact(SKIN_NAME_SIZE)
            .map(read_padded_name)
            .collect();

        let texcoord_bytes = read_section(
            reader,
            header.texcoord_offset,
            header.texcoord_count,
            TEXCOORD_SIZE,
            Section::TexCoords,
        )?;
        let mut texcoords = Vec::new();
        texcoords.try_reserve_exact(header.texcoord_count as usize)?;
        let mut cursor = Cursor::new(&texcoord_bytes);
        for _ in 0..header.texcoord_count {
            texcoords.push(TexCoord::read(&mut cursor)?);
        }

        let command_bytes = read_section(
            reader,
            header.command_offset,
            header.command_count,
            COMMAND_WORD_SIZE,
            Section::GlCommands,
        )?;
        let mut commands = Vec::new();
        commands.try_reserve_exact(header.command_count as usize)?;
        commands.extend(
            command_bytes
                .chunks_exact(COMMAND_WORD_SIZE)
                .map(|w| i32::from_le_bytes([w[0], w[1], w[2], w[3]])),
        );

        let face_bytes = read_section(
            reader,
            header.face_offset,
            header.face_count,
            FACE_SIZE,
            Section::Faces,
        )?;
        let mut faces = Vec::new();
        faces.try_reserve_exact(header.face_count as usize)?;
        let mut cursor = Cursor::new(&face_bytes);
        for _ in 0..header.face_count {
            faces.push(Face::read(&mut cursor)?);
        }

        let frame_count = header.frame_count as usize;
        let vertex_count = header.vertex_count as usize;
        let frame_size = header.frame_size as usize;

        // the raw keyframe block is temporary; it drops at end of scope
        // once geometry has been reconstructed
        let decoded = {
            let raw_frames = read_section(
                reader,
                header.frame_offset,
                header.frame_count,
                frame_size,
                Section::Frames,
            )?;
            decode_frames(&raw_frames, frame_count, vertex_count, frame_size)?
        };

        let derived = derive_normals(&decoded.positions, &faces, frame_count, vertex_count)?;

        log::debug!(
            "loaded MD2 model: {} frames, {} vertices, {} faces, {} skins, {} command words",
            frame_count,
            vertex_count,
            header.face_count,
            header.skin_count,
            header.command_count,
        );

        Ok(Self {
            header,
            skin_names,
            texcoords,
            commands,
            faces,
            frame_names: decoded.names,
            positions: decoded.positions,
            vertex_normals: derived.vertex_normals,
            face_normals: derived.face_normals,
        })
    }

    /// Number of keyframes
    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Number of vertices per frame
    pub fn vertex_count(&self) -> usize {
        self.header.vertex_count as usize
    }

    /// Number of triangle faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Position of one vertex in one frame
    pub fn position(&self, frame: usize, vertex: usize) -> Option<Vec3> {
        self.frame_positions(frame)?.get(vertex).copied()
    }

    /// Derived normal of one vertex in one frame
    pub fn vertex_normal(&self, frame: usize, vertex: usize) -> Option<Vec3> {
        self.frame_vertex_normals(frame)?.get(vertex).copied()
    }

    /// Derived normal of one face in one frame
    pub fn face_normal(&self, frame: usize, face: usize) -> Option<Vec3> {
        self.frame_face_normals(frame)?.get(face).copied()
    }

    /// All vertex positions of one frame
    pub fn frame_positions(&self, frame: usize) -> Option<&[Vec3]> {
        frame_slice(&self.positions, frame, self.vertex_count())
    }

    /// All vertex normals of one frame
    pub fn frame_vertex_normals(&self, frame: usize) -> Option<&[Vec3]> {
        frame_slice(&self.vertex_normals, frame, self.vertex_count())
    }

    /// All face normals of one frame
    pub fn frame_face_normals(&self, frame: usize) -> Option<&[Vec3]> {
        frame_slice(&self.face_normals, frame, self.face_count())
    }

    /// Iterates the draw command stream as decoded strip/fan runs
    pub fn gl_commands(&self) -> GlCommandIter<'_> {
        GlCommandIter::new(&self.commands)
    }

    /// Validates an explicit keyframe pair and blend fraction
    ///
    /// Both frames must exist and the fraction must lie in `[0, 1]`. No
    /// model data is touched on rejection.
    pub fn resolve_range(&self, start: usize, end: usize, fraction: f32) -> Result<FrameBlend> {
        let frame_count = self.frame_count();
        if start >= frame_count {
            return Err(Md2Error::FrameOutOfRange {
                frame: start,
                frame_count,
            });
        }
        if end >= frame_count {
            return Err(Md2Error::FrameOutOfRange {
                frame: end,
                frame_count,
            });
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(Md2Error::BlendOutOfRange(fraction as f64));
        }
        Ok(FrameBlend {
            start,
            end,
            fraction,
        })
    }

    /// Resolves a named sequence at a progress value
    ///
    /// `progress` counts whole sequence playbacks: 0.0 is the sequence
    /// start, values approaching 1.0 the end of its last keyframe. The
    /// end frame wraps to the sequence's first frame at its last, so a
    /// caller that keeps `progress` in `[0, 1)` gets a seamless loop.
    ///
    /// `progress` is not reduced modulo 1. Values at or past 1.0 resolve
    /// to keyframes past the sequence and are only rejected once they
    /// leave the model's frame range; looping callers must reset their
    /// progress (or pass `progress.fract()`) themselves.
    pub fn resolve_sequence(&self, id: SequenceId, progress: f64) -> Result<FrameBlend> {
        if progress.is_nan() || progress < 0.0 {
            return Err(Md2Error::NegativeProgress(progress));
        }
        let (start, end, fraction) = id.sequence().resolve(progress);
        let frame_count = self.frame_count();
        for frame in [start, end] {
            if frame >= frame_count as u64 {
                return Err(Md2Error::FrameOutOfRange {
                    frame: frame as usize,
                    frame_count,
                });
            }
        }
        Ok(FrameBlend {
            start: start as usize,
            end: end as usize,
            fraction: fraction as f32,
        })
    }

    /// Blended position of one vertex
    pub fn blend_position(&self, blend: FrameBlend, vertex: usize) -> Option<Vec3> {
        let a = self.position(blend.start, vertex)?;
        let b = self.position(blend.end, vertex)?;
        Some(lerp(a, b, blend.fraction))
    }

    /// Blended normal of one vertex; not re-normalized
    pub fn blend_vertex_normal(&self, blend: FrameBlend, vertex: usize) -> Option<Vec3> {
        let a = self.vertex_normal(blend.start, vertex)?;
        let b = self.vertex_normal(blend.end, vertex)?;
        Some(lerp(a, b, blend.fraction))
    }

    /// Blended normal of one face; not re-normalized
    pub fn blend_face_normal(&self, blend: FrameBlend, face: usize) -> Option<Vec3> {
        let a = self.face_normal(blend.start, face)?;
        let b = self.face_normal(blend.end, face)?;
        Some(lerp(a, b, blend.fraction))
    }

    /// Iterates the blended positions of every vertex in the pose
    ///
    /// Empty if either frame of `blend` is out of range.
    pub fn blend_positions(&self, blend: FrameBlend) -> impl Iterator<Item = Vec3> + '_ {
        let start = self.frame_positions(blend.start).unwrap_or(&[]);
        let end = self.frame_positions(blend.end).unwrap_or(&[]);
        start
            .iter()
            .zip(end.iter())
            .map(move |(a, b)| lerp(*a, *b, blend.fraction))
    }

    /// Axis-aligned bounding box of the blended pose
    ///
    /// The box is seeded from the first blended vertex, so it tightly
    /// fits the pose; use [`Aabb::anchored_at_origin`] with
    /// [`Self::blend_positions`] for the historical origin-anchored box.
    /// Returns `None` when the pose has no vertices.
    pub fn blended_bounds(&self, blend: FrameBlend) -> Option<Aabb> {
        let mut bounds = Aabb::new();
        for position in self.blend_positions(blend) {
            bounds.update(position);
        }
        if bounds.is_empty() { None } else { Some(bounds) }
    }
}

/// Linear blend `a * (1 - t) + b * t`
///
/// This weighted form is exact at `t = 0` and `t = 1`, which the
/// endpoint-equality guarantees of the resolver require; `a + t * (b - a)`
/// is not.
fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

fn frame_slice(flat: &[Vec3], frame: usize, per_frame: usize) -> Option<&[Vec3]> {
    if per_frame == 0 {
        return None;
    }
    let start = frame.checked_mul(per_frame)?;
    let end = start.checked_add(per_frame)?;
    flat.get(start..end)
}

/// Reads one section of `count` records of `record_size` bytes at
/// `offset`
///
/// The allocation is bounded by the header-declared size and reserved
/// fallibly. A zero-sized section is rejected as a header inconsistency,
/// and a short read reports the section with both byte counts.
fn read_section<R: Read + Seek>(
    reader: &mut R,
    offset: u32,
    count: u32,
    record_size: usize,
    section: Section,
) -> Result<Vec<u8>> {
    let len = (count as usize)
        .checked_mul(record_size)
        .ok_or_else(|| Md2Error::InvalidHeader(format!("{section} section size overflows")))?;
    if len == 0 {
        return Err(Md2Error::InvalidHeader(format!(
            "{section} section is empty"
        )));
    }

    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);

    reader.seek(SeekFrom::Start(offset as u64))?;
    let actual = read_into(reader, &mut buf)?;
    if actual < len {
        return Err(Md2Error::TruncatedSection {
            section,
            expected: len,
            actual,
        });
    }
    Ok(buf)
}

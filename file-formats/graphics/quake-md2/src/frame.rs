//! Keyframe geometry reconstruction
//!
//! Each keyframe record carries a per-frame scale and translate, a 16-byte
//! frame name, and one quantized vertex per model vertex: three unsigned
//! position bytes and a normal-index byte. Positions are dequantized per
//! axis as `byte * scale + translate`.
//!
//! The normal-index byte refers to a precomputed normal table in the
//! historical format. It is deliberately skipped here: normals are derived
//! from the decoded geometry instead (see [`crate::normals`]), so they can
//! never disagree with the positions actually produced.

use glam::Vec3;

use crate::error::Result;
use crate::header::{FRAME_HEADER_SIZE, QUANTIZED_VERTEX_SIZE};
use crate::types::read_padded_name;

/// Frame names and flattened per-frame vertex positions
#[derive(Debug)]
pub(crate) struct DecodedFrames {
    /// One name per keyframe
    pub names: Vec<String>,
    /// Positions addressed as `frame * vertex_count + local_index`
    pub positions: Vec<Vec3>,
}

/// Dequantizes the raw keyframe block into world-space positions
///
/// `raw` must hold exactly `frame_count * frame_size` bytes with
/// `frame_size` large enough for `vertex_count` quantized vertices; the
/// header validation establishes both before this runs.
pub(crate) fn decode_frames(
    raw: &[u8],
    frame_count: usize,
    vertex_count: usize,
    frame_size: usize,
) -> Result<DecodedFrames> {
    debug_assert_eq!(raw.len(), frame_count * frame_size);

    let mut names = Vec::new();
    names.try_reserve_exact(frame_count)?;
    let mut positions = Vec::new();
    positions.try_reserve_exact(frame_count * vertex_count)?;

    for frame in 0..frame_count {
        let record = &raw[frame * frame_size..(frame + 1) * frame_size];

        let float = |i: usize| {
            f32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]])
        };
        let scale = Vec3::new(float(0), float(4), float(8));
        let translate = Vec3::new(float(12), float(16), float(20));
        names.push(read_padded_name(&record[24..FRAME_HEADER_SIZE]));

        let vertex_bytes = &record[FRAME_HEADER_SIZE..];
        for local in 0..vertex_count {
            let v = &vertex_bytes[local * QUANTIZED_VERTEX_SIZE..];
            // v[3] is the normal-index byte, unused by design
            positions.push(Vec3::new(
                v[0] as f32 * scale.x + translate.x,
                v[1] as f32 * scale.y + translate.y,
                v[2] as f32 * scale.z + translate.z,
            ));
        }
    }

    debug_assert_eq!(positions.len(), frame_count * vertex_count);
    Ok(DecodedFrames { names, positions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_record(
        scale: [f32; 3],
        translate: [f32; 3],
        name: &str,
        vertices: &[[u8; 4]],
    ) -> Vec<u8> {
        let mut record = Vec::new();
        for s in scale {
            record.extend_from_slice(&s.to_le_bytes());
        }
        for t in translate {
            record.extend_from_slice(&t.to_le_bytes());
        }
        let mut name_field = [0u8; 16];
        name_field[..name.len()].copy_from_slice(name.as_bytes());
        record.extend_from_slice(&name_field);
        for v in vertices {
            record.extend_from_slice(v);
        }
        record
    }

    #[test]
    fn test_dequantization() {
        let mut raw = frame_record(
            [0.5, 2.0, 1.0],
            [-1.0, 0.0, 10.0],
            "frame000",
            &[[0, 0, 0, 0], [255, 1, 2, 0]],
        );
        raw.extend(frame_record(
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 0.0],
            "frame001",
            &[[10, 20, 30, 0], [3, 4, 5, 0]],
        ));

        let frame_size = FRAME_HEADER_SIZE + 2 * QUANTIZED_VERTEX_SIZE;
        let decoded = decode_frames(&raw, 2, 2, frame_size).unwrap();

        assert_eq!(decoded.names, vec!["frame000", "frame001"]);
        assert_eq!(decoded.positions.len(), 4);
        assert_eq!(decoded.positions[0], Vec3::new(-1.0, 0.0, 10.0));
        assert_eq!(
            decoded.positions[1],
            Vec3::new(255.0 * 0.5 - 1.0, 2.0, 12.0)
        );
        // second frame at frame * vertex_count + local
        assert_eq!(decoded.positions[2], Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(decoded.positions[3], Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_normal_index_byte_ignored() {
        let frame_size = FRAME_HEADER_SIZE + QUANTIZED_VERTEX_SIZE;
        let a = frame_record([1.0; 3], [0.0; 3], "a", &[[7, 8, 9, 0]]);
        let b = frame_record([1.0; 3], [0.0; 3], "a", &[[7, 8, 9, 161]]);
        let da = decode_frames(&a, 1, 1, frame_size).unwrap();
        let db = decode_frames(&b, 1, 1, frame_size).unwrap();
        assert_eq!(da.positions, db.positions);
    }

    #[test]
    fn test_padded_frame_record() {
        // frame_size may exceed the packed layout; trailing bytes are padding
        let frame_size = FRAME_HEADER_SIZE + QUANTIZED_VERTEX_SIZE + 8;
        let mut raw = frame_record([1.0; 3], [0.0; 3], "padded", &[[1, 2, 3, 0]]);
        raw.extend_from_slice(&[0xAA; 8]);
        let decoded = decode_frames(&raw, 1, 1, frame_size).unwrap();
        assert_eq!(decoded.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }
}

//! Geometric normal derivation
//!
//! Both normal fields are computed from the decoded positions at load time,
//! once per frame. Face normals come from the edge cross-product; vertex
//! normals average the normals of every face that references the vertex.
//! Face normals are computed once per frame and reused during vertex
//! accumulation rather than recomputed per occurrence.
//!
//! Degenerate triangles (collinear corners) get the zero vector instead of
//! an error, and so does a vertex no face references. Zero normals mean
//! "undefined orientation"; consumers must not assume unit length for them.

use glam::Vec3;

use crate::error::Result;
use crate::types::Face;

/// Unit normal of the triangle `(a, b, c)`, or zero when its edges are
/// collinear
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (a - b).cross(a - c).normalize_or_zero()
}

/// Per-face and per-vertex normals for every frame, flattened as
/// `frame * face_count + face` and `frame * vertex_count + vertex`
#[derive(Debug)]
pub(crate) struct DerivedNormals {
    pub face_normals: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
}

/// Derives both normal fields from flattened positions
///
/// A face corner index outside the vertex range contributes a zero face
/// normal and never matches a vertex during accumulation; the historical
/// loader read out of bounds there, which is not reproducible.
pub(crate) fn derive_normals(
    positions: &[Vec3],
    faces: &[Face],
    frame_count: usize,
    vertex_count: usize,
) -> Result<DerivedNormals> {
    debug_assert_eq!(positions.len(), frame_count * vertex_count);

    let mut face_normals = Vec::new();
    face_normals.try_reserve_exact(frame_count * faces.len())?;
    let mut vertex_normals = Vec::new();
    vertex_normals.try_reserve_exact(frame_count * vertex_count)?;

    let mut sums = Vec::new();
    sums.try_reserve_exact(vertex_count)?;
    let mut occurrences = Vec::new();
    occurrences.try_reserve_exact(vertex_count)?;

    let mut degenerate = 0usize;
    let mut wild_indices = 0usize;

    for frame in 0..frame_count {
        let frame_positions = &positions[frame * vertex_count..(frame + 1) * vertex_count];
        let frame_base = face_normals.len();

        for face in faces {
            let normal = match face_corners(frame_positions, face) {
                Some((a, b, c)) => {
                    let n = triangle_normal(a, b, c);
                    if n == Vec3::ZERO {
                        degenerate += 1;
                    }
                    n
                }
                None => {
                    wild_indices += 1;
                    Vec3::ZERO
                }
            };
            face_normals.push(normal);
        }

        sums.clear();
        sums.resize(vertex_count, Vec3::ZERO);
        occurrences.clear();
        occurrences.resize(vertex_count, 0u32);

        for (k, face) in faces.iter().enumerate() {
            let normal = face_normals[frame_base + k];
            for &vi in &face.vertices {
                if let Some(slot) = sums.get_mut(vi as usize) {
                    *slot += normal;
                    occurrences[vi as usize] += 1;
                }
            }
        }

        for local in 0..vertex_count {
            let normal = if occurrences[local] > 0 {
                (sums[local] / occurrences[local] as f32).normalize_or_zero()
            } else {
                Vec3::ZERO
            };
            vertex_normals.push(normal);
        }
    }

    if degenerate > 0 {
        log::debug!("{degenerate} degenerate faces produced zero normals");
    }
    if wild_indices > 0 {
        log::debug!("{wild_indices} faces reference out-of-range vertices");
    }

    debug_assert_eq!(vertex_normals.len(), frame_count * vertex_count);
    Ok(DerivedNormals {
        face_normals,
        vertex_normals,
    })
}

fn face_corners(frame_positions: &[Vec3], face: &Face) -> Option<(Vec3, Vec3, Vec3)> {
    let a = *frame_positions.get(face.vertices[0] as usize)?;
    let b = *frame_positions.get(face.vertices[1] as usize)?;
    let c = *frame_positions.get(face.vertices[2] as usize)?;
    Some((a, b, c))
}

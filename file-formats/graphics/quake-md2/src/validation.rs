//! Validation for decoded MD2 models
//!
//! The loader takes header counts at face value; this module checks the
//! cross-references it does not: face indices against the vertex and
//! texture coordinate tables, draw command framing, and the length
//! invariants of the derived arrays.

use crate::error::{Md2Error, Result};
use crate::model::Md2Model;

/// Validates a decoded model for internal consistency
pub fn validate_model(model: &Md2Model) -> Result<()> {
    validate_lengths(model)?;
    validate_faces(model)?;
    validate_commands(model)?;
    Ok(())
}

/// Checks the flattened-array length invariants
fn validate_lengths(model: &Md2Model) -> Result<()> {
    let frame_count = model.frame_count();
    let expected_vertices = frame_count * model.vertex_count();
    if model.positions.len() != expected_vertices {
        return Err(Md2Error::Validation(format!(
            "position array holds {} entries, expected frames * vertices = {}",
            model.positions.len(),
            expected_vertices
        )));
    }
    if model.vertex_normals.len() != expected_vertices {
        return Err(Md2Error::Validation(format!(
            "vertex normal array holds {} entries, expected {}",
            model.vertex_normals.len(),
            expected_vertices
        )));
    }
    let expected_faces = frame_count * model.face_count();
    if model.face_normals.len() != expected_faces {
        return Err(Md2Error::Validation(format!(
            "face normal array holds {} entries, expected frames * faces = {}",
            model.face_normals.len(),
            expected_faces
        )));
    }
    if model.frame_names.len() != frame_count {
        return Err(Md2Error::Validation(format!(
            "{} frame names for {} frames",
            model.frame_names.len(),
            frame_count
        )));
    }
    Ok(())
}

/// Checks that every face references existing vertices and texture
/// coordinates
fn validate_faces(model: &Md2Model) -> Result<()> {
    let vertex_count = model.vertex_count();
    let texcoord_count = model.texcoords.len();
    for (i, face) in model.faces.iter().enumerate() {
        for &vertex in &face.vertices {
            if vertex as usize >= vertex_count {
                return Err(Md2Error::Validation(format!(
                    "face {i} references vertex {vertex}, model has {vertex_count}"
                )));
            }
        }
        for &texcoord in &face.texcoords {
            if texcoord as usize >= texcoord_count {
                return Err(Md2Error::Validation(format!(
                    "face {i} references texture coordinate {texcoord}, model has {texcoord_count}"
                )));
            }
        }
    }
    Ok(())
}

/// Checks draw command framing: every run complete, vertex indices in
/// range, stream terminated
fn validate_commands(model: &Md2Model) -> Result<()> {
    let words = &model.commands;
    let vertex_count = model.vertex_count();
    let mut pos = 0;
    loop {
        let Some(&count_word) = words.get(pos) else {
            return Err(Md2Error::Validation(
                "draw command stream has no terminator".to_string(),
            ));
        };
        if count_word == 0 {
            return Ok(());
        }
        let count = count_word.unsigned_abs() as usize;
        let start = pos + 1;
        let end = start + count * 3;
        if end > words.len() {
            return Err(Md2Error::Validation(format!(
                "draw command run at word {pos} claims {count} vertices past the stream end"
            )));
        }
        for entry in words[start..end].chunks_exact(3) {
            let vertex = entry[2];
            if vertex < 0 || vertex as usize >= vertex_count {
                return Err(Md2Error::Validation(format!(
                    "draw command run at word {pos} references vertex {vertex}, model has {vertex_count}"
                )));
            }
        }
        pos = end;
    }
}

//! Loader for Quake II MD2 model files.
//!
//! MD2 stores a keyframe-animated triangle mesh with quantized vertex
//! positions. This crate decodes the whole file into memory, dequantizes
//! every keyframe, derives face and vertex normals from the decoded
//! geometry (the format's stored normal indices are ignored), and
//! resolves continuous animation time into keyframe pairs with a blend
//! fraction. Rendering, texture decoding, and windowing are left to the
//! consumer; the decoded arrays and the draw command stream are exposed
//! read-only for that purpose.
//!
//! # Examples
//!
//! ```rust,no_run
//! use quake_md2::{Md2Model, SequenceId};
//!
//! let model = Md2Model::load("tris.md2")?;
//! let blend = model.resolve_sequence(SequenceId::Run, 0.25)?;
//! for position in model.blend_positions(blend) {
//!     // stream the blended pose to a renderer
//!     let _ = position;
//! }
//! # Ok::<(), quake_md2::Md2Error>(())
//! ```

pub mod animation;
pub mod error;
pub mod header;
pub mod model;
pub mod normals;
pub mod types;
pub mod validation;

mod frame;

// Re-export common types
pub use animation::{FrameBlend, SEQUENCE_COUNT, SEQUENCES, Sequence, SequenceId};
pub use error::{Md2Error, Result};
pub use header::Md2Header;
pub use model::Md2Model;
pub use types::{Aabb, Face, GlCommand, GlCommandIter, GlCommandVertex, GlPrimitive, TexCoord};
pub use validation::validate_model;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

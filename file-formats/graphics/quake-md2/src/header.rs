//! MD2 file header
//!
//! The header is a fixed 68-byte little-endian block: magic, version, skin
//! dimensions, the per-frame record size, six element counts and six byte
//! offsets locating the variable-length sections that follow.

use std::fmt;
use std::io::Read;

use crate::error::{Md2Error, Result};

/// Magic signature for MD2 files ("IDP2")
pub const MD2_MAGIC: [u8; 4] = *b"IDP2";

/// The only MD2 version ever shipped
pub const MD2_VERSION: u32 = 8;

/// Size of the header block in bytes
pub const HEADER_SIZE: usize = 68;

/// Fixed byte size of one skin name record
pub const SKIN_NAME_SIZE: usize = 64;

/// Byte size of a frame record before its vertex data (scale, translate, name)
pub const FRAME_HEADER_SIZE: usize = 40;

/// Byte size of one quantized vertex (3 position bytes + 1 normal-index byte)
pub const QUANTIZED_VERTEX_SIZE: usize = 4;

/// The sections of an MD2 file, used to report where a decode failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The fixed-size header block
    Header,
    /// Skin name records
    SkinNames,
    /// Texture coordinate pairs
    TexCoords,
    /// Draw command words
    GlCommands,
    /// Triangle records
    Faces,
    /// Keyframe records
    Frames,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Header => "header",
            Self::SkinNames => "skin name",
            Self::TexCoords => "texture coordinate",
            Self::GlCommands => "draw command",
            Self::Faces => "face",
            Self::Frames => "frame",
        };
        f.write_str(name)
    }
}

/// MD2 model header
///
/// Counts and offsets are taken at face value, as the original format
/// intends; they bound every allocation the loader makes. The one
/// consistency check is `frame_size`, which must cover the frame record
/// layout implied by `vertex_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Md2Header {
    /// Magic signature ("IDP2")
    pub magic: [u8; 4],
    /// Format version (always 8)
    pub version: u32,
    /// Skin texture width in texels
    pub skin_width: u32,
    /// Skin texture height in texels
    pub skin_height: u32,
    /// Byte size of one keyframe record
    pub frame_size: u32,
    /// Number of skin name records
    pub skin_count: u32,
    /// Number of vertices per frame
    pub vertex_count: u32,
    /// Number of texture coordinate pairs
    pub texcoord_count: u32,
    /// Number of triangle faces
    pub face_count: u32,
    /// Number of 32-bit draw command words
    pub command_count: u32,
    /// Number of keyframes
    pub frame_count: u32,
    /// Byte offset of the skin name section
    pub skin_offset: u32,
    /// Byte offset of the texture coordinate section
    pub texcoord_offset: u32,
    /// Byte offset of the face section
    pub face_offset: u32,
    /// Byte offset of the frame section
    pub frame_offset: u32,
    /// Byte offset of the draw command section
    pub command_offset: u32,
    /// Byte offset of the end of the file, used only as a sanity boundary
    pub end_offset: u32,
}

impl Md2Header {
    /// Parses the header from the start of a reader
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        let actual = read_into(reader, &mut buf)?;
        if actual < HEADER_SIZE {
            return Err(Md2Error::TruncatedSection {
                section: Section::Header,
                expected: HEADER_SIZE,
                actual,
            });
        }

        let word = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);

        let header = Self {
            magic: [buf[0], buf[1], buf[2], buf[3]],
            version: word(4),
            skin_width: word(8),
            skin_height: word(12),
            frame_size: word(16),
            skin_count: word(20),
            vertex_count: word(24),
            texcoord_count: word(28),
            face_count: word(32),
            command_count: word(36),
            frame_count: word(40),
            skin_offset: word(44),
            texcoord_offset: word(48),
            face_offset: word(52),
            frame_offset: word(56),
            command_offset: word(60),
            end_offset: word(64),
        };
        header.validate()?;
        Ok(header)
    }

    /// Checks magic, version, and frame record consistency
    fn validate(&self) -> Result<()> {
        if self.magic != MD2_MAGIC {
            return Err(Md2Error::InvalidMagic {
                expected: String::from_utf8_lossy(&MD2_MAGIC).to_string(),
                found: String::from_utf8_lossy(&self.magic).to_string(),
            });
        }
        if self.version != MD2_VERSION {
            return Err(Md2Error::UnsupportedVersion(self.version));
        }

        let needed = FRAME_HEADER_SIZE + self.vertex_count as usize * QUANTIZED_VERTEX_SIZE;
        if (self.frame_size as usize) < needed {
            return Err(Md2Error::InvalidHeader(format!(
                "frame_size {} too small for {} vertices (need at least {})",
                self.frame_size, self.vertex_count, needed
            )));
        }
        Ok(())
    }
}

/// Fills `buf` from the reader, returning how many bytes were actually read.
///
/// Unlike `read_exact`, a short read reports the byte count instead of
/// clobbering it, which the truncation errors need.
pub(crate) fn read_into<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Md2Error::Io(e)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_bytes() -> Vec<u8> {
        let words: [u32; 16] = [
            MD2_VERSION,
            256, // skin_width
            256, // skin_height
            40 + 4 * 6,
            1,   // skins
            6,   // vertices
            4,   // texcoords
            2,   // faces
            10,  // command words
            3,   // frames
            68,  // skin_offset
            132, // texcoord_offset
            148, // face_offset
            172, // frame_offset
            364, // command_offset
            404, // end_offset
        ];
        let mut buf = Vec::new();
        buf.extend_from_slice(&MD2_MAGIC);
        for w in words {
            buf.extend_from_slice(&w.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_parse_header() {
        let bytes = header_bytes();
        let header = Md2Header::parse(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(header.magic, MD2_MAGIC);
        assert_eq!(header.version, MD2_VERSION);
        assert_eq!(header.vertex_count, 6);
        assert_eq!(header.face_count, 2);
        assert_eq!(header.frame_count, 3);
        assert_eq!(header.command_offset, 364);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = header_bytes();
        bytes[..4].copy_from_slice(b"IDP3");
        let err = Md2Header::parse(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, Md2Error::InvalidMagic { .. }));
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = header_bytes();
        bytes[4..8].copy_from_slice(&9u32.to_le_bytes());
        let err = Md2Header::parse(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, Md2Error::UnsupportedVersion(9)));
    }

    #[test]
    fn test_frame_size_too_small() {
        let mut bytes = header_bytes();
        // frame_size word at offset 16: smaller than 40 + 6 * 4
        bytes[16..20].copy_from_slice(&40u32.to_le_bytes());
        let err = Md2Header::parse(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, Md2Error::InvalidHeader(_)));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = header_bytes();
        let err = Md2Header::parse(&mut Cursor::new(&bytes[..40])).unwrap_err();
        match err {
            Md2Error::TruncatedSection {
                section,
                expected,
                actual,
            } => {
                assert_eq!(section, Section::Header);
                assert_eq!(expected, HEADER_SIZE);
                assert_eq!(actual, 40);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

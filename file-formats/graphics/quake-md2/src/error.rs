//! Error handling for MD2 loading and animation resolution

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

use crate::header::Section;

/// Errors that can occur when working with MD2 files
#[derive(Debug, Error)]
pub enum Md2Error {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in the file header
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Unsupported MD2 version
    #[error("Unsupported MD2 version: {0}")]
    UnsupportedVersion(u32),

    /// Header fields are inconsistent with each other
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A section read returned fewer bytes than its header-declared size
    #[error("Truncated {section} section: expected {expected} bytes, got {actual}")]
    TruncatedSection {
        /// The section that came up short
        section: Section,
        /// Bytes the header promised
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Memory for a section could not be reserved
    #[error("Allocation failure: {0}")]
    Allocation(#[from] TryReserveError),

    /// A frame index is outside the model's frame range
    #[error("Frame index {frame} out of range (model has {frame_count} frames)")]
    FrameOutOfRange {
        /// The offending frame index
        frame: usize,
        /// Number of frames in the model
        frame_count: usize,
    },

    /// A blend fraction is outside [0, 1]
    #[error("Blend fraction {0} outside [0, 1]")]
    BlendOutOfRange(f64),

    /// A sequence progress value is negative
    #[error("Sequence progress {0} is negative")]
    NegativeProgress(f64),

    /// Data validation failed
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Results from MD2 operations
pub type Result<T> = std::result::Result<T, Md2Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Md2Error::TruncatedSection {
            section: Section::Faces,
            expected: 120,
            actual: 64,
        };
        assert_eq!(
            format!("{}", error),
            "Truncated face section: expected 120 bytes, got 64"
        );

        let error = Md2Error::InvalidMagic {
            expected: "IDP2".to_string(),
            found: "ABCD".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Invalid magic value: expected 'IDP2', found 'ABCD'"
        );

        let error = Md2Error::FrameOutOfRange {
            frame: 199,
            frame_count: 199,
        };
        assert_eq!(
            format!("{}", error),
            "Frame index 199 out of range (model has 199 frames)"
        );
    }
}

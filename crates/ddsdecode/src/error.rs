//! Error types for DDS decoding.

use thiserror::Error;

use crate::header::FourCC;

/// Errors that can occur when decoding a DDS file.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error other than the stream ending early.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Header `size` field is not 124.
    #[error("invalid DDS header size: expected 124, got {0}")]
    InvalidHeaderSize(u32),

    /// Header is missing one of the caps, height, width or pixel format flags.
    #[error("invalid DDS header flags: {0:#010X}")]
    InvalidFlags(u32),

    /// Pixel format `size` field is not 32.
    #[error("invalid DDS pixel format size: expected 32, got {0}")]
    InvalidPixelFormatSize(u32),

    /// Pixel format declares neither a FourCC nor RGB data.
    #[error("invalid DDS pixel format flags: {0:#010X}")]
    InvalidPixelFormatFlags(u32),

    /// Surface capabilities lack the texture bit.
    #[error("invalid DDS capabilities: {0:#010X}")]
    InvalidCapabilities(u32),

    /// FourCC does not name DXT1 through DXT5.
    #[error("unsupported DXT variant: {0}")]
    UnsupportedDxtVariant(FourCC),

    /// The stream ended before a fixed-size read completed.
    #[error("truncated stream: needed {needed} bytes but only {available} available")]
    TruncatedStream { needed: usize, available: usize },

    /// Decoded size does not fit in memory.
    #[error("image too large: {width}x{height} with {faces} face(s)")]
    ImageTooLarge { width: u32, height: u32, faces: u32 },
}

impl From<ddsdecode_common::Error> for Error {
    fn from(err: ddsdecode_common::Error) -> Self {
        match err {
            ddsdecode_common::Error::UnexpectedEof { needed, available } => {
                Error::TruncatedStream { needed, available }
            }
            ddsdecode_common::Error::Io(e) => Error::Io(e),
        }
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;

//! DDS texture decoding.
//!
//! Decodes DirectDraw Surface files into a flat RGBA buffer. Supported
//! surfaces:
//! - Uncompressed 24-bit BGR and 32-bit BGRA
//! - DXT1, DXT2/DXT3 and DXT4/DXT5 block compression
//! - Cubemaps with six square faces, stacked vertically in the output
//!
//! Only the base level of each face is decoded; mip levels are read from the
//! stream and discarded.
//!
//! # Example
//!
//! ```
//! use ddsdecode::{decode, Error};
//!
//! // A complete 128-byte header whose magic is "DDX ".
//! let mut bytes = [0u8; 128];
//! bytes[..4].copy_from_slice(b"DDX ");
//! assert!(matches!(decode(&mut &bytes[..]), Err(Error::InvalidMagic(_))));
//! ```

pub mod bc;
mod decode;
mod error;
pub mod format;
pub mod header;
mod mipmap;
mod uncompressed;

pub use decode::{decode, Texture};
pub use error::{Error, Result};
pub use format::{DxtVariant, SurfaceInfo};
pub use header::{
    CubemapCaps, DdsCaps, DdsHeader, DdsPixelFormat, FourCC, HeaderFlags, PixelFormatFlags,
    SurfaceCaps,
};
pub use mipmap::skip_mipmaps;

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

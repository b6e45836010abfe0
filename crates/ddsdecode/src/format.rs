//! Surface classification.
//!
//! Turns a validated [`DdsHeader`] into the quantities the decode loops need:
//! compression variant, face count, block grid and per-level byte sizes.

use crate::header::{DdsHeader, FourCC};
use crate::{Error, Result};

/// DXT block compression variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxtVariant {
    /// Color with 1-bit punch-through alpha, 8 bytes per block.
    Dxt1,
    /// Premultiplied explicit 4-bit alpha, 16 bytes per block.
    Dxt2,
    /// Explicit 4-bit alpha, 16 bytes per block.
    Dxt3,
    /// Premultiplied interpolated alpha, 16 bytes per block.
    Dxt4,
    /// Interpolated alpha, 16 bytes per block.
    Dxt5,
}

impl DxtVariant {
    /// Resolve the variant from the last byte of a FourCC (`'1'..='5'`).
    ///
    /// Only the digit is inspected, matching how lenient writers are read.
    pub fn from_four_cc(four_cc: FourCC) -> Result<Self> {
        match four_cc.0[3] {
            b'1' => Ok(Self::Dxt1),
            b'2' => Ok(Self::Dxt2),
            b'3' => Ok(Self::Dxt3),
            b'4' => Ok(Self::Dxt4),
            b'5' => Ok(Self::Dxt5),
            _ => Err(Error::UnsupportedDxtVariant(four_cc)),
        }
    }

    /// Family number, 1 for DXT1 through 5 for DXT5.
    pub const fn family(self) -> u8 {
        match self {
            Self::Dxt1 => 1,
            Self::Dxt2 => 2,
            Self::Dxt3 => 3,
            Self::Dxt4 => 4,
            Self::Dxt5 => 5,
        }
    }

    /// Compressed bytes per 4x4 block.
    pub const fn block_bytes(self) -> usize {
        match self {
            Self::Dxt1 => 8,
            _ => 16,
        }
    }

    /// Whether color was premultiplied by alpha when encoded.
    ///
    /// The decoder reports this but does not divide it back out.
    pub const fn is_premultiplied(self) -> bool {
        matches!(self, Self::Dxt2 | Self::Dxt4)
    }
}

/// Decoding parameters derived from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Compression variant, `None` for raw BGR(A) data.
    pub variant: Option<DxtVariant>,
    /// Alpha-pixels flag set.
    pub has_alpha: bool,
    /// Mip levels beyond the base follow each face.
    pub has_mipmap: bool,
    /// Declared mip level count.
    pub mipmap_count: u32,
    /// 6 for square cubemaps, otherwise 1.
    pub cubemap_faces: u32,
    /// Blocks per row, `ceil(width / 4)`.
    pub block_pitch: u32,
    /// Blocks per face.
    pub num_blocks: u64,
}

impl SurfaceInfo {
    /// Classify a header.
    ///
    /// The header is expected to have passed [`DdsHeader::validate`].
    pub fn from_header(header: &DdsHeader) -> Result<Self> {
        let variant = if header.is_compressed() {
            Some(DxtVariant::from_four_cc(header.pixel_format.four_cc)?)
        } else {
            None
        };

        // Non-square cubemaps collapse to a single face.
        let cubemap_faces = if header.is_cubemap() && header.width == header.height {
            6
        } else {
            1
        };

        let block_pitch = header.width.div_ceil(4);
        let block_rows = header.height.div_ceil(4);

        Ok(Self {
            width: header.width,
            height: header.height,
            variant,
            has_alpha: header.has_alpha(),
            has_mipmap: header.has_mipmaps(),
            mipmap_count: header.mipmap_count,
            cubemap_faces,
            block_pitch,
            num_blocks: u64::from(block_pitch) * u64::from(block_rows),
        })
    }

    /// Whether the surface is block compressed.
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.variant.is_some()
    }

    /// Family number reported to callers: 0 for uncompressed, 1-5 for DXT.
    #[inline]
    pub fn dxt_family(&self) -> u8 {
        self.variant.map_or(0, DxtVariant::family)
    }

    /// Bytes per texel in the source data.
    ///
    /// Compressed surfaces and alpha-bearing raw surfaces decode to 4
    /// channels; raw surfaces without alpha are stored as 3.
    #[inline]
    pub fn channels(&self) -> usize {
        if self.is_compressed() || self.has_alpha {
            4
        } else {
            3
        }
    }

    /// Bytes of decoded RGBA data per face.
    pub fn face_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| self.too_large())
    }

    /// Bytes of decoded RGBA data for all faces.
    pub fn total_len(&self) -> Result<usize> {
        self.face_len()?
            .checked_mul(self.cubemap_faces as usize)
            .ok_or_else(|| self.too_large())
    }

    /// Bytes a mip level occupies in the stream.
    ///
    /// Compressed levels count blocks as `max(1, dim >> (level + 2))`, raw
    /// levels count texels as `max(1, dim >> level)`.
    pub fn mip_level_size(&self, level: u32) -> u64 {
        let (shift, unit) = match self.variant {
            Some(variant) => (level.saturating_add(2), variant.block_bytes() as u64),
            None => (level, self.channels() as u64),
        };
        let w = u64::from(self.width.checked_shr(shift).unwrap_or(0).max(1));
        let h = u64::from(self.height.checked_shr(shift).unwrap_or(0).max(1));
        w * h * unit
    }

    pub(crate) fn too_large(&self) -> Error {
        Error::ImageTooLarge {
            width: self.width,
            height: self.height,
            faces: self.cubemap_faces,
        }
    }
}

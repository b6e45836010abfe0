//! DXT (S3TC) block decompression.
//!
//! Every variant decodes one 4x4 block into 16 RGBA texels, row-major.
//! DXT1 packs color and punch-through alpha into 8 bytes; DXT2-5 prefix the
//! same color block with an 8-byte alpha block.
//!
//! # Related Links
//! * <https://www.khronos.org/registry/OpenGL/extensions/EXT/EXT_texture_compression_s3tc.txt>

mod alpha;
mod color;

pub use alpha::{alpha_palette, decode_explicit_alpha, decode_interpolated_alpha};
pub use color::{decode_color_block, decode_dxt1_block, rgb_from_565};

use std::io::Read;

use ddsdecode_common::ReadExt;

use crate::format::DxtVariant;
use crate::Result;

/// Texels along each edge of a block.
pub const BLOCK_DIM: usize = 4;

/// Decoded size of one block: 16 texels of RGBA.
pub const DECODED_BLOCK_LEN: usize = BLOCK_DIM * BLOCK_DIM * 4;

/// One decoded block, row-major RGBA.
pub type DecodedBlock = [u8; DECODED_BLOCK_LEN];

/// Rescale an unsigned `from`-bit value to `to` bits with rounding.
///
/// `0` maps to `0`, and the largest 5- and 6-bit values map to 255. At 4 bits
/// the top value lands on 254.
#[inline]
pub const fn expand_bits(value: u32, from: u32, to: u32) -> u32 {
    let b = (1 << (from - 1)) + value * ((1 << to) - 1);
    (b + (b >> from)) >> from
}

/// Read one compressed block of `variant` from `reader` and decode it into `out`.
///
/// DXT1 consumes a single 8-byte unit. DXT2-5 consume an alpha unit followed
/// by a color unit.
pub fn read_block<R: Read + ?Sized>(
    variant: DxtVariant,
    reader: &mut R,
    out: &mut DecodedBlock,
) -> Result<()> {
    match variant {
        DxtVariant::Dxt1 => decode_dxt1_block(&reader.read_chunk()?, out),
        DxtVariant::Dxt2 | DxtVariant::Dxt3 => {
            decode_explicit_alpha(&reader.read_chunk()?, out);
            decode_color_block(&reader.read_chunk()?, out);
        }
        DxtVariant::Dxt4 | DxtVariant::Dxt5 => {
            decode_interpolated_alpha(&reader.read_chunk()?, out);
            decode_color_block(&reader.read_chunk()?, out);
        }
    }
    Ok(())
}

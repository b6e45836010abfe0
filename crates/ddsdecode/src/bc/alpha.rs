//! DXT2-5 alpha sub-blocks.

use byteorder::{ByteOrder, LittleEndian};

use super::{expand_bits, DecodedBlock};

/// Decode an explicit alpha block (DXT2/3) into the alpha channel of `out`.
///
/// Each texel carries 4 bits, low nibble first.
pub fn decode_explicit_alpha(block: &[u8; 8], out: &mut DecodedBlock) {
    let bits = LittleEndian::read_u64(block);
    for (i, texel) in out.chunks_exact_mut(4).enumerate() {
        let nibble = ((bits >> (4 * i)) & 0xF) as u32;
        texel[3] = expand_bits(nibble, 4, 8) as u8;
    }
}

/// Build the eight-entry alpha palette for an interpolated block.
///
/// With `a0 > a1` six values are interpolated in sevenths. Otherwise four are
/// interpolated in fifths and the last two entries are 0 and 255.
pub fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a0w, a1w) = (u16::from(a0), u16::from(a1));
    let mut palette = [a0, a1, 0, 0, 0, 0, 0, 255];
    if a0 > a1 {
        for i in 2..8u16 {
            palette[i as usize] = (((8 - i) * a0w + (i - 1) * a1w) / 7) as u8;
        }
    } else {
        for i in 2..6u16 {
            palette[i as usize] = (((6 - i) * a0w + (i - 1) * a1w) / 5) as u8;
        }
    }
    palette
}

/// Decode an interpolated alpha block (DXT4/5) into the alpha channel of `out`.
///
/// Bytes 0 and 1 are the endpoints; the remaining 48 bits hold a 3-bit
/// palette index per texel, LSB first.
pub fn decode_interpolated_alpha(block: &[u8; 8], out: &mut DecodedBlock) {
    let palette = alpha_palette(block[0], block[1]);
    let indices = LittleEndian::read_u48(&block[2..8]);
    for (i, texel) in out.chunks_exact_mut(4).enumerate() {
        texel[3] = palette[((indices >> (3 * i)) & 7) as usize];
    }
}

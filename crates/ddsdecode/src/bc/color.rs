//! DXT color sub-block.

use byteorder::{ByteOrder, LittleEndian};

use super::{expand_bits, DecodedBlock};

/// Expand a packed RGB565 value to 8 bits per channel.
#[inline]
pub fn rgb_from_565(c: u16) -> [u8; 3] {
    let c = u32::from(c);
    [
        expand_bits((c >> 11) & 31, 5, 8) as u8,
        expand_bits((c >> 5) & 63, 6, 8) as u8,
        expand_bits(c & 31, 5, 8) as u8,
    ]
}

#[inline]
fn mix(a: [u8; 3], b: [u8; 3], wa: u16, wb: u16, div: u16) -> [u8; 3] {
    let ch = |i: usize| ((wa * u16::from(a[i]) + wb * u16::from(b[i])) / div) as u8;
    [ch(0), ch(1), ch(2)]
}

/// Write the 16 palette picks encoded in `indices` (2 bits each, LSB first).
#[inline]
fn apply_indices(indices: u32, palette: &[[u8; 4]; 4], out: &mut DecodedBlock, with_alpha: bool) {
    let width = if with_alpha { 4 } else { 3 };
    for (i, texel) in out.chunks_exact_mut(4).enumerate() {
        let idx = ((indices >> (2 * i)) & 3) as usize;
        texel[..width].copy_from_slice(&palette[idx][..width]);
    }
}

/// Decode a DXT1 block, color and punch-through alpha.
///
/// With `c0 > c1` the block holds four opaque colors. Otherwise the third
/// color is the midpoint and the fourth is transparent black.
pub fn decode_dxt1_block(block: &[u8; 8], out: &mut DecodedBlock) {
    let c0 = LittleEndian::read_u16(&block[0..2]);
    let c1 = LittleEndian::read_u16(&block[2..4]);
    let rgb0 = rgb_from_565(c0);
    let rgb1 = rgb_from_565(c1);

    let opaque = |[r, g, b]: [u8; 3]| [r, g, b, 255];
    let palette = if c0 > c1 {
        [
            opaque(rgb0),
            opaque(rgb1),
            opaque(mix(rgb0, rgb1, 2, 1, 3)),
            opaque(mix(rgb0, rgb1, 1, 2, 3)),
        ]
    } else {
        [
            opaque(rgb0),
            opaque(rgb1),
            opaque(mix(rgb0, rgb1, 1, 1, 2)),
            [0, 0, 0, 0],
        ]
    };

    apply_indices(LittleEndian::read_u32(&block[4..8]), &palette, out, true);
}

/// Decode the color half of a DXT2-5 block into the RGB channels of `out`.
///
/// Always four-color interpolation; alpha is left to the alpha sub-block.
pub fn decode_color_block(block: &[u8; 8], out: &mut DecodedBlock) {
    let rgb0 = rgb_from_565(LittleEndian::read_u16(&block[0..2]));
    let rgb1 = rgb_from_565(LittleEndian::read_u16(&block[2..4]));
    let with_alpha = |[r, g, b]: [u8; 3]| [r, g, b, 0];
    let palette = [
        with_alpha(rgb0),
        with_alpha(rgb1),
        with_alpha(mix(rgb0, rgb1, 2, 1, 3)),
        with_alpha(mix(rgb0, rgb1, 1, 2, 3)),
    ];

    apply_indices(LittleEndian::read_u32(&block[4..8]), &palette, out, false);
}

//! Raw BGR(A) surfaces.

use std::io::Read;

use ddsdecode_common::ReadExt;

use crate::format::SurfaceInfo;
use crate::Result;

/// Read one uncompressed face and write it to `dst` as RGBA.
///
/// The source holds `width * height * channels` bytes in BGR or BGRA order.
/// `dst` must be exactly `width * height * 4` bytes.
pub fn read_face<R: Read + ?Sized>(reader: &mut R, info: &SurfaceInfo, dst: &mut [u8]) -> Result<()> {
    let channels = info.channels();
    let mut raw = reader.read_vec(dst.len() / 4 * channels)?;
    swap_red_blue(&mut raw, channels);

    if channels == 4 {
        dst.copy_from_slice(&raw);
    } else {
        widen_to_rgba(&raw, dst);
    }
    Ok(())
}

/// Exchange the first and third byte of every texel.
pub fn swap_red_blue(pixels: &mut [u8], channels: usize) {
    for texel in pixels.chunks_exact_mut(channels) {
        texel.swap(0, 2);
    }
}

/// Copy RGB triples into RGBA quads with opaque alpha.
pub fn widen_to_rgba(rgb: &[u8], rgba: &mut [u8]) {
    for (src, dst) in rgb.chunks_exact(3).zip(rgba.chunks_exact_mut(4)) {
        dst[..3].copy_from_slice(src);
        dst[3] = 255;
    }
}
